//! The board abstraction consumed by the evaluator and the searcher

use crate::error::Result;

/// Row and column steps of the four line directions: vertical, horizontal,
/// rising diagonal and falling diagonal
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// One of the two players
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The player whose token fills this cell, if any
    pub fn owner(&self) -> Option<Player> {
        match self {
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
            Cell::Empty => None,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    InProgress,
    Draw,
    WonBy(Player),
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// A gravity-drop game position
///
/// Rows are counted from the bottom of the board, so row 0 is the first row
/// filled in any column. Implementations must treat a position as immutable:
/// [`Board::clone_and_drop`] returns a fresh, fully independent board.
pub trait Board: Clone {
    /// The number of columns
    fn width(&self) -> usize;

    /// The number of rows
    fn height(&self) -> usize;

    /// The length of run needed to win
    fn win_length(&self) -> usize;

    fn player_to_move(&self) -> Player;

    fn cell_at(&self, row: usize, column: usize) -> Cell;

    fn outcome(&self) -> Outcome;

    /// Columns with free capacity, in ascending order
    fn legal_columns(&self) -> Vec<usize>;

    /// Returns a copy of this board with the player to move's token dropped
    /// into `column`
    ///
    /// Fails with [`Error::IllegalMove`](crate::Error::IllegalMove) if the
    /// column is full or out of range.
    fn clone_and_drop(&self, column: usize) -> Result<Self>;
}

/// Iterator over the positions reachable in one move, see [`successors`]
pub struct Successors<'a, B: Board> {
    board: &'a B,
    columns: std::vec::IntoIter<usize>,
}

impl<'a, B: Board> Iterator for Successors<'a, B> {
    type Item = Result<(B, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        let column = self.columns.next()?;
        Some(self.board.clone_and_drop(column).map(|next| (next, column)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.columns.size_hint()
    }
}

/// Returns the boards reachable from `board` in ascending column order,
/// each paired with the column that was played
///
/// Successors are built lazily, so a search that prunes part way through
/// never pays for the boards it skips. The sequence is empty iff the board is full.
pub fn successors<B: Board>(board: &B) -> Successors<'_, B> {
    Successors {
        board,
        columns: board.legal_columns().into_iter(),
    }
}
