//! A fixed-size Connect 4 board packed into two `u64` masks

use static_assertions::const_assert;

use crate::{
    board::{Board, Cell, Outcome, Player},
    error::{Error, IllegalMoveReason, Result},
};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The length of run needed to win
pub const WIN_LENGTH: usize = 4;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);

#[derive(Copy, Clone, Debug)]
pub struct BitBoard {
    // mask of the current player's tiles
    player_mask: u64,
    // mask of all tiles
    board_mask: u64,
    num_moves: usize,
}

impl BitBoard {
    pub fn new() -> Self {
        Self {
            player_mask: 0,
            board_mask: 0,
            num_moves: 0,
        }
    }

    /// Plays a string of 1-indexed columns from the empty board
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for (position, column_char) in moves.as_ref().chars().enumerate() {
            // only play available moves
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => {
                    let column = column - 1;
                    if !board.playable(column) {
                        return Err(Error::IllegalMove {
                            column: column + 1,
                            reason: IllegalMoveReason::ColumnFull,
                        });
                    }
                    // abort if the position is won at any point
                    if board.outcome().is_terminal() {
                        return Err(Error::InvalidState(format!(
                            "cannot play column {}, the game is already over",
                            column + 1
                        )));
                    }
                    board.play(Self::move_bitmap(board.board_mask, column));
                }
                _ => {
                    return Err(Error::Parse {
                        position,
                        found: column_char.to_string(),
                    })
                }
            }
        }
        Ok(board)
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }

    fn cell_mask(row: usize, column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + row)
    }

    // the lowest empty cell of a column
    fn move_bitmap(board_mask: u64, column: usize) -> u64 {
        (board_mask + Self::bottom_mask(column)) & Self::column_mask(column)
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn playable(&self, column: usize) -> bool {
        Self::top_mask(column) & self.board_mask == 0
    }

    pub fn play(&mut self, move_bitmap: u64) {
        // switch the current player
        self.player_mask ^= self.board_mask;
        // add a cell of the previous player to the correct column
        self.board_mask |= move_bitmap;
        self.num_moves += 1;
    }

    /// Whether the current player wins by playing `column`
    #[cfg(test)]
    pub(crate) fn check_winning_move(&self, column: usize) -> bool {
        // play the move on the clone of the board, keeping the current player
        Self::alignment(self.player_mask | Self::move_bitmap(self.board_mask, column))
    }

    // whether a mask of one player's tiles contains 4 in a row
    fn alignment(pos: u64) -> bool {
        // check horizontal alignment
        // mark all horizontal runs of 2
        let mut m = pos & (pos >> (HEIGHT + 1));
        // check for runs of 2 * (runs of 2)
        if m & (m >> (2 * (HEIGHT + 1))) != 0 {
            return true;
        }

        // check diagonal alignment 1
        m = pos & (pos >> HEIGHT);
        if m & (m >> (2 * HEIGHT)) != 0 {
            return true;
        }

        // check diagonal alignment 2
        m = pos & (pos >> (HEIGHT + 2));
        if m & (m >> (2 * (HEIGHT + 2))) != 0 {
            return true;
        }

        // check vertical alignment
        m = pos & (pos >> 1);
        if m & (m >> 2) != 0 {
            return true;
        }

        // no alignments
        false
    }
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for BitBoard {
    fn width(&self) -> usize {
        WIDTH
    }

    fn height(&self) -> usize {
        HEIGHT
    }

    fn win_length(&self) -> usize {
        WIN_LENGTH
    }

    fn player_to_move(&self) -> Player {
        if self.num_moves % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    fn cell_at(&self, row: usize, column: usize) -> Cell {
        let mask = Self::cell_mask(row, column);
        if self.board_mask & mask == 0 {
            Cell::Empty
        } else if self.player_mask & mask != 0 {
            self.player_to_move().into()
        } else {
            self.player_to_move().opponent().into()
        }
    }

    fn outcome(&self) -> Outcome {
        // only the player who just moved can have completed a line
        if Self::alignment(self.player_mask ^ self.board_mask) {
            Outcome::WonBy(self.player_to_move().opponent())
        } else if self.num_moves == WIDTH * HEIGHT {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    fn legal_columns(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.playable(column)).collect()
    }

    fn clone_and_drop(&self, column: usize) -> Result<Self> {
        if column >= WIDTH {
            return Err(Error::IllegalMove {
                column,
                reason: IllegalMoveReason::OutOfRange { width: WIDTH },
            });
        }
        if !self.playable(column) {
            return Err(Error::IllegalMove {
                column,
                reason: IllegalMoveReason::ColumnFull,
            });
        }
        let mut next = *self;
        next.play(Self::move_bitmap(self.board_mask, column));
        Ok(next)
    }
}
