//! A board of any size up to [`MAX_DIMENSION`] and any winning run length

use crate::{
    board::{Board, Cell, Outcome, Player, DIRECTIONS},
    error::{Error, IllegalMoveReason, Result},
    MAX_DIMENSION,
};

#[derive(Clone, Debug)]
pub struct ArrayBoard {
    width: usize,
    height: usize,
    win_length: usize,
    cells: Vec<Cell>, // cells are stored left-to-right, bottom-to-top
    heights: Vec<usize>,
    to_move: Player,
    num_moves: usize,
    // (row, column) of the most recent token, the only one that can complete a line
    last_move: Option<(usize, usize)>,
}

impl ArrayBoard {
    /// Creates an empty board with player one to move
    pub fn new(width: usize, height: usize, win_length: usize) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidBoard(format!(
                "dimensions {}x{} out of range, both must be between 1 and {}",
                width, height, MAX_DIMENSION
            )));
        }
        if win_length == 0 || win_length > width.max(height) {
            return Err(Error::InvalidBoard(format!(
                "win length {} out of range for a {}x{} board",
                win_length, width, height
            )));
        }
        Ok(Self {
            width,
            height,
            win_length,
            cells: vec![Cell::Empty; width * height],
            heights: vec![0; width],
            to_move: Player::One,
            num_moves: 0,
            last_move: None,
        })
    }

    /// Plays a sequence of 1-indexed columns from the empty board
    ///
    /// Moves are either a string of digits (`"4453"`) or, for boards wider
    /// than nine columns, a comma separated list (`"4,4,10"`).
    pub fn from_moves(width: usize, height: usize, win_length: usize, moves: &str) -> Result<Self> {
        let mut board = Self::new(width, height, win_length)?;

        let tokens: Vec<(usize, &str)> = if moves.contains(',') {
            let mut position = 0;
            moves
                .split(',')
                .map(|token| {
                    let start = position;
                    position += token.len() + 1;
                    (start, token.trim())
                })
                .collect()
        } else {
            let moves = moves.trim();
            moves
                .char_indices()
                .map(|(i, c)| (i, &moves[i..i + c.len_utf8()]))
                .collect()
        };

        for (position, token) in tokens {
            match token.parse::<usize>() {
                Ok(column) => {
                    board.play_checked(column)?;
                }
                Err(_) => {
                    return Err(Error::Parse {
                        position,
                        found: token.to_string(),
                    })
                }
            }
        }
        Ok(board)
    }

    /// Builds a position from a picture of the board
    ///
    /// `rows` run from the top of the board to the bottom, with `.` for an
    /// empty cell, `X` for player one and `O` for player two. Token counts are
    /// not checked against `next`, so lopsided fixtures are allowed, but every
    /// token must rest on another token or the floor and no line may already
    /// be complete.
    pub fn from_grid(win_length: usize, rows: &[&str], next: Player) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut board = Self::new(width, height, win_length)?;

        for (i, row) in rows.iter().enumerate() {
            let y = height - 1 - i;
            if row.chars().count() != width {
                return Err(Error::InvalidBoard(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, symbol) in row.chars().enumerate() {
                let cell = match symbol {
                    '.' => Cell::Empty,
                    'X' | 'x' => Cell::PlayerOne,
                    'O' | 'o' => Cell::PlayerTwo,
                    _ => {
                        return Err(Error::Parse {
                            position: i * width + x,
                            found: symbol.to_string(),
                        })
                    }
                };
                board.cells[x + width * y] = cell;
            }
        }

        for x in 0..width {
            let filled = (0..height)
                .take_while(|&y| !board.cells[x + width * y].is_empty())
                .count();
            if (filled..height).any(|y| !board.cells[x + width * y].is_empty()) {
                return Err(Error::InvalidBoard(format!(
                    "column {} has a floating token",
                    x
                )));
            }
            board.heights[x] = filled;
            board.num_moves += filled;
        }

        for y in 0..height {
            for x in 0..width {
                if let Some(owner) = board.cells[x + width * y].owner() {
                    if board.line_through(y, x, owner) {
                        return Err(Error::InvalidBoard(format!(
                            "player {:?} already has a line through row {}, column {}",
                            owner, y, x
                        )));
                    }
                }
            }
        }

        board.to_move = next;
        Ok(board)
    }

    /// Plays a 1-indexed column, checking that the move is legal
    pub fn play_checked(&mut self, column_one_indexed: usize) -> Result<Outcome> {
        if column_one_indexed < 1 || column_one_indexed > self.width {
            return Err(Error::IllegalMove {
                column: column_one_indexed,
                reason: IllegalMoveReason::OutOfRange { width: self.width },
            });
        }
        let column = column_one_indexed - 1;
        if !self.playable(column) {
            return Err(Error::IllegalMove {
                column: column_one_indexed,
                reason: IllegalMoveReason::ColumnFull,
            });
        }
        if self.outcome().is_terminal() {
            return Err(Error::InvalidState(format!(
                "cannot play column {}, the game is already over",
                column_one_indexed
            )));
        }

        self.play(column);
        Ok(self.outcome())
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn playable(&self, column: usize) -> bool {
        self.heights[column] < self.height
    }

    fn play(&mut self, column: usize) {
        let row = self.heights[column];
        self.cells[column + self.width * row] = self.to_move.into();
        self.heights[column] += 1;
        self.num_moves += 1;
        self.last_move = Some((row, column));
        self.to_move = self.to_move.opponent();
    }

    fn owned_by(&self, row: isize, column: isize, player: Player) -> bool {
        row >= 0
            && column >= 0
            && (row as usize) < self.height
            && (column as usize) < self.width
            && self.cells[column as usize + self.width * row as usize].owner() == Some(player)
    }

    /// Whether `player` has a run of at least `win_length` through the given cell
    fn line_through(&self, row: usize, column: usize, player: Player) -> bool {
        for &(dy, dx) in DIRECTIONS.iter() {
            let mut run = 1;
            for &sign in [-1isize, 1].iter() {
                let mut y = row as isize + sign * dy;
                let mut x = column as isize + sign * dx;
                while self.owned_by(y, x, player) {
                    run += 1;
                    y += sign * dy;
                    x += sign * dx;
                }
            }
            if run >= self.win_length {
                return true;
            }
        }
        false
    }
}

impl Board for ArrayBoard {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn win_length(&self) -> usize {
        self.win_length
    }

    fn player_to_move(&self) -> Player {
        self.to_move
    }

    fn cell_at(&self, row: usize, column: usize) -> Cell {
        self.cells[column + self.width * row]
    }

    fn outcome(&self) -> Outcome {
        if let Some((row, column)) = self.last_move {
            let mover = self.to_move.opponent();
            if self.line_through(row, column, mover) {
                return Outcome::WonBy(mover);
            }
        }
        if self.num_moves == self.width * self.height {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    fn legal_columns(&self) -> Vec<usize> {
        (0..self.width).filter(|&column| self.playable(column)).collect()
    }

    fn clone_and_drop(&self, column: usize) -> Result<Self> {
        if column >= self.width {
            return Err(Error::IllegalMove {
                column,
                reason: IllegalMoveReason::OutOfRange { width: self.width },
            });
        }
        if !self.playable(column) {
            return Err(Error::IllegalMove {
                column,
                reason: IllegalMoveReason::ColumnFull,
            });
        }
        let mut next = self.clone();
        next.play(column);
        Ok(next)
    }
}
