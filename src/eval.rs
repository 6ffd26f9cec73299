//! Static position evaluation
//!
//! A position is scored from a fixed player's point of view. Decided games
//! short-circuit to [`WIN_SCORE`], `-WIN_SCORE` or [`DRAW_SCORE`]. Otherwise every
//! occupied cell is weighted by the number of live lines running through it: runs of
//! `win_length` cells, in any direction, holding no token of the cell owner's
//! opponent. The opponent's live cells are weighted more heavily than our own, so
//! the search prefers positions that leave the opponent fewer open threats.
//!
//! An optional run-length term adds `10^(k-1)` for every window that starts with a
//! run of `k` of our tokens and subtracts the same for the opponent's runs. It is
//! scaled by [`Weights::runs`] and disabled by default.
//!
//! Both players' live lines are simply summed. Two opposing threats that race
//! each other to completion are not told apart, which is a known blind spot of
//! this heuristic at the search horizon.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::{
    board::{Board, Cell, Outcome, Player, DIRECTIONS},
    error::{Error, Result},
    MAX_DIMENSION,
};

pub type Score = i64;

/// The score of a won position, outside the range of any heuristic value
pub const WIN_SCORE: Score = 1 << 60;

/// The score of a drawn position
pub const DRAW_SCORE: Score = 0;

/// The largest magnitude a heuristic (non-terminal) score may take
pub const HEURISTIC_LIMIT: Score = WIN_SCORE - 1;

// a cell lies on at most `win_length` windows per direction, so on the largest
// board every cell counted for the opponent at the defensive weight stays below
// the clamp
const MAX_DEFENSIVE_TOTAL: Score = (MAX_DIMENSION * MAX_DIMENSION) as Score
    * (DIRECTIONS.len() * MAX_DIMENSION) as Score
    * 10i64.pow(MAX_DIMENSION as u32 - 1);
const_assert!(MAX_DEFENSIVE_TOTAL < HEURISTIC_LIMIT);

/// Per-cell weights of the live-line heuristic
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Added for each live line through one of our own tokens
    pub own: Score,
    /// Subtracted for each live line through one of the opponent's tokens
    pub opponent: Score,
    /// Scales the run-length term, zero disables it
    #[serde(default)]
    pub runs: Score,
}

// 10^18 is the largest power of ten below `Score::MAX`
const MAX_OWN_EXPONENT: usize = 17;

impl Weights {
    /// `10^(N-2)` per own live line and ten times that per opponent live line
    ///
    /// The exponent stops growing at win lengths beyond 19, so the opponent
    /// weight stays ten times the own weight for every `N`.
    pub fn defensive(win_length: usize) -> Self {
        let exponent = win_length.saturating_sub(2).min(MAX_OWN_EXPONENT) as u32;
        let own = 10i64.pow(exponent);
        Self {
            own,
            opponent: own * 10,
            runs: 0,
        }
    }

    /// Rejects negative weights, which would reward the opponent's threats
    pub fn validate(&self) -> Result<()> {
        if self.own < 0 || self.opponent < 0 || self.runs < 0 {
            return Err(Error::Config(format!(
                "weights must be non-negative, got own {}, opponent {} and runs {}",
                self.own, self.opponent, self.runs
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Evaluator {
    weights: Weights,
}

impl Evaluator {
    /// Negative weights are treated as zero
    pub fn new(weights: Weights) -> Self {
        Self {
            weights: Weights {
                own: weights.own.max(0),
                opponent: weights.opponent.max(0),
                runs: weights.runs.max(0),
            },
        }
    }

    /// An evaluator using [`Weights::defensive`]
    pub fn defensive(win_length: usize) -> Self {
        Self::new(Weights::defensive(win_length))
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Scores `board` for `perspective`, higher is better
    pub fn evaluate<B: Board>(&self, board: &B, perspective: Player) -> Score {
        match board.outcome() {
            Outcome::WonBy(winner) if winner == perspective => return WIN_SCORE,
            Outcome::WonBy(_) => return -WIN_SCORE,
            Outcome::Draw => return DRAW_SCORE,
            Outcome::InProgress => {}
        }

        let lines = LiveLines::count(board, self.weights.runs != 0);
        let mut score: Score = 0;
        for (index, cell) in lines.cells.iter().enumerate() {
            let owner = match cell.owner() {
                Some(owner) => owner,
                None => continue,
            };
            let live = lines.live_for(owner, index) as Score;
            score = if owner == perspective {
                score.saturating_add(self.weights.own.saturating_mul(live))
            } else {
                score.saturating_sub(self.weights.opponent.saturating_mul(live))
            };
        }

        if self.weights.runs != 0 {
            let ours = lines.runs_for(perspective);
            let theirs = lines.runs_for(perspective.opponent());
            score = score
                .saturating_add(self.weights.runs.saturating_mul(ours))
                .saturating_sub(self.weights.runs.saturating_mul(theirs));
        }
        score.clamp(-HEURISTIC_LIMIT, HEURISTIC_LIMIT)
    }
}

/// Scores `board` for `perspective` with the defensive weights for its win length
pub fn evaluate<B: Board>(board: &B, perspective: Player) -> Score {
    Evaluator::defensive(board.win_length()).evaluate(board, perspective)
}

/// Number of live lines through each cell, for each player
struct LiveLines {
    cells: Vec<Cell>,
    live_one: Vec<u32>,
    live_two: Vec<u32>,
    // run-length totals, only filled when asked for
    track_runs: bool,
    runs_one: Score,
    runs_two: Score,

    // scratch space reused across lines
    open_one: Vec<u32>,
    open_two: Vec<u32>,
    run: Vec<usize>,
}

impl LiveLines {
    fn count<B: Board>(board: &B, track_runs: bool) -> Self {
        let (width, height) = (board.width(), board.height());
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for column in 0..width {
                cells.push(board.cell_at(row, column));
            }
        }

        let longest = width.max(height);
        let mut lines = Self {
            cells,
            live_one: vec![0; width * height],
            live_two: vec![0; width * height],
            track_runs,
            runs_one: 0,
            runs_two: 0,
            open_one: Vec::with_capacity(longest + 1),
            open_two: Vec::with_capacity(longest + 1),
            run: Vec::with_capacity(longest),
        };

        let in_bounds = |row: isize, column: isize| {
            row >= 0 && column >= 0 && (row as usize) < height && (column as usize) < width
        };
        let mut line = Vec::with_capacity(longest);
        for &(dy, dx) in DIRECTIONS.iter() {
            for row in 0..height as isize {
                for column in 0..width as isize {
                    // each maximal line is walked once, from the cell with no predecessor
                    if in_bounds(row - dy, column - dx) {
                        continue;
                    }
                    line.clear();
                    let (mut y, mut x) = (row, column);
                    while in_bounds(y, x) {
                        line.push(x as usize + width * y as usize);
                        y += dy;
                        x += dx;
                    }
                    lines.count_line(&line, board.win_length());
                }
            }
        }
        lines
    }

    fn live_for(&self, player: Player, index: usize) -> u32 {
        match player {
            Player::One => self.live_one[index],
            Player::Two => self.live_two[index],
        }
    }

    fn runs_for(&self, player: Player) -> Score {
        match player {
            Player::One => self.runs_one,
            Player::Two => self.runs_two,
        }
    }

    // slide a window of `n` cells along the line, then credit each cell with the
    // open windows covering it using prefix sums
    fn count_line(&mut self, line: &[usize], n: usize) {
        if n == 0 || line.len() < n {
            return;
        }
        let windows = line.len() - n + 1;

        self.open_one.clear();
        self.open_one.resize(windows + 1, 0);
        self.open_two.clear();
        self.open_two.resize(windows + 1, 0);

        let (mut ones, mut twos) = (0usize, 0usize);
        for k in 0..line.len() {
            match self.cells[line[k]] {
                Cell::PlayerOne => ones += 1,
                Cell::PlayerTwo => twos += 1,
                Cell::Empty => {}
            }
            if k >= n {
                match self.cells[line[k - n]] {
                    Cell::PlayerOne => ones -= 1,
                    Cell::PlayerTwo => twos -= 1,
                    Cell::Empty => {}
                }
            }
            if k + 1 >= n {
                let start = k + 1 - n;
                self.open_one[start + 1] = self.open_one[start] + (twos == 0) as u32;
                self.open_two[start + 1] = self.open_two[start] + (ones == 0) as u32;
            }
        }

        for (k, &index) in line.iter().enumerate() {
            let first = (k + 1).saturating_sub(n);
            let last = k.min(windows - 1);
            self.live_one[index] += self.open_one[last + 1] - self.open_one[first];
            self.live_two[index] += self.open_two[last + 1] - self.open_two[first];
        }

        if self.track_runs {
            self.count_runs(line, n, windows);
        }
    }

    // score each window by the run of equal tokens at its start, capped at the
    // window length
    fn count_runs(&mut self, line: &[usize], n: usize, windows: usize) {
        self.run.clear();
        self.run.resize(line.len(), 1);
        for k in (0..line.len() - 1).rev() {
            if self.cells[line[k]] == self.cells[line[k + 1]] {
                self.run[k] = (self.run[k + 1] + 1).min(n);
            }
        }

        for start in 0..windows {
            let value = 10i64.saturating_pow(self.run[start] as u32 - 1);
            match self.cells[line[start]] {
                Cell::PlayerOne => self.runs_one = self.runs_one.saturating_add(value),
                Cell::PlayerTwo => self.runs_two = self.runs_two.saturating_add(value),
                Cell::Empty => {}
            }
        }
    }
}
