//! A move-selection engine for Connect-N style gravity-drop games
//!
//! The engine picks a column with a depth-limited minimax search using
//! alpha-beta pruning, scoring positions at the search horizon with a
//! live-line heuristic. It works on any board implementing the [`Board`]
//! trait: [`ArrayBoard`] handles any size up to [`MAX_DIMENSION`] and any win
//! length, while [`BitBoard`] is a compact 7x6 Connect 4 board.
//!
//! # Basic Usage
//!
//! ```
//! use connectn_ai::{bitboard::BitBoard, eval::Evaluator, search::Searcher};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = BitBoard::from_moves("112233")?;
//! let mut searcher = Searcher::new(Evaluator::defensive(4));
//! let best_move = searcher.choose_move(&board, 4)?;
//!
//! assert_eq!(best_move, 3);
//!# Ok(())
//!# }
//! ```

pub mod arrayboard;

pub mod bitboard;

pub mod board;

pub mod config;

pub mod engine;

pub mod error;

pub mod eval;

pub mod search;


pub use arrayboard::ArrayBoard;
pub use bitboard::BitBoard;
pub use board::{successors, Board, Cell, Outcome, Player};
pub use config::SearchConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use eval::{evaluate, Evaluator, Score, Weights, WIN_SCORE};
pub use search::{SearchResult, Searcher};

/// The largest width or height of an [`ArrayBoard`]
pub const MAX_DIMENSION: usize = 14;
