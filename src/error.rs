use std::fmt;

/// Why a column cannot take another token
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IllegalMoveReason {
    OutOfRange { width: usize },
    ColumnFull,
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMoveReason::OutOfRange { width } => {
                write!(f, "out of range for a board {} columns wide", width)
            }
            IllegalMoveReason::ColumnFull => write!(f, "column full"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid move, column {column}: {reason}")]
    IllegalMove {
        column: usize,
        reason: IllegalMoveReason,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    #[error("could not parse '{found}' at position {position} as a valid move")]
    Parse { position: usize, found: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
