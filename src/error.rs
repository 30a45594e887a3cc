//! Error types for the kingdom simulation.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for every fallible game operation.
#[derive(Debug, Error)]
pub enum GameError {
    /// An argument fell outside its permitted domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index into a unit, class, trait, loan or route list was invalid.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// The treasury cannot cover a payment.
    #[error("Insufficient funds: need {required} gold, have {available}")]
    InsufficientFunds { required: i64, available: i64 },

    /// A stockpile cannot cover a withdrawal.
    #[error("Insufficient {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: String,
        required: i64,
        available: i64,
    },

    /// The referenced kingdom does not exist.
    #[error("Kingdom not found: {0}")]
    NoKingdom(String),

    /// The kingdom has no ruler on the throne.
    #[error("Kingdom has no ruler")]
    NoLeader,

    /// The game has already ended.
    #[error("The game is over")]
    GameOver,

    /// A file could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot or config file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A config or snapshot was well-formed but unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GameError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        GameError::InvalidArgument(msg.into())
    }

    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        GameError::IndexOutOfRange { what, index, len }
    }
}
