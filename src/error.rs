//! Error types for the gridnav-rl crate

use thiserror::Error;

/// Main error type for the gridnav-rl crate
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error(
        "invalid transition distribution for action {action} from state {state}: \
         entries must be non-negative and sum to 1 (sum = {sum})"
    )]
    InvalidDistribution {
        action: usize,
        state: usize,
        sum: f64,
    },

    #[error("no non-terminal state found after {attempts} sampling attempts")]
    NoNonTerminalState { attempts: usize },

    #[error("action index {index} has no label (only {label_count} labels known)")]
    UnknownActionIndex { index: usize, label_count: usize },

    #[error("unknown action label '{label}'")]
    UnknownActionLabel { label: String },

    #[error("dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    #[error("state {state} is out of range (state count is {state_count})")]
    StateOutOfRange { state: usize, state_count: usize },

    #[error("invalid map at line {line}: {message}")]
    InvalidMap { line: usize, message: String },

    #[error("map contains no grid rows")]
    EmptyMap,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
