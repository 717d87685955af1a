/// Error types for the retag core
use thiserror::Error;

/// Result type alias using `RetagError`
pub type Result<T> = std::result::Result<T, RetagError>;

/// Core error type for retag
#[derive(Error, Debug)]
pub enum RetagError {
    /// Tag storage errors (reading or writing a song file)
    #[error("Tag storage error: {0}")]
    Store(String),

    /// Errors raised by an `Interaction` implementation
    #[error("Interaction error: {0}")]
    Interaction(String),

    /// Invalid configuration, e.g. a malformed deny pattern
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RetagError {
    /// Create a tag storage error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an interaction error
    pub fn interaction(msg: impl Into<String>) -> Self {
        Self::Interaction(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
