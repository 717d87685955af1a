/// Error types for Opus tag storage
use retag_core::RetagError;
use thiserror::Error;

/// Result type alias using `TagfileError`
pub type Result<T> = std::result::Result<T, TagfileError>;

/// Errors reading or writing a song file's tags
#[derive(Error, Debug)]
pub enum TagfileError {
    /// The song file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The container could not be parsed or written
    #[error("Tag error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<TagfileError> for RetagError {
    fn from(err: TagfileError) -> Self {
        match err {
            TagfileError::Io(err) => Self::Io(err),
            other => Self::store(other.to_string()),
        }
    }
}
