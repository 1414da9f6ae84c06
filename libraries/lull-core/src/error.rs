/// Core error types for Lull
use thiserror::Error;

/// Result type alias using `LullError`
pub type Result<T> = std::result::Result<T, LullError>;

/// Core error type for Lull
#[derive(Error, Debug)]
pub enum LullError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Audio device errors
    #[error("Audio error: {0}")]
    Audio(String),

    /// OS media session errors
    #[error("Media session error: {0}")]
    Media(String),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl LullError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create a media session error
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
