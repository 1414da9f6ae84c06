/// Media session errors
use thiserror::Error;

/// Result type for media session operations
pub type Result<T> = std::result::Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    /// The platform session could not be created
    #[error("Failed to create media session: {0}")]
    Create(String),

    /// Registering the command handler failed
    #[error("Failed to attach media command handler: {0}")]
    Attach(String),

    /// Updating metadata or playback status failed
    #[error("Failed to update media session: {0}")]
    Update(String),
}

impl From<MediaError> for lull_core::LullError {
    fn from(err: MediaError) -> Self {
        lull_core::LullError::media(err.to_string())
    }
}
