/// Audio output errors
use thiserror::Error;

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// Device not found
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Failed to query or configure the device
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to start the stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// File could not be opened or decoded
    #[error("Failed to decode {path}: {message}")]
    DecodeError { path: String, message: String },

    /// Sample rate conversion error
    #[error("Sample rate conversion error: {0}")]
    ResampleError(String),

    /// The audio thread exited
    #[error("Audio thread is not running")]
    ThreadStopped,
}

impl AudioError {
    pub(crate) fn decode(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        Self::DecodeError {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AudioError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AudioError::PlayError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::DeviceError(err.to_string())
    }
}

impl From<AudioError> for lull_core::LullError {
    fn from(err: AudioError) -> Self {
        lull_core::LullError::audio(err.to_string())
    }
}
