//! Error types for playback management

use lull_core::types::{PresetId, SoundId};
use lull_core::LullError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Sound is not in the catalog
    #[error("Sound not found: {0}")]
    SoundNotFound(SoundId),

    /// Two catalog entries share an ID
    #[error("Duplicate sound in catalog: {0}")]
    DuplicateSound(SoundId),

    /// Preset does not exist
    #[error("Preset not found: {0}")]
    PresetNotFound(PresetId),

    /// Another preset already uses this name
    #[error("A preset named '{0}' already exists")]
    DuplicatePresetName(String),

    /// The default preset cannot be renamed or deleted
    #[error("The default preset cannot be {0}")]
    DefaultPresetProtected(&'static str),

    /// Device, storage or validation error from the core layer
    #[error(transparent)]
    Core(#[from] LullError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
