//! Lull Core
//!
//! Platform-agnostic core types, traits, and error handling for Lull.
//!
//! This crate provides the building blocks shared by the playback layer,
//! the storage layer and the platform backends.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Sound`, `Preset`, `NowPlayingInfo`, `MediaCommand`
//! - **Core Traits**: `SoundOutput`, `NowPlayingCenter`, `SettingsStore`
//! - **Error Handling**: Unified `LullError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lull_core::types::{Preset, Sound, SoundDefinition};
//! use std::path::PathBuf;
//!
//! let rain = Sound::from_definition(
//!     SoundDefinition::new("Rain", PathBuf::from("/sounds/rain.ogg")),
//!     0,
//! );
//! assert!(!rain.is_selected);
//!
//! let preset = Preset::new("Evening", vec![rain.state()]);
//! assert!(preset.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{LullError, Result};
pub use storage::{MemorySettingsStore, SettingsStore};
pub use traits::{NowPlayingCenter, SoundOutput};

pub use types::{
    MediaCommand, NowPlayingInfo, Preset, PresetCreator, PresetId, Sound, SoundDefinition,
    SoundId, SoundState, StoredSoundState,
};
