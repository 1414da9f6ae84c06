//! Lull - Playback Management
//!
//! Platform-agnostic coordination of an ambient sound mix.
//!
//! This crate provides:
//! - Sound catalog with per-sound selection, volume, visibility and order
//! - Global play/pause and global volume (logarithmic, with mute)
//! - Solo mode: isolate one sound and restore the previous mix on exit
//! - Presets: named snapshots of the mix, with a protected default preset
//! - Now-playing bridge for OS media controls
//! - Sleep timer
//!
//! # Architecture
//!
//! `lull-playback` never talks to a platform directly:
//! - audio goes through [`lull_core::SoundOutput`]
//! - now-playing metadata goes through [`lull_core::NowPlayingCenter`]
//! - persistence goes through [`lull_core::SettingsStore`]
//!
//! Everything runs on one task. The only await points are the short fade
//! delays used while switching presets.
//!
//! # Example
//!
//! ```rust
//! use lull_core::{MemorySettingsStore, SoundDefinition};
//! use lull_playback::{MemoryOutput, PlaybackConfig, Session, SoundCatalog};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> lull_playback::Result<()> {
//! let catalog = SoundCatalog::new(vec![
//!     SoundDefinition::new("Rain", PathBuf::from("/sounds/rain.ogg")),
//!     SoundDefinition::new("Wind", PathBuf::from("/sounds/wind.ogg")),
//! ])?;
//!
//! let mut session = Session::new(
//!     catalog,
//!     Box::new(MemoryOutput::new()),
//!     Arc::new(MemorySettingsStore::new()),
//!     None,
//!     PlaybackConfig::default(),
//! );
//! session.restore().await?;
//!
//! let rain = "rain".into();
//! session.toggle_sound(&rain).await?;
//! session.set_sound_volume(&rain, 0.4).await?;
//! assert!(session.audio().is_playing());
//!
//! session.save_new_preset("Rainy evening").await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;
mod events;
mod manager;
mod now_playing;
mod output;
mod presets;
mod session;
mod solo;
mod timer;
pub mod types;
mod volume;

// Public exports
pub use catalog::SoundCatalog;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use manager::AudioManager;
pub use now_playing::{compose_now_playing, NowPlayingBridge};
pub use output::{MemoryOutput, VoiceSnapshot};
pub use presets::PresetManager;
pub use session::Session;
pub use solo::{SoloExit, SoloMode, SoloSnapshot};
pub use timer::SleepTimer;
pub use types::PlaybackConfig;
pub use volume::{perceptual_gain, Volume};
