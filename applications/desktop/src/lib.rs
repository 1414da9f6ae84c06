//! Lull desktop application
//!
//! Configuration, sound directory scanning and the interactive shell used
//! by the `lull` binary.

pub mod config;
pub mod error;
pub mod shell;
pub mod sounds;

pub use config::LullConfig;
pub use error::{DesktopError, Result};

/// Log filter used when `RUST_LOG` is unset. Covers every Lull crate.
pub const DEFAULT_LOG_FILTER: &str = "lull=info,lull_desktop=info,lull_core=info,lull_playback=info,lull_storage=info,lull_media=info,lull_audio_desktop=info";
