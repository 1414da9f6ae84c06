//! OS now-playing integration for Lull
//!
//! Wraps [souvlaki](https://docs.rs/souvlaki) so the playback session can
//! publish what is playing and receive media key presses through the
//! platform-neutral [`lull_core::NowPlayingCenter`] trait.
//!
//! - Linux: MPRIS over D-Bus
//! - Windows: System Media Transport Controls
//! - macOS: MPNowPlayingInfoCenter

mod controls;
mod error;

pub use controls::{command_for_event, cover_url, SystemMediaControls};
pub use error::{MediaError, Result};
