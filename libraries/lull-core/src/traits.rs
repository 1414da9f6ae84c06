/// Core traits for Lull
use crate::error::Result;
use crate::types::{NowPlayingInfo, SoundId};
use std::path::Path;

/// Platform playback device
///
/// The coordinator treats the device as opaque: it registers each sound
/// file once and then only toggles voices on and off and adjusts their gain.
/// Implementers loop every voice indefinitely.
pub trait SoundOutput: Send {
    /// Register a sound file under `id`
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or decoded
    fn load(&mut self, id: &SoundId, path: &Path) -> Result<()>;

    /// Start (or resume) looping the voice
    fn play(&mut self, id: &SoundId) -> Result<()>;

    /// Pause the voice, keeping its position
    fn pause(&mut self, id: &SoundId) -> Result<()>;

    /// Set the linear gain of the voice (0.0 = silent, 1.0 = unity)
    fn set_gain(&mut self, id: &SoundId, gain: f32) -> Result<()>;

    /// Whether the voice is currently audible
    fn is_playing(&self, id: &SoundId) -> bool;
}

/// OS now-playing surface (MPRIS, SMTC, MPNowPlayingInfoCenter)
///
/// Not `Send`: some platforms require the session to stay on the thread
/// that created it.
pub trait NowPlayingCenter {
    /// Replace the displayed metadata
    fn set_metadata(&mut self, info: &NowPlayingInfo) -> Result<()>;

    /// Update the playing/paused status
    fn set_playback(&mut self, is_playing: bool) -> Result<()>;

    /// Remove the app from the now-playing surface
    fn clear(&mut self) -> Result<()>;
}
