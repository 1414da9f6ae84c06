//! Now-playing metadata and OS media commands
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata mirrored into the OS now-playing surface
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Option<PathBuf>,
    pub is_playing: bool,
}

impl NowPlayingInfo {
    /// Whether the displayed metadata (ignoring playback status) differs
    pub fn metadata_differs(&self, other: &Self) -> bool {
        self.title != other.title
            || self.artist != other.artist
            || self.album != other.album
            || self.artwork != other.artwork
    }
}

/// Remote commands received from OS media controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaCommand {
    Play,
    Pause,
    Toggle,
    Stop,
    /// Switch to the next preset
    Next,
    /// Switch to the previous preset
    Previous,
}
