//! Playback Events
//!
//! Emitted by the coordinator for UI synchronization and used by the
//! session to decide what to persist.

use lull_core::types::{PresetId, SoundId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Global play/pause changed
    StateChanged { is_playing: bool },

    /// A sound's selection, volume or visibility changed
    SoundChanged {
        sound_id: SoundId,
        is_selected: bool,
        volume: f32,
        is_hidden: bool,
    },

    /// Custom sound order changed
    OrderChanged,

    /// Global volume or mute changed
    VolumeChanged { level: f32, is_muted: bool },

    /// Solo mode entered (`Some`) or left (`None`)
    SoloModeChanged { sound_id: Option<SoundId> },

    /// A preset finished applying
    PresetApplied { preset_id: PresetId, name: String },

    /// Presets were added, removed or renamed
    PresetsChanged { count: usize },

    /// Sleep timer reached zero and paused playback
    TimerExpired,
}
