//! Domain types for Lull

mod ids;
mod media;
mod preset;
mod sound;

pub use ids::{PresetId, SoundId};
pub use media::{MediaCommand, NowPlayingInfo};
pub use preset::{Preset, PresetCreator, DEFAULT_PRESET_NAME, MAX_PRESET_NAME_LEN};
pub use sound::{clamp_volume, Sound, SoundDefinition, SoundState, StoredSoundState};
