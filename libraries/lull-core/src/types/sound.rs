//! Sound types
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::SoundId;

/// Clamp a volume into `0.0..=1.0`, mapping NaN to silence
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Static description of a playable sound, as provided by the catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDefinition {
    /// Stable identifier
    pub id: SoundId,
    /// Display title
    pub title: String,
    /// File name used as the key in presets (e.g. `rain.ogg`)
    pub file_name: String,
    /// Absolute path of the audio file
    pub path: PathBuf,
}

impl SoundDefinition {
    /// Build a definition from a title and a file path
    pub fn new(title: impl Into<String>, path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: SoundId::from_path(&path),
            title: title.into(),
            file_name,
            path,
        }
    }
}

/// A sound in the catalog with its live state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub id: SoundId,
    pub title: String,
    pub file_name: String,
    pub path: PathBuf,
    /// Whether the sound is part of the current mix
    pub is_selected: bool,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
    /// Hidden sounds are not listed and never selected
    pub is_hidden: bool,
    /// Position in the user's ordering
    pub custom_order: i32,
}

impl Sound {
    /// Default volume for a freshly loaded sound
    pub const DEFAULT_VOLUME: f32 = 1.0;

    /// Create a sound from its definition with default state
    pub fn from_definition(definition: SoundDefinition, order: i32) -> Self {
        Self {
            id: definition.id,
            title: definition.title,
            file_name: definition.file_name,
            path: definition.path,
            is_selected: false,
            volume: Self::DEFAULT_VOLUME,
            is_hidden: false,
            custom_order: order,
        }
    }

    /// Set the volume, clamped into range
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }

    /// The preset tuple for this sound
    pub fn state(&self) -> SoundState {
        SoundState {
            file_name: self.file_name.clone(),
            is_selected: self.is_selected,
            volume: self.volume,
        }
    }

    /// The state persisted between launches
    pub fn stored_state(&self) -> StoredSoundState {
        StoredSoundState {
            is_selected: self.is_selected,
            volume: self.volume,
            is_hidden: self.is_hidden,
            custom_order: self.custom_order,
        }
    }
}

/// Per-sound entry of a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundState {
    pub file_name: String,
    pub is_selected: bool,
    pub volume: f32,
}

/// Per-sound settings persisted across launches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSoundState {
    pub is_selected: bool,
    pub volume: f32,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub custom_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain() -> Sound {
        Sound::from_definition(
            SoundDefinition::new("Rain", PathBuf::from("/sounds/rain.ogg")),
            3,
        )
    }

    #[test]
    fn definition_derives_id_and_file_name() {
        let def = SoundDefinition::new("Rain", PathBuf::from("/sounds/rain.ogg"));
        assert_eq!(def.id.as_str(), "rain");
        assert_eq!(def.file_name, "rain.ogg");
    }

    #[test]
    fn new_sound_has_default_state() {
        let sound = rain();
        assert!(!sound.is_selected);
        assert!(!sound.is_hidden);
        assert_eq!(sound.volume, 1.0);
        assert_eq!(sound.custom_order, 3);
    }

    #[test]
    fn volume_is_clamped() {
        let mut sound = rain();
        sound.set_volume(1.7);
        assert_eq!(sound.volume, 1.0);
        sound.set_volume(-0.2);
        assert_eq!(sound.volume, 0.0);
        sound.set_volume(f32::NAN);
        assert_eq!(sound.volume, 0.0);
    }

    #[test]
    fn stored_state_tolerates_missing_fields() {
        let state: StoredSoundState =
            serde_json::from_str(r#"{"isSelected":true,"volume":0.4}"#).unwrap();
        assert!(state.is_selected);
        assert!(!state.is_hidden);
        assert_eq!(state.custom_order, 0);
    }
}
