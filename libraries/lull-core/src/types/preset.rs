//! Preset types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use super::{PresetId, SoundState};
use crate::error::{LullError, Result};

/// Name shown for the default preset
pub const DEFAULT_PRESET_NAME: &str = "Default";

/// Longest accepted preset name, in characters
pub const MAX_PRESET_NAME_LEN: usize = 64;

/// Who made a preset (for shared/curated presets)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCreator {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Named snapshot of per-sound playback state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<PresetCreator>,
    /// Artwork shown in the OS media controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<PathBuf>,
    /// Ordered per-sound state
    pub sound_states: Vec<SoundState>,
    /// Optional custom sound order (file names)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_order: Option<Vec<String>>,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preset {
    /// Create a custom preset
    pub fn new(name: impl Into<String>, sound_states: Vec<SoundState>) -> Self {
        let now = Utc::now();
        Self {
            id: PresetId::generate(),
            name: name.into().trim().to_string(),
            creator: None,
            artwork: None,
            sound_states,
            sound_order: None,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the default preset
    pub fn new_default(sound_states: Vec<SoundState>) -> Self {
        let mut preset = Self::new(DEFAULT_PRESET_NAME, sound_states);
        preset.is_default = true;
        preset
    }

    /// Name shown to the user
    pub fn display_name(&self) -> &str {
        if self.is_default {
            DEFAULT_PRESET_NAME
        } else {
            &self.name
        }
    }

    /// Whether any sound in the snapshot is selected
    pub fn has_selected_sounds(&self) -> bool {
        self.sound_states.iter().any(|s| s.is_selected)
    }

    /// Replace the snapshot, bumping `updated_at` only when it changed
    pub fn set_sound_states(&mut self, states: Vec<SoundState>) -> bool {
        if self.sound_states == states {
            return false;
        }
        self.sound_states = states;
        self.updated_at = Utc::now();
        true
    }

    /// Change the name (trimmed) and bump `updated_at`
    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.updated_at = Utc::now();
    }

    /// Validate a candidate preset name
    pub fn validate_name(name: &str) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LullError::invalid_input("Preset name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_PRESET_NAME_LEN {
            return Err(LullError::invalid_input(format!(
                "Preset name cannot be longer than {MAX_PRESET_NAME_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Validate name and snapshot consistency
    pub fn validate(&self) -> Result<()> {
        Self::validate_name(&self.name)?;

        let mut seen = HashSet::new();
        for state in &self.sound_states {
            if !seen.insert(state.file_name.as_str()) {
                return Err(LullError::Duplicate(format!(
                    "sound '{}' appears twice in preset '{}'",
                    state.file_name, self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(file: &str, selected: bool) -> SoundState {
        SoundState {
            file_name: file.to_string(),
            is_selected: selected,
            volume: 0.5,
        }
    }

    #[test]
    fn default_preset_display_name() {
        let mut preset = Preset::new_default(vec![]);
        preset.name = "Renamed somewhere".to_string();
        assert_eq!(preset.display_name(), DEFAULT_PRESET_NAME);
    }

    #[test]
    fn names_are_trimmed_and_validated() {
        let preset = Preset::new("  Rainy night ", vec![state("rain.ogg", true)]);
        assert_eq!(preset.name, "Rainy night");
        assert!(preset.validate().is_ok());

        assert!(Preset::validate_name("   ").is_err());
        assert!(Preset::validate_name(&"x".repeat(MAX_PRESET_NAME_LEN + 1)).is_err());
        assert!(Preset::validate_name(&"x".repeat(MAX_PRESET_NAME_LEN)).is_ok());
    }

    #[test]
    fn duplicate_sound_entries_are_rejected() {
        let preset = Preset::new(
            "Doubled",
            vec![state("rain.ogg", true), state("rain.ogg", false)],
        );
        assert!(matches!(preset.validate(), Err(LullError::Duplicate(_))));
    }

    #[test]
    fn set_sound_states_reports_changes() {
        let mut preset = Preset::new("Focus", vec![state("rain.ogg", true)]);
        assert!(!preset.set_sound_states(vec![state("rain.ogg", true)]));
        assert!(preset.set_sound_states(vec![state("rain.ogg", false)]));
        assert!(!preset.has_selected_sounds());
    }

    #[test]
    fn json_uses_camel_case_and_skips_empty_options() {
        let preset = Preset::new("Focus", vec![state("rain.ogg", true)]);
        let json = serde_json::to_value(&preset).unwrap();
        assert!(json.get("soundStates").is_some());
        assert!(json.get("creator").is_none());
        assert_eq!(json["soundStates"][0]["fileName"], "rain.ogg");
    }
}
