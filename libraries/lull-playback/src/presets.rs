//! Preset store
//!
//! Named snapshots of the mix. Exactly one preset is the default: it can be
//! overwritten by playing with sounds but never renamed or deleted.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    manager::AudioManager,
    types::PlaybackConfig,
};
use lull_core::types::{Preset, PresetId};
use std::time::Duration;

/// Manages the preset list and the current preset
#[derive(Debug)]
pub struct PresetManager {
    presets: Vec<Preset>,
    current: Option<PresetId>,
    fade_delay: Duration,
    always_start_paused: bool,
}

impl PresetManager {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            presets: Vec::new(),
            current: None,
            fade_delay: config.fade_delay,
            always_start_paused: config.always_start_paused,
        }
    }

    /// Install the saved preset list
    ///
    /// Invalid presets are dropped. If none is flagged default, a default
    /// preset is created from the current mix; if several are, only the
    /// first keeps the flag. The last active preset becomes current, falling
    /// back to the default.
    ///
    /// Returns true if the list was modified and needs saving.
    pub fn load(
        &mut self,
        saved: Vec<Preset>,
        last_active: Option<&PresetId>,
        audio: &AudioManager,
    ) -> bool {
        let saved_len = saved.len();
        let mut modified = false;
        let mut has_default = false;
        let mut presets = Vec::with_capacity(saved_len + 1);

        for mut preset in saved {
            if let Err(e) = preset.validate() {
                tracing::warn!(preset = %preset.id, "Dropping invalid preset: {}", e);
                modified = true;
                continue;
            }
            if preset.is_default {
                if has_default {
                    preset.is_default = false;
                    modified = true;
                }
                has_default = true;
            }
            presets.push(preset);
        }

        if !has_default {
            tracing::info!("No default preset found, creating one");
            presets.insert(0, Preset::new_default(audio.mix_snapshot()));
            modified = true;
        }

        self.presets = presets;
        self.current = last_active
            .filter(|id| self.get(id).is_some())
            .cloned()
            .or_else(|| self.default_preset().map(|p| p.id.clone()));

        tracing::debug!(
            count = self.presets.len(),
            current = ?self.current,
            "Presets loaded"
        );
        modified
    }

    // ===== Accessors =====

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, id: &PresetId) -> Option<&Preset> {
        self.presets.iter().find(|p| &p.id == id)
    }

    pub fn current(&self) -> Option<&Preset> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    pub fn current_id(&self) -> Option<&PresetId> {
        self.current.as_ref()
    }

    pub fn default_preset(&self) -> Option<&Preset> {
        self.presets.iter().find(|p| p.is_default)
    }

    /// Whether the user saved any preset of their own
    pub fn has_custom_presets(&self) -> bool {
        self.presets.iter().any(|p| !p.is_default)
    }

    // ===== Editing =====

    /// Save the current mix as a new preset and make it current
    pub fn save_new_preset(&mut self, name: &str, audio: &AudioManager) -> Result<&Preset> {
        Preset::validate_name(name)?;
        self.ensure_unique_name(name, None)?;

        let mut preset = Preset::new(name, audio.mix_snapshot());
        if audio.catalog().has_custom_order() {
            preset.sound_order = Some(audio.catalog().order_file_names());
        }

        tracing::info!(preset = %preset.id, name = %preset.name, "Preset saved");
        self.current = Some(preset.id.clone());
        self.presets.push(preset);
        Ok(&self.presets[self.presets.len() - 1])
    }

    pub fn rename_preset(&mut self, id: &PresetId, name: &str) -> Result<()> {
        let preset = self
            .get(id)
            .ok_or_else(|| PlaybackError::PresetNotFound(id.clone()))?;
        if preset.is_default {
            return Err(PlaybackError::DefaultPresetProtected("renamed"));
        }
        Preset::validate_name(name)?;
        self.ensure_unique_name(name, Some(id))?;

        if let Some(preset) = self.presets.iter_mut().find(|p| &p.id == id) {
            preset.rename(name);
        }
        Ok(())
    }

    /// Delete a preset
    ///
    /// Deleting the current preset applies the default preset.
    pub async fn delete_preset(
        &mut self,
        id: &PresetId,
        audio: &mut AudioManager,
    ) -> Result<Preset> {
        let index = self
            .presets
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| PlaybackError::PresetNotFound(id.clone()))?;
        if self.presets[index].is_default {
            return Err(PlaybackError::DefaultPresetProtected("deleted"));
        }

        let removed = self.presets.remove(index);
        tracing::info!(preset = %removed.id, name = %removed.name, "Preset deleted");

        if self.current.as_ref() == Some(id) {
            self.current = None;
            if let Some(default_id) = self.default_preset().map(|p| p.id.clone()) {
                self.apply_preset(&default_id, audio, false).await?;
            }
        }
        Ok(removed)
    }

    /// Keep the current preset in sync with the mix
    ///
    /// Skipped in solo mode. Returns true if the preset changed.
    pub fn update_current_preset(&mut self, audio: &AudioManager) -> bool {
        if audio.is_solo_active() {
            return false;
        }
        let Some(id) = self.current.clone() else {
            return false;
        };
        match self.presets.iter_mut().find(|p| p.id == id) {
            Some(preset) => preset.set_sound_states(audio.mix_snapshot()),
            None => false,
        }
    }

    // ===== Applying =====

    /// Switch the mix to a preset
    ///
    /// Leaves solo without resuming, pauses, waits the fade delay, applies
    /// the snapshot and order, then resumes if playback was running (or, on
    /// initial load, if auto-start is allowed and the preset has sound).
    ///
    /// Returns false if `id` is already current and this is not the initial
    /// load.
    pub async fn apply_preset(
        &mut self,
        id: &PresetId,
        audio: &mut AudioManager,
        initial_load: bool,
    ) -> Result<bool> {
        let preset = self
            .get(id)
            .cloned()
            .ok_or_else(|| PlaybackError::PresetNotFound(id.clone()))?;

        if !initial_load && self.current.as_ref() == Some(id) {
            tracing::debug!(preset = %id, "Preset already current");
            return Ok(false);
        }

        let was_playing = audio.is_playing();
        audio.exit_solo_without_resuming();
        audio.pause_all();

        if !self.fade_delay.is_zero() {
            tokio::time::sleep(self.fade_delay).await;
        }

        audio.apply_preset_states(&preset.sound_states, preset.sound_order.as_deref());
        self.current = Some(preset.id.clone());

        let auto_start =
            initial_load && !self.always_start_paused && preset.has_selected_sounds();
        if was_playing || auto_start {
            audio.play_selected();
        }

        audio.push_event(PlaybackEvent::PresetApplied {
            preset_id: preset.id.clone(),
            name: preset.display_name().to_string(),
        });
        tracing::info!(
            preset = %preset.id,
            name = %preset.display_name(),
            initial_load,
            playing = audio.is_playing(),
            "Preset applied"
        );
        Ok(true)
    }

    /// Preset after the current one, wrapping around
    pub fn next_preset(&self) -> Option<&Preset> {
        self.neighbor(1)
    }

    /// Preset before the current one, wrapping around
    pub fn previous_preset(&self) -> Option<&Preset> {
        self.neighbor(self.presets.len().saturating_sub(1))
    }

    fn neighbor(&self, step: usize) -> Option<&Preset> {
        let len = self.presets.len();
        if len < 2 {
            return None;
        }
        let index = self
            .current
            .as_ref()
            .and_then(|id| self.presets.iter().position(|p| &p.id == id))
            .map_or(0, |i| (i + step) % len);
        self.presets.get(index)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<&PresetId>) -> Result<()> {
        let wanted = name.trim().to_lowercase();
        let taken = self
            .presets
            .iter()
            .filter(|p| Some(&p.id) != except)
            .any(|p| p.display_name().to_lowercase() == wanted);
        if taken {
            return Err(PlaybackError::DuplicatePresetName(name.trim().to_string()));
        }
        Ok(())
    }
}
