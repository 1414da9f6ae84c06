//! Playback session
//!
//! Ties the audio manager, the preset store, persistence and the
//! now-playing bridge together. Every mutating call drains the manager's
//! events, writes what they touched (last write wins), keeps the current
//! preset in sync and refreshes the now-playing info.

use crate::{
    catalog::SoundCatalog,
    error::Result,
    events::PlaybackEvent,
    manager::AudioManager,
    now_playing::NowPlayingBridge,
    presets::PresetManager,
    timer::SleepTimer,
    types::PlaybackConfig,
};
use lull_core::storage::{SETTING_GLOBAL_VOLUME, SETTING_LAST_ACTIVE_PRESET};
use lull_core::types::{MediaCommand, PresetId, SoundId};
use lull_core::{NowPlayingCenter, SettingsStore, SoundOutput};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A running player
pub struct Session {
    audio: AudioManager,
    presets: PresetManager,
    store: Arc<dyn SettingsStore>,
    bridge: Option<NowPlayingBridge>,
    timer: SleepTimer,
    events: Vec<PlaybackEvent>,
}

impl Session {
    pub fn new(
        catalog: SoundCatalog,
        output: Box<dyn SoundOutput>,
        store: Arc<dyn SettingsStore>,
        center: Option<Box<dyn NowPlayingCenter>>,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            audio: AudioManager::new(catalog, output, &config),
            presets: PresetManager::new(&config),
            store,
            bridge: center.map(NowPlayingBridge::new),
            timer: SleepTimer::new(),
            events: Vec::new(),
        }
    }

    /// Load sounds and saved state, then apply the last active preset
    pub async fn restore(&mut self) -> Result<()> {
        self.audio.load_sounds();

        let sounds: Vec<(SoundId, String)> = self
            .audio
            .catalog()
            .iter()
            .map(|s| (s.id.clone(), s.file_name.clone()))
            .collect();
        for (id, file_name) in sounds {
            match self.store.get_sound_state(&file_name).await {
                Ok(Some(stored)) => self.audio.restore_sound(&id, stored)?,
                Ok(None) => {}
                Err(e) => tracing::warn!(sound = %id, "Failed to read sound state: {}", e),
            }
        }

        match self.store.get_setting(SETTING_GLOBAL_VOLUME).await {
            Ok(Some(value)) => {
                if let Some(level) = value.as_f64() {
                    self.audio.set_global_volume(level as f32);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read global volume: {}", e),
        }

        let saved = match self.store.load_presets().await {
            Ok(presets) => presets,
            Err(e) => {
                tracing::warn!("Failed to load presets: {}", e);
                Vec::new()
            }
        };
        let last_active = match self.store.get_setting(SETTING_LAST_ACTIVE_PRESET).await {
            Ok(value) => value.and_then(|v| v.as_str().map(PresetId::new)),
            Err(e) => {
                tracing::warn!("Failed to read last active preset: {}", e);
                None
            }
        };

        if self.presets.load(saved, last_active.as_ref(), &self.audio) {
            self.store.save_presets(self.presets.presets()).await?;
        }

        // Restoring alone must not write anything back
        self.audio.drain_events();

        if let Some(id) = self.presets.current_id().cloned() {
            self.presets.apply_preset(&id, &mut self.audio, true).await?;
        }
        self.sync().await;

        tracing::info!(
            sounds = self.audio.catalog().len(),
            presets = self.presets.presets().len(),
            playing = self.audio.is_playing(),
            "Session restored"
        );
        Ok(())
    }

    // ===== Accessors =====

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn presets(&self) -> &PresetManager {
        &self.presets
    }

    pub fn timer_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Take events processed since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Playback =====

    pub async fn set_playing(&mut self, playing: bool) {
        self.audio.set_playing(playing);
        self.sync().await;
    }

    pub async fn toggle_playback(&mut self) {
        self.audio.toggle_playback();
        self.sync().await;
    }

    pub async fn set_global_volume(&mut self, level: f32) {
        self.audio.set_global_volume(level);
        self.sync().await;
    }

    pub async fn toggle_mute(&mut self) {
        self.audio.toggle_mute();
        self.sync().await;
    }

    // ===== Sounds =====

    pub async fn toggle_sound(&mut self, id: &SoundId) -> Result<bool> {
        let selected = self.audio.toggle_sound(id)?;
        self.sync().await;
        Ok(selected)
    }

    pub async fn set_sound_volume(&mut self, id: &SoundId, volume: f32) -> Result<()> {
        self.audio.set_sound_volume(id, volume)?;
        self.sync().await;
        Ok(())
    }

    pub async fn set_sound_hidden(&mut self, id: &SoundId, hidden: bool) -> Result<()> {
        self.audio.set_sound_hidden(id, hidden)?;
        self.sync().await;
        Ok(())
    }

    pub async fn move_sound(&mut self, id: &SoundId, to_index: usize) -> Result<()> {
        self.audio.move_sound(id, to_index)?;
        self.sync().await;
        Ok(())
    }

    pub async fn reset_order(&mut self) {
        self.audio.reset_order();
        self.sync().await;
    }

    pub async fn reset_sounds(&mut self) {
        self.audio.reset_sounds();
        self.sync().await;
    }

    // ===== Solo =====

    pub async fn enter_solo(&mut self, id: &SoundId) -> Result<()> {
        self.audio.enter_solo(id)?;
        self.sync().await;
        Ok(())
    }

    pub async fn exit_solo(&mut self) -> bool {
        let was_active = self.audio.exit_solo();
        self.sync().await;
        was_active
    }

    pub async fn toggle_solo(&mut self, id: &SoundId) -> Result<()> {
        self.audio.toggle_solo(id)?;
        self.sync().await;
        Ok(())
    }

    // ===== Presets =====

    pub async fn save_new_preset(&mut self, name: &str) -> Result<PresetId> {
        let id = self.presets.save_new_preset(name, &self.audio)?.id.clone();
        self.store.save_presets(self.presets.presets()).await?;
        self.write_setting(SETTING_LAST_ACTIVE_PRESET, serde_json::json!(id.as_str()))
            .await;
        self.presets_changed();
        self.sync().await;
        Ok(id)
    }

    pub async fn rename_preset(&mut self, id: &PresetId, name: &str) -> Result<()> {
        self.presets.rename_preset(id, name)?;
        self.store.save_presets(self.presets.presets()).await?;
        self.presets_changed();
        self.sync().await;
        Ok(())
    }

    pub async fn delete_preset(&mut self, id: &PresetId) -> Result<()> {
        self.presets.delete_preset(id, &mut self.audio).await?;
        self.store.save_presets(self.presets.presets()).await?;
        self.presets_changed();
        self.sync().await;
        Ok(())
    }

    /// Apply a preset. Returns false if it was already current.
    pub async fn apply_preset(&mut self, id: &PresetId) -> Result<bool> {
        let applied = self.presets.apply_preset(id, &mut self.audio, false).await?;
        self.sync().await;
        Ok(applied)
    }

    pub async fn next_preset(&mut self) -> Result<bool> {
        let target = self.presets.next_preset().map(|p| p.id.clone());
        match target {
            Some(id) => self.apply_preset(&id).await,
            None => Ok(false),
        }
    }

    pub async fn previous_preset(&mut self) -> Result<bool> {
        let target = self.presets.previous_preset().map(|p| p.id.clone());
        match target {
            Some(id) => self.apply_preset(&id).await,
            None => Ok(false),
        }
    }

    // ===== Media controls =====

    pub async fn handle_media_command(&mut self, command: MediaCommand) -> Result<()> {
        tracing::debug!(?command, "Media command");
        match command {
            MediaCommand::Play => self.set_playing(true).await,
            MediaCommand::Pause | MediaCommand::Stop => self.set_playing(false).await,
            MediaCommand::Toggle => self.toggle_playback().await,
            MediaCommand::Next => {
                self.next_preset().await?;
            }
            MediaCommand::Previous => {
                self.previous_preset().await?;
            }
        }
        Ok(())
    }

    // ===== Sleep timer =====

    pub fn start_timer(&mut self, duration: Duration, now: Instant) {
        tracing::info!(seconds = duration.as_secs(), "Sleep timer started");
        self.timer.start(duration, now);
    }

    pub fn cancel_timer(&mut self) {
        self.timer.cancel();
    }

    /// Drive the sleep timer. Returns true when it fired.
    pub async fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.poll(now) {
            return false;
        }
        tracing::info!("Sleep timer expired");
        self.audio.pause_all();
        self.audio.push_event(PlaybackEvent::TimerExpired);
        self.sync().await;
        true
    }

    /// Pause and leave the OS media surface
    pub async fn shutdown(&mut self) {
        self.audio.pause_all();
        self.sync().await;
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.clear();
        }
    }

    // ===== Internal =====

    /// Persist what the pending events touched and refresh now-playing
    async fn sync(&mut self) {
        let events = self.audio.drain_events();

        let mut dirty: Vec<SoundId> = Vec::new();
        let mut all_sounds = false;
        let mut mix_changed = false;
        let mut volume = None;
        let mut applied = None;

        for event in &events {
            match event {
                PlaybackEvent::SoundChanged { sound_id, .. } => {
                    mix_changed = true;
                    if !dirty.contains(sound_id) {
                        dirty.push(sound_id.clone());
                    }
                }
                PlaybackEvent::OrderChanged => all_sounds = true,
                PlaybackEvent::VolumeChanged { level, .. } => volume = Some(*level),
                PlaybackEvent::PresetApplied { preset_id, .. } => applied = Some(preset_id.clone()),
                _ => {}
            }
        }

        if all_sounds {
            dirty = self.audio.catalog().iter().map(|s| s.id.clone()).collect();
        }
        for id in &dirty {
            self.persist_sound(id).await;
        }
        if let Some(level) = volume {
            self.write_setting(SETTING_GLOBAL_VOLUME, serde_json::json!(level))
                .await;
        }
        if let Some(id) = applied {
            self.write_setting(SETTING_LAST_ACTIVE_PRESET, serde_json::json!(id.as_str()))
                .await;
        }
        if mix_changed && self.presets.update_current_preset(&self.audio) {
            if let Err(e) = self.store.save_presets(self.presets.presets()).await {
                tracing::warn!("Failed to save presets: {}", e);
            }
        }

        if let Some(bridge) = self.bridge.as_mut() {
            bridge.update(self.audio.now_playing_info(self.presets.current()));
        }
        self.events.extend(events);
    }

    async fn persist_sound(&self, id: &SoundId) {
        let Some(file_name) = self.audio.sound(id).map(|s| s.file_name.clone()) else {
            return;
        };
        let Some(state) = self.audio.persistable_state(id) else {
            return;
        };
        if let Err(e) = self.store.set_sound_state(&file_name, &state).await {
            tracing::warn!(sound = %id, "Failed to save sound state: {}", e);
        }
    }

    async fn write_setting(&self, key: &str, value: serde_json::Value) {
        if let Err(e) = self.store.set_setting(key, &value).await {
            tracing::warn!(key, "Failed to save setting: {}", e);
        }
    }

    fn presets_changed(&mut self) {
        self.events.push(PlaybackEvent::PresetsChanged {
            count: self.presets.presets().len(),
        });
    }
}
