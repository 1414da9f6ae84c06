//! Audio manager - core orchestration
//!
//! Owns the catalog, the output device, global play/pause, global volume and
//! the solo overlay. Every public operation leaves the device in sync with
//! the catalog: a voice is audible exactly when playback is running and the
//! sound is selected (or soloed, in solo mode).

use crate::{
    catalog::SoundCatalog,
    error::Result,
    events::PlaybackEvent,
    now_playing::compose_now_playing,
    solo::{SoloExit, SoloMode, SoloSnapshot},
    types::PlaybackConfig,
    volume::{perceptual_gain, Volume},
};
use lull_core::types::{
    NowPlayingInfo, Preset, Sound, SoundId, SoundState, StoredSoundState,
};
use lull_core::{LullError, SoundOutput};

/// Coordinates the sound mix and the platform device
pub struct AudioManager {
    catalog: SoundCatalog,
    output: Box<dyn SoundOutput>,

    // Global play/pause
    is_playing: bool,

    // Global volume, applied on top of every sound's own volume
    volume: Volume,

    solo: SoloMode,
    solo_volume: f32,
    display_name: String,

    // Event queue for UI synchronization and persistence
    pending_events: Vec<PlaybackEvent>,
}

impl AudioManager {
    /// Create a paused manager. Call [`load_sounds`](Self::load_sounds)
    /// before playing.
    pub fn new(catalog: SoundCatalog, output: Box<dyn SoundOutput>, config: &PlaybackConfig) -> Self {
        Self {
            catalog,
            output,
            is_playing: false,
            volume: Volume::default(),
            solo: SoloMode::new(),
            solo_volume: lull_core::types::clamp_volume(config.solo_volume),
            display_name: config.display_name.clone(),
            pending_events: Vec::new(),
        }
    }

    /// Register every catalog sound with the device
    ///
    /// Sounds that fail to load are logged and skipped; they stay in the
    /// catalog but never become audible. Returns how many loaded.
    pub fn load_sounds(&mut self) -> usize {
        let mut loaded = 0;
        for sound in self.catalog.iter() {
            match self.output.load(&sound.id, &sound.path) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!(
                    sound = %sound.id,
                    path = %sound.path.display(),
                    "Failed to load sound: {}",
                    e
                ),
            }
        }
        tracing::info!(loaded, total = self.catalog.len(), "Sounds loaded");
        loaded
    }

    // ===== Accessors =====

    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    pub fn sound(&self, id: &SoundId) -> Option<&Sound> {
        self.catalog.get(id)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    // ===== Playback Control =====

    /// Start or stop global playback
    ///
    /// Starting with nothing selected (and no solo) stays paused.
    pub fn set_playing(&mut self, playing: bool) {
        if playing {
            self.play_selected();
        } else {
            self.pause_all();
        }
    }

    pub fn toggle_playback(&mut self) {
        self.set_playing(!self.is_playing);
    }

    /// Play every selected sound and pause the rest
    ///
    /// In solo mode only the solo sound plays.
    pub fn play_selected(&mut self) {
        let should_play = self.solo.is_active() || self.catalog.has_selection();
        self.set_playing_flag(should_play);
        self.sync_output();
    }

    /// Pause every sound
    pub fn pause_all(&mut self) {
        self.set_playing_flag(false);
        self.sync_output();
    }

    // ===== Sounds =====

    /// Flip a sound's selection, returning the new state
    ///
    /// Toggling the solo sound leaves solo mode. Toggling any other sound
    /// during solo first leaves solo without resuming the mix.
    pub fn toggle_sound(&mut self, id: &SoundId) -> Result<bool> {
        self.catalog.require(id)?;

        if self.solo.is_solo(id) {
            self.exit_solo();
            return Ok(self.catalog.get(id).is_some_and(|s| s.is_selected));
        }
        if self.solo.is_active() {
            self.exit_solo_without_resuming();
        }

        let sound = self.catalog.require_mut(id)?;
        sound.is_selected = !sound.is_selected;
        if sound.is_selected {
            sound.is_hidden = false;
        }
        let selected = sound.is_selected;
        self.emit_sound_changed(id);

        if selected && !self.is_playing {
            self.play_selected();
        } else if !self.catalog.has_selection() {
            self.pause_all();
        } else {
            self.sync_output();
        }

        tracing::debug!(sound = %id, selected, "Sound toggled");
        Ok(selected)
    }

    /// Set a sound's volume (clamped to 0.0 - 1.0)
    pub fn set_sound_volume(&mut self, id: &SoundId, volume: f32) -> Result<()> {
        let sound = self.catalog.require_mut(id)?;
        sound.set_volume(volume);
        let volume = sound.volume;

        if self.output.is_playing(id) {
            let gain = self.effective_gain(volume);
            if let Err(e) = self.output.set_gain(id, gain) {
                tracing::warn!(sound = %id, "Failed to set gain: {}", e);
            }
        }
        self.emit_sound_changed(id);
        Ok(())
    }

    /// Hide or unhide a sound. Hidden sounds are deselected.
    pub fn set_sound_hidden(&mut self, id: &SoundId, hidden: bool) -> Result<()> {
        self.catalog.require(id)?;
        if hidden && self.solo.is_solo(id) {
            self.exit_solo();
        }
        if !self.catalog.set_hidden(id, hidden)? {
            return Ok(());
        }
        self.emit_sound_changed(id);

        if hidden && !self.solo.is_active() && !self.catalog.has_selection() {
            self.pause_all();
        } else {
            self.sync_output();
        }
        Ok(())
    }

    /// Move a visible sound within the custom order
    pub fn move_sound(&mut self, id: &SoundId, to_index: usize) -> Result<()> {
        self.catalog.move_sound(id, to_index)?;
        self.pending_events.push(PlaybackEvent::OrderChanged);
        Ok(())
    }

    pub fn reset_order(&mut self) {
        self.catalog.reset_order();
        self.pending_events.push(PlaybackEvent::OrderChanged);
    }

    /// Deselect everything, reset every volume to full and pause
    pub fn reset_sounds(&mut self) {
        self.exit_solo_without_resuming();

        let mut changed = Vec::new();
        for sound in self.catalog.iter_mut() {
            if sound.is_selected || sound.volume != Sound::DEFAULT_VOLUME {
                sound.is_selected = false;
                sound.volume = Sound::DEFAULT_VOLUME;
                changed.push(sound.id.clone());
            }
        }
        for id in &changed {
            self.emit_sound_changed(id);
        }
        self.pause_all();
        tracing::info!(changed = changed.len(), "Sounds reset");
    }

    /// Apply preset tuples and an optional custom order
    ///
    /// Does not touch playback; callers pause before and resume after.
    pub fn apply_preset_states(&mut self, states: &[SoundState], order: Option<&[String]>) {
        let changed = self.catalog.apply_states(states);
        for id in &changed {
            self.emit_sound_changed(id);
        }
        if let Some(order) = order {
            if self.catalog.apply_order(order) {
                self.pending_events.push(PlaybackEvent::OrderChanged);
            }
        }
        self.sync_output();
    }

    /// Restore persisted state of one sound without emitting events
    pub fn restore_sound(&mut self, id: &SoundId, stored: StoredSoundState) -> Result<()> {
        self.catalog.restore(id, stored)
    }

    // ===== Global Volume =====

    /// Set global volume (0.0 - 1.0)
    pub fn set_global_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_global_volume();
    }

    pub fn global_volume(&self) -> f32 {
        self.volume.level()
    }

    /// Global attenuation in dB, at the floor while muted
    pub fn global_volume_db(&self) -> f32 {
        self.volume.to_db()
    }

    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_global_volume();
    }

    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_global_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_global_volume();
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    // ===== Solo Mode =====

    /// Make one sound the only audible voice
    ///
    /// Starts playback if it was paused. Switching solo from one sound to
    /// another restores the first sound but keeps the original notion of
    /// whether playback was running before solo began. Hidden sounds cannot
    /// be soloed.
    pub fn enter_solo(&mut self, id: &SoundId) -> Result<()> {
        if self.catalog.require(id)?.is_hidden {
            return Err(LullError::invalid_input(format!(
                "cannot solo hidden sound '{id}'"
            ))
            .into());
        }
        if self.solo.is_solo(id) {
            return Ok(());
        }

        let mut resumed_playback = !self.is_playing;
        if let Some(previous) = self.solo.take() {
            resumed_playback = previous.resumed_playback;
            self.restore_snapshot_values(&previous);
        }

        let solo_volume = self.solo_volume;
        let sound = self.catalog.require_mut(id)?;
        let snapshot = SoloSnapshot {
            sound_id: id.clone(),
            original_volume: sound.volume,
            original_selected: sound.is_selected,
            resumed_playback,
        };
        sound.is_selected = true;
        sound.set_volume(solo_volume);
        self.solo.enter(snapshot);
        self.emit_sound_changed(id);

        self.set_playing_flag(true);
        self.sync_output();

        self.pending_events.push(PlaybackEvent::SoloModeChanged {
            sound_id: Some(id.clone()),
        });
        tracing::debug!(sound = %id, resumed_playback, "Entered solo mode");
        Ok(())
    }

    /// Leave solo mode and put the previous mix back
    ///
    /// Returns false if solo mode was not active.
    pub fn exit_solo(&mut self) -> bool {
        self.leave_solo(true)
    }

    /// Leave solo mode, restore values and stay silent
    ///
    /// Used before operations that take over playback themselves.
    pub fn exit_solo_without_resuming(&mut self) -> bool {
        self.leave_solo(false)
    }

    /// Enter solo for `id`, or leave it if `id` is already soloed
    pub fn toggle_solo(&mut self, id: &SoundId) -> Result<()> {
        if self.solo.is_solo(id) {
            self.exit_solo();
            Ok(())
        } else {
            self.enter_solo(id)
        }
    }

    pub fn solo_sound(&self) -> Option<&SoundId> {
        self.solo.sound_id()
    }

    pub fn is_solo_active(&self) -> bool {
        self.solo.is_active()
    }

    // ===== State Export =====

    /// Preset tuples for the mix as the user built it
    ///
    /// During solo, the solo sound reports its pre-solo values.
    pub fn mix_snapshot(&self) -> Vec<SoundState> {
        let mut states = self.catalog.snapshot();
        if let Some(snapshot) = self.solo.snapshot() {
            if let Some(sound) = self.catalog.get(&snapshot.sound_id) {
                if let Some(state) = states.iter_mut().find(|s| s.file_name == sound.file_name) {
                    state.is_selected = snapshot.original_selected;
                    state.volume = snapshot.original_volume;
                }
            }
        }
        states
    }

    /// State of one sound to persist, ignoring the solo overlay
    pub fn persistable_state(&self, id: &SoundId) -> Option<StoredSoundState> {
        let mut stored = self.catalog.stored_state(id)?;
        if let Some(snapshot) = self.solo.snapshot().filter(|s| &s.sound_id == id) {
            stored.is_selected = snapshot.original_selected;
            stored.volume = snapshot.original_volume;
        }
        Some(stored)
    }

    /// Compose now-playing metadata for the current mix
    pub fn now_playing_info(&self, preset: Option<&Preset>) -> NowPlayingInfo {
        compose_now_playing(self, preset)
    }

    // ===== Events =====

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub(crate) fn push_event(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    // ===== Internal =====

    fn leave_solo(&mut self, resume: bool) -> bool {
        let Some(snapshot) = self.solo.take() else {
            return false;
        };
        self.restore_snapshot_values(&snapshot);

        match snapshot.exit_action(resume, self.is_playing) {
            SoloExit::ResumeMix => self.play_selected(),
            SoloExit::ReturnToPaused | SoloExit::Silent => self.pause_all(),
        }

        self.pending_events
            .push(PlaybackEvent::SoloModeChanged { sound_id: None });
        tracing::debug!(sound = %snapshot.sound_id, resume, "Left solo mode");
        true
    }

    fn restore_snapshot_values(&mut self, snapshot: &SoloSnapshot) {
        if let Some(sound) = self.catalog.get_mut(&snapshot.sound_id) {
            sound.is_selected = snapshot.original_selected && !sound.is_hidden;
            sound.set_volume(snapshot.original_volume);
            self.emit_sound_changed(&snapshot.sound_id);
        }
    }

    fn set_playing_flag(&mut self, playing: bool) {
        if self.is_playing != playing {
            self.is_playing = playing;
            self.pending_events
                .push(PlaybackEvent::StateChanged { is_playing: playing });
            tracing::debug!(is_playing = playing, "Playback state changed");
        }
    }

    fn effective_gain(&self, volume: f32) -> f32 {
        perceptual_gain(volume) * self.volume.gain()
    }

    /// Bring every voice in line with the catalog
    fn sync_output(&mut self) {
        let solo = self.solo.sound_id().cloned();
        let plan: Vec<(SoundId, bool, f32)> = self
            .catalog
            .iter()
            .map(|s| {
                let wanted = match &solo {
                    Some(id) => &s.id == id,
                    None => s.is_selected,
                };
                (s.id.clone(), self.is_playing && wanted, s.volume)
            })
            .collect();

        for (id, audible, volume) in plan {
            if audible {
                let gain = self.effective_gain(volume);
                let result = self
                    .output
                    .set_gain(&id, gain)
                    .and_then(|()| self.output.play(&id));
                if let Err(e) = result {
                    tracing::warn!(sound = %id, "Failed to start voice: {}", e);
                }
            } else if self.output.is_playing(&id) {
                if let Err(e) = self.output.pause(&id) {
                    tracing::warn!(sound = %id, "Failed to pause voice: {}", e);
                }
            }
        }
    }

    fn apply_global_volume(&mut self) {
        let voices: Vec<(SoundId, f32)> = self
            .catalog
            .iter()
            .filter(|s| self.output.is_playing(&s.id))
            .map(|s| (s.id.clone(), s.volume))
            .collect();
        for (id, volume) in voices {
            let gain = self.effective_gain(volume);
            if let Err(e) = self.output.set_gain(&id, gain) {
                tracing::warn!(sound = %id, "Failed to set gain: {}", e);
            }
        }
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_sound_changed(&mut self, id: &SoundId) {
        if let Some(sound) = self.catalog.get(id) {
            self.pending_events.push(PlaybackEvent::SoundChanged {
                sound_id: id.clone(),
                is_selected: sound.is_selected,
                volume: sound.volume,
                is_hidden: sound.is_hidden,
            });
        }
    }
}
