//! Solo mode
//!
//! While a sound is soloed it is the only audible voice. The overlay keeps
//! what the sound looked like before, so leaving solo can put the mix back.

use lull_core::types::SoundId;

/// State captured when a sound enters solo mode
#[derive(Debug, Clone, PartialEq)]
pub struct SoloSnapshot {
    pub sound_id: SoundId,
    pub original_volume: f32,
    pub original_selected: bool,
    /// Entering solo had to start global playback
    pub resumed_playback: bool,
}

/// What leaving solo does to global playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoloExit {
    /// Playback was running before solo: bring every selected sound back
    ResumeMix,
    /// Playback was paused before solo: go back to paused
    ReturnToPaused,
    /// Caller takes over playback; restore values and stay silent
    Silent,
}

impl SoloSnapshot {
    /// Decide how to leave solo mode
    ///
    /// `is_playing` is the global state at exit time. A mix paused during
    /// solo stays paused.
    pub fn exit_action(&self, resume: bool, is_playing: bool) -> SoloExit {
        match (resume, is_playing, self.resumed_playback) {
            (false, _, _) => SoloExit::Silent,
            (true, false, _) | (true, true, true) => SoloExit::ReturnToPaused,
            (true, true, false) => SoloExit::ResumeMix,
        }
    }
}

/// The solo overlay. At most one sound is soloed.
#[derive(Debug, Clone, Default)]
pub struct SoloMode {
    active: Option<SoloSnapshot>,
}

impl SoloMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn sound_id(&self) -> Option<&SoundId> {
        self.active.as_ref().map(|s| &s.sound_id)
    }

    pub fn is_solo(&self, id: &SoundId) -> bool {
        self.sound_id() == Some(id)
    }

    pub fn snapshot(&self) -> Option<&SoloSnapshot> {
        self.active.as_ref()
    }

    /// Install a snapshot, returning the one it replaces
    pub fn enter(&mut self, snapshot: SoloSnapshot) -> Option<SoloSnapshot> {
        self.active.replace(snapshot)
    }

    /// Leave solo mode, handing back the snapshot to restore
    pub fn take(&mut self) -> Option<SoloSnapshot> {
        self.active.take()
    }
}
