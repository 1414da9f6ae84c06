//! In-memory sound output
//!
//! Records what the coordinator asked the device to do. Used in tests and in
//! headless mode. Clones share state, so a test can keep a handle after
//! boxing the output.

use lull_core::{LullError, Result, SoundId, SoundOutput};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Observed state of one voice
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSnapshot {
    pub path: PathBuf,
    pub playing: bool,
    pub gain: f32,
    /// How many times the voice went from paused to playing
    pub play_count: u32,
}

#[derive(Debug, Default)]
struct Inner {
    voices: HashMap<SoundId, VoiceSnapshot>,
    failing: HashSet<SoundId>,
}

/// Output that plays nothing and remembers everything
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loading `id` fail, as a missing or corrupt file would
    pub fn fail_load(&self, id: impl Into<SoundId>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failing.insert(id.into());
        }
    }

    pub fn voice(&self, id: &SoundId) -> Option<VoiceSnapshot> {
        self.inner.lock().ok()?.voices.get(id).cloned()
    }

    /// IDs of playing voices, sorted
    pub fn playing(&self) -> Vec<SoundId> {
        let Ok(inner) = self.inner.lock() else {
            return Vec::new();
        };
        let mut ids: Vec<SoundId> = inner
            .voices
            .iter()
            .filter(|(_, v)| v.playing)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| LullError::audio("memory output lock poisoned"))
    }

    fn with_voice<T>(
        &self,
        id: &SoundId,
        f: impl FnOnce(&mut VoiceSnapshot) -> T,
    ) -> Result<T> {
        let mut inner = self.lock()?;
        let voice = inner
            .voices
            .get_mut(id)
            .ok_or_else(|| LullError::audio(format!("voice not loaded: {id}")))?;
        Ok(f(voice))
    }
}

impl SoundOutput for MemoryOutput {
    fn load(&mut self, id: &SoundId, path: &Path) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.failing.contains(id) {
            return Err(LullError::audio(format!(
                "failed to decode {}",
                path.display()
            )));
        }
        inner.voices.insert(
            id.clone(),
            VoiceSnapshot {
                path: path.to_path_buf(),
                playing: false,
                gain: 1.0,
                play_count: 0,
            },
        );
        Ok(())
    }

    fn play(&mut self, id: &SoundId) -> Result<()> {
        self.with_voice(id, |voice| {
            if !voice.playing {
                voice.playing = true;
                voice.play_count += 1;
            }
        })
    }

    fn pause(&mut self, id: &SoundId) -> Result<()> {
        self.with_voice(id, |voice| voice.playing = false)
    }

    fn set_gain(&mut self, id: &SoundId, gain: f32) -> Result<()> {
        self.with_voice(id, |voice| voice.gain = gain)
    }

    fn is_playing(&self, id: &SoundId) -> bool {
        self.voice(id).is_some_and(|v| v.playing)
    }
}
