//! Settings storage trait
//!
//! Local settings are last-write-wins: every write replaces the previous
//! value for its key, and presets are saved as a full list.

use crate::error::{LullError, Result};
use crate::types::{Preset, StoredSoundState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Global volume setting (0.0 - 1.0)
pub const SETTING_GLOBAL_VOLUME: &str = "playback.global_volume";

/// ID of the preset that was active when the app last ran
pub const SETTING_LAST_ACTIVE_PRESET: &str = "presets.last_active";

/// Settings key holding the persisted state of one sound
pub fn sound_setting_key(file_name: &str) -> String {
    format!("sound.{file_name}")
}

/// Persistent settings storage
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Get a raw setting value
    async fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Set a raw setting value (upsert)
    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// Delete a setting
    async fn delete_setting(&self, key: &str) -> Result<()>;

    /// Load all presets in their saved order
    async fn load_presets(&self) -> Result<Vec<Preset>>;

    /// Replace the saved preset list
    async fn save_presets(&self, presets: &[Preset]) -> Result<()>;

    /// Get the persisted state of one sound
    async fn get_sound_state(&self, file_name: &str) -> Result<Option<StoredSoundState>> {
        match self.get_setting(&sound_setting_key(file_name)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Persist the state of one sound
    async fn set_sound_state(&self, file_name: &str, state: &StoredSoundState) -> Result<()> {
        let value = serde_json::to_value(state)?;
        self.set_setting(&sound_setting_key(file_name), &value).await
    }
}

/// In-memory settings store
///
/// Used by tests and when the app runs without a database.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<HashMap<String, serde_json::Value>>,
    presets: Mutex<Vec<Preset>>,
    writes: Mutex<usize>,
}

impl MemorySettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of write operations performed so far
    pub fn writes(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    fn record_write(&self) -> Result<()> {
        let mut writes = self.writes.lock().map_err(poisoned)?;
        *writes += 1;
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> LullError {
    LullError::storage("settings lock poisoned")
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let settings = self.settings.lock().map_err(poisoned)?;
        Ok(settings.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.settings
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.clone());
        self.record_write()
    }

    async fn delete_setting(&self, key: &str) -> Result<()> {
        self.settings.lock().map_err(poisoned)?.remove(key);
        self.record_write()
    }

    async fn load_presets(&self) -> Result<Vec<Preset>> {
        Ok(self.presets.lock().map_err(poisoned)?.clone())
    }

    async fn save_presets(&self, presets: &[Preset]) -> Result<()> {
        *self.presets.lock().map_err(poisoned)? = presets.to_vec();
        self.record_write()
    }
}
