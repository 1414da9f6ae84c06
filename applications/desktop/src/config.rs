/// Application configuration
use crate::error::{DesktopError, Result};
use lull_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name looked up in the working and config directories
pub const CONFIG_FILE_NAME: &str = "lull.toml";

/// Longest accepted pause between presets
const MAX_FADE_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LullConfig {
    #[serde(default = "default_audio")]
    pub audio: AudioSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_sounds")]
    pub sounds: SoundSettings,

    #[serde(default = "default_media")]
    pub media: MediaSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    /// Silence between the old mix and a newly applied preset
    #[serde(default = "default_fade_delay_ms")]
    pub fade_delay_ms: u64,

    /// Never start playing on launch, even if the last preset was playing
    #[serde(default = "default_always_start_paused")]
    pub always_start_paused: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundSettings {
    /// Directory scanned for sound files
    #[serde(default = "default_sounds_directory")]
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaSettings {
    /// Publish to the OS now-playing surface and accept media keys
    #[serde(default = "default_media_enabled")]
    pub enabled: bool,

    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl LullConfig {
    /// Load configuration from file and environment
    ///
    /// With an explicit `path` that file must exist. Otherwise `lull.toml`
    /// is read from the working directory, falling back to the user config
    /// directory, and skipped if neither exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => return Err(DesktopError::ConfigNotFound(path.to_path_buf())),
            None => default_config_candidates().into_iter().find(|p| p.exists()),
        };

        // Override with environment variables, e.g. LULL_AUDIO__FADE_DELAY_MS
        let env = config::Environment::with_prefix("LULL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        Self::from_sources(file.as_deref(), env)
    }

    pub(crate) fn from_sources(file: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Reading config file");
            settings = settings.add_source(config::File::from(file));
        }
        settings = settings.add_source(env);

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.fade_delay_ms > MAX_FADE_DELAY_MS {
            return Err(DesktopError::InvalidConfig(format!(
                "audio.fade_delay_ms must be at most {MAX_FADE_DELAY_MS}"
            )));
        }

        if !self.storage.database_url.starts_with("sqlite:") {
            return Err(DesktopError::InvalidConfig(format!(
                "storage.database_url must be a sqlite URL, got {:?}",
                self.storage.database_url
            )));
        }

        if self.media.display_name.trim().is_empty() {
            return Err(DesktopError::InvalidConfig(
                "media.display_name cannot be empty".to_string(),
            ));
        }

        if !self.sounds.directory.is_dir() {
            return Err(DesktopError::InvalidConfig(format!(
                "sounds directory {:?} does not exist (set LULL_SOUNDS__DIRECTORY)",
                self.sounds.directory
            )));
        }

        Ok(())
    }

    /// Settings for the playback layer
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            fade_delay: Duration::from_millis(self.audio.fade_delay_ms),
            always_start_paused: self.audio.always_start_paused,
            display_name: self.media.display_name.clone(),
            ..PlaybackConfig::default()
        }
    }

    /// Filesystem path of the database, if the URL names one
    pub fn database_path(&self) -> Option<PathBuf> {
        let path = self
            .storage
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.storage.database_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}

fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("lull").join(CONFIG_FILE_NAME));
    }
    candidates
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("lull"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

// Default values
fn default_audio() -> AudioSettings {
    AudioSettings {
        fade_delay_ms: default_fade_delay_ms(),
        always_start_paused: default_always_start_paused(),
    }
}

fn default_fade_delay_ms() -> u64 {
    100
}

fn default_always_start_paused() -> bool {
    true
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    format!("sqlite://{}", data_dir().join("lull.db").display())
}

fn default_sounds() -> SoundSettings {
    SoundSettings {
        directory: default_sounds_directory(),
    }
}

fn default_sounds_directory() -> PathBuf {
    data_dir().join("sounds")
}

fn default_media() -> MediaSettings {
    MediaSettings {
        enabled: default_media_enabled(),
        display_name: default_display_name(),
    }
}

fn default_media_enabled() -> bool {
    true
}

fn default_display_name() -> String {
    "Lull".to_string()
}

impl Default for LullConfig {
    fn default() -> Self {
        Self {
            audio: default_audio(),
            storage: default_storage(),
            sounds: default_sounds(),
            media: default_media(),
        }
    }
}
