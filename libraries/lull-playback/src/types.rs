//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the playback layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Silence between pausing the old mix and starting a new preset
    /// (default: 100ms)
    pub fade_delay: Duration,

    /// Never resume playback automatically at launch (default: true)
    pub always_start_paused: bool,

    /// Volume a sound is raised to while in solo mode (default: 1.0)
    pub solo_volume: f32,

    /// Name shown in OS media controls (default: "Lull")
    pub display_name: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fade_delay: Duration::from_millis(100),
            always_start_paused: true,
            solo_volume: 1.0,
            display_name: "Lull".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.fade_delay, Duration::from_millis(100));
        assert!(config.always_start_paused);
        assert_eq!(config.solo_volume, 1.0);
        assert_eq!(config.display_name, "Lull");
    }
}
