//! Volume control with logarithmic scaling
//!
//! Volumes are stored as linear sliders (0.0 - 1.0) and mapped to
//! -60 dB .. 0 dB before reaching the device, so equal slider steps sound
//! like equal loudness steps.

/// Bottom of the slider range in dB
pub const MIN_DB: f32 = -60.0;

/// Convert a 0.0 - 1.0 slider position to a linear gain multiplier
///
/// Formula: gain = 10^((level - 1) * 60 / 20)
/// - 0.0 → silent (exactly 0.0)
/// - 0.5 → -30 dB → 0.0316 gain
/// - 0.8 → -12 dB → 0.251 gain
/// - 1.0 →   0 dB → 1.0 gain (unity)
pub fn perceptual_gain(level: f32) -> f32 {
    let level = lull_core::types::clamp_volume(level);
    if level == 0.0 {
        return 0.0;
    }
    let db = (level - 1.0) * -MIN_DB;
    10.0_f32.powf(db / 20.0)
}

/// Global volume controller with mute
#[derive(Debug, Clone)]
pub struct Volume {
    /// Slider level (0.0 - 1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Cached linear gain multiplier
    linear_gain: f32,
}

impl Volume {
    /// Create new volume controller
    pub fn new(level: f32) -> Self {
        let level = lull_core::types::clamp_volume(level);
        Self {
            level,
            muted: false,
            linear_gain: perceptual_gain(level),
        }
    }

    /// Set volume level (0.0 - 1.0), clamped
    pub fn set_level(&mut self, level: f32) {
        self.level = lull_core::types::clamp_volume(level);
        self.linear_gain = perceptual_gain(self.level);
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear gain multiplier, 0.0 if muted
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.linear_gain
        }
    }

    /// Current attenuation in dB (for display)
    pub fn to_db(&self) -> f32 {
        if self.level == 0.0 || self.muted {
            MIN_DB
        } else {
            20.0 * self.linear_gain.log10()
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
