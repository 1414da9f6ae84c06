//! Looping voice mixer
//!
//! Runs inside the audio callback. Every voice loops its buffer forever;
//! play, pause and gain changes ramp over a few milliseconds so toggling a
//! sound never clicks.

use lull_core::SoundId;
use std::collections::HashMap;
use std::sync::Arc;

/// Gain ramp length in milliseconds
const RAMP_MS: u32 = 15;

/// Commands applied by the mixer at the start of each callback
#[derive(Debug)]
pub enum MixerCommand {
    /// Install (or replace) a voice's interleaved stereo samples
    Load { id: SoundId, samples: Arc<Vec<f32>> },
    Play(SoundId),
    Pause(SoundId),
    SetGain(SoundId, f32),
}

#[derive(Debug)]
struct Voice {
    samples: Arc<Vec<f32>>,
    /// Frame position in `samples`
    position: usize,
    /// Whether the voice should be heard
    active: bool,
    /// Requested gain
    gain: f32,
    /// Gain actually applied, ramping toward `gain` or silence
    current: f32,
}

impl Voice {
    fn target(&self) -> f32 {
        if self.active {
            self.gain
        } else {
            0.0
        }
    }

    /// Silent and not ramping
    fn is_idle(&self) -> bool {
        !self.active && self.current == 0.0
    }

    fn frames(&self) -> usize {
        self.samples.len() / 2
    }
}

/// Mixes looping stereo voices into a device buffer
#[derive(Debug)]
pub struct Mixer {
    voices: HashMap<SoundId, Voice>,
    ramp_step: f32,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        let ramp_frames = (sample_rate.max(1) * RAMP_MS / 1000).max(1);
        Self {
            voices: HashMap::new(),
            ramp_step: 1.0 / ramp_frames as f32,
        }
    }

    pub fn apply(&mut self, command: MixerCommand) {
        match command {
            MixerCommand::Load { id, samples } => {
                let previous = self.voices.remove(&id);
                self.voices.insert(
                    id,
                    Voice {
                        samples,
                        position: 0,
                        active: previous.as_ref().is_some_and(|v| v.active),
                        gain: previous.as_ref().map_or(1.0, |v| v.gain),
                        current: 0.0,
                    },
                );
            }
            MixerCommand::Play(id) => {
                if let Some(voice) = self.voices.get_mut(&id) {
                    voice.active = true;
                }
            }
            MixerCommand::Pause(id) => {
                if let Some(voice) = self.voices.get_mut(&id) {
                    voice.active = false;
                }
            }
            MixerCommand::SetGain(id, gain) => {
                if let Some(voice) = self.voices.get_mut(&id) {
                    voice.gain = gain.clamp(0.0, 1.0);
                }
            }
        }
    }

    /// Whether any voice is audible or fading out
    pub fn is_active(&self) -> bool {
        self.voices.values().any(|v| !v.is_idle())
    }

    /// Mix all voices into an interleaved buffer with `channels` channels
    ///
    /// Mono devices get the average of left and right; channels beyond the
    /// second stay silent.
    pub fn render(&mut self, output: &mut [f32], channels: usize) {
        output.fill(0.0);
        let channels = channels.max(1);
        let ramp_step = self.ramp_step;

        for voice in self.voices.values_mut() {
            if voice.is_idle() || voice.frames() == 0 {
                continue;
            }

            for frame in output.chunks_exact_mut(channels) {
                let target = voice.target();
                if voice.current < target {
                    voice.current = (voice.current + ramp_step).min(target);
                } else if voice.current > target {
                    voice.current = (voice.current - ramp_step).max(target);
                }
                if voice.is_idle() {
                    break;
                }

                let left = voice.samples[voice.position * 2] * voice.current;
                let right = voice.samples[voice.position * 2 + 1] * voice.current;
                voice.position = (voice.position + 1) % voice.frames();

                if channels == 1 {
                    frame[0] += (left + right) * 0.5;
                } else {
                    frame[0] += left;
                    frame[1] += right;
                }
            }
        }

        for sample in output.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}
