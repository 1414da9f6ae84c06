//! Desktop sound output for Lull
//!
//! Implements [`lull_core::SoundOutput`] on top of CPAL. Sound files are
//! decoded up front with Symphonia, resampled to the device rate with
//! Rubato, and looped by a mixer running inside the audio callback.
//!
//! Most hosts should only need [`CpalOutput`]:
//!
//! ```rust,no_run
//! use lull_audio_desktop::CpalOutput;
//! use lull_core::{SoundId, SoundOutput};
//! use std::path::Path;
//!
//! let mut output = CpalOutput::new()?;
//! let rain = SoundId::new("rain");
//! output.load(&rain, Path::new("/sounds/rain.ogg"))?;
//! output.set_gain(&rain, 0.5)?;
//! output.play(&rain)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decoder;
mod error;
pub mod mixer;
mod output;

pub use decoder::{decode_file, resample_stereo};
pub use error::{AudioError, Result};
pub use mixer::{Mixer, MixerCommand};
pub use output::CpalOutput;
