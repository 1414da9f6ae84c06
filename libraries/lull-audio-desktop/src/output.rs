/// CPAL-based sound output
use crate::decoder::decode_file;
use crate::error::{AudioError, Result};
use crate::mixer::{Mixer, MixerCommand};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use lull_core::{LullError, SoundId, SoundOutput};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Capacity of the command channel to the audio callback
const COMMAND_CAPACITY: usize = 256;

/// Control messages for the thread that owns the stream
enum ThreadCommand {
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
struct VoiceState {
    playing: bool,
}

/// CPAL sound output
///
/// **Architecture**: a dedicated audio thread owns the CPAL Stream, which is
/// not `Send` on every platform. The mixer lives inside the stream callback
/// and receives voice commands over a lock-free channel that the callback
/// drains at the start of every buffer.
pub struct CpalOutput {
    /// Voice commands, drained by the audio callback
    command_tx: Sender<MixerCommand>,
    /// Stream lifetime control
    control_tx: Sender<ThreadCommand>,
    /// Sample rate of the output device
    sample_rate: u32,
    /// What the caller asked for, per voice
    voices: HashMap<SoundId, VoiceState>,
    _audio_thread: Option<JoinHandle<()>>,
}

impl CpalOutput {
    /// Open the default output device
    ///
    /// # Errors
    /// Returns an error if no device is available or the stream cannot start
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::DeviceNotFound)?;

        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate();
        let config = config.config();

        tracing::info!(
            sample_rate,
            channels = config.channels,
            "Opening audio output"
        );
        Self::with_device_and_config(device, config, sample_rate)
    }

    fn with_device_and_config(
        device: Device,
        config: StreamConfig,
        sample_rate: u32,
    ) -> Result<Self> {
        let (command_tx, command_rx) = bounded::<MixerCommand>(COMMAND_CAPACITY);
        let (control_tx, control_rx) = bounded::<ThreadCommand>(1);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let audio_thread = thread::Builder::new()
            .name("lull-audio".to_string())
            .spawn(move || {
                Self::audio_thread_run(
                    &device, &config, sample_rate, command_rx, control_rx, ready_tx,
                );
            })
            .map_err(|e| AudioError::DeviceError(e.to_string()))?;

        ready_rx.recv().map_err(|_| AudioError::ThreadStopped)??;

        Ok(Self {
            command_tx,
            control_tx,
            sample_rate,
            voices: HashMap::new(),
            _audio_thread: Some(audio_thread),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio thread main loop
    ///
    /// Builds and starts the stream, reports the outcome, then keeps the
    /// stream alive until shutdown.
    fn audio_thread_run(
        device: &Device,
        config: &StreamConfig,
        sample_rate: u32,
        command_rx: Receiver<MixerCommand>,
        control_rx: Receiver<ThreadCommand>,
        ready_tx: Sender<Result<()>>,
    ) {
        let stream = match Self::build_stream(device, config, sample_rate, command_rx) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));

        // Returns on Shutdown or when the output is dropped
        let _ = control_rx.recv();
        drop(stream);
        tracing::debug!("Audio thread stopped");
    }

    fn build_stream(
        device: &Device,
        config: &StreamConfig,
        sample_rate: u32,
        command_rx: Receiver<MixerCommand>,
    ) -> Result<Stream> {
        let channels = config.channels as usize;
        let mut mixer = Mixer::new(sample_rate);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                while let Ok(command) = command_rx.try_recv() {
                    mixer.apply(command);
                }
                mixer.render(data, channels);
            },
            |err| tracing::error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }

    fn send(&self, command: MixerCommand) -> lull_core::Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| LullError::from(AudioError::ThreadStopped))
    }

    fn require_loaded(&self, id: &SoundId) -> lull_core::Result<()> {
        if self.voices.contains_key(id) {
            Ok(())
        } else {
            Err(LullError::audio(format!("voice not loaded: {id}")))
        }
    }
}

impl SoundOutput for CpalOutput {
    fn load(&mut self, id: &SoundId, path: &Path) -> lull_core::Result<()> {
        let samples = decode_file(path, self.sample_rate)?;
        self.send(MixerCommand::Load {
            id: id.clone(),
            samples: Arc::new(samples),
        })?;
        self.voices.insert(id.clone(), VoiceState { playing: false });
        Ok(())
    }

    fn play(&mut self, id: &SoundId) -> lull_core::Result<()> {
        self.require_loaded(id)?;
        self.send(MixerCommand::Play(id.clone()))?;
        if let Some(voice) = self.voices.get_mut(id) {
            voice.playing = true;
        }
        Ok(())
    }

    fn pause(&mut self, id: &SoundId) -> lull_core::Result<()> {
        self.require_loaded(id)?;
        self.send(MixerCommand::Pause(id.clone()))?;
        if let Some(voice) = self.voices.get_mut(id) {
            voice.playing = false;
        }
        Ok(())
    }

    fn set_gain(&mut self, id: &SoundId, gain: f32) -> lull_core::Result<()> {
        self.require_loaded(id)?;
        self.send(MixerCommand::SetGain(id.clone(), gain))
    }

    fn is_playing(&self, id: &SoundId) -> bool {
        self.voices.get(id).is_some_and(|v| v.playing)
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        let _ = self.control_tx.send(ThreadCommand::Shutdown);
    }
}
