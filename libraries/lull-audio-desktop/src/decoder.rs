//! Whole-file decoding with Symphonia
//!
//! Ambient loops are short, so each file is decoded once into memory as
//! interleaved stereo f32 at the device sample rate and looped from there.
//!
//! - Containers: anything Symphonia probes (OGG, MP3, FLAC, WAV, M4A, ...)
//! - Sample types: every Symphonia format, normalized to [-1.0, 1.0]
//! - Channels: mono is duplicated, extra channels are dropped

use crate::error::{AudioError, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Decode `path` to interleaved stereo at `target_rate`
pub fn decode_file(path: &Path, target_rate: u32) -> Result<Vec<f32>> {
    let file = File::open(path).map_err(|e| AudioError::decode(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::decode(path, e))?;
    let mut format_reader = probed.format;

    let track = format_reader
        .default_track()
        .ok_or_else(|| AudioError::decode(path, "no audio track"))?;
    let track_id = track.id;
    let source_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::decode(path, e))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AudioError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => samples.extend(convert_to_stereo_f32(decoded)),
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(path = %path.display(), "Skipping corrupt packet: {}", e);
            }
            Err(e) => return Err(AudioError::decode(path, e)),
        }
    }

    if samples.is_empty() {
        return Err(AudioError::decode(path, "file contains no audio"));
    }

    tracing::debug!(
        path = %path.display(),
        source_rate,
        target_rate,
        frames = samples.len() / 2,
        "Decoded sound"
    );

    if source_rate == target_rate {
        Ok(samples)
    } else {
        resample_stereo(&samples, source_rate, target_rate)
    }
}

/// Resample interleaved stereo in one pass
pub fn resample_stereo(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    let frames = samples.len() / 2;
    if frames == 0 {
        return Ok(Vec::new());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        target_rate as f64 / source_rate as f64,
        2.0,
        params,
        frames,
        2,
    )
    .map_err(|e| AudioError::ResampleError(e.to_string()))?;

    let mut planar = vec![Vec::with_capacity(frames); 2];
    for frame in samples.chunks_exact(2) {
        planar[0].push(frame[0]);
        planar[1].push(frame[1]);
    }

    let resampled = resampler
        .process(&planar, None)
        .map_err(|e| AudioError::ResampleError(e.to_string()))?;

    let output_frames = resampled[0].len();
    let mut interleaved = Vec::with_capacity(output_frames * 2);
    for frame_idx in 0..output_frames {
        interleaved.push(resampled[0][frame_idx]);
        interleaved.push(resampled[1][frame_idx]);
    }
    Ok(interleaved)
}

/// Interleave a planar buffer to stereo f32, duplicating mono
fn interleave_to_stereo<T, F>(buf: &symphonia::core::audio::AudioBuffer<T>, normalize: F) -> Vec<f32>
where
    T: symphonia::core::sample::Sample,
    F: Fn(T) -> f32,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    let mut output = Vec::with_capacity(frames * 2);

    for frame_idx in 0..frames {
        let left = normalize(buf.chan(0)[frame_idx]);
        let right = if channels > 1 {
            normalize(buf.chan(1)[frame_idx])
        } else {
            left
        };
        output.push(left);
        output.push(right);
    }
    output
}

fn convert_to_stereo_f32(decoded: AudioBufferRef) -> Vec<f32> {
    match decoded {
        AudioBufferRef::F32(buf) => interleave_to_stereo(&buf, |s| s),
        AudioBufferRef::F64(buf) => interleave_to_stereo(&buf, |s| s as f32),

        AudioBufferRef::S8(buf) => interleave_to_stereo(&buf, |s| s as f32 / i8::MAX as f32),
        AudioBufferRef::S16(buf) => interleave_to_stereo(&buf, |s| s as f32 / i16::MAX as f32),
        AudioBufferRef::S24(buf) => interleave_to_stereo(&buf, |s| s.inner() as f32 / 8388607.0),
        AudioBufferRef::S32(buf) => interleave_to_stereo(&buf, |s| s as f32 / i32::MAX as f32),

        AudioBufferRef::U8(buf) => {
            interleave_to_stereo(&buf, |s| (s as f32 / u8::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U16(buf) => {
            interleave_to_stereo(&buf, |s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U24(buf) => {
            interleave_to_stereo(&buf, |s| (s.inner() as f32 / 16777215.0) * 2.0 - 1.0)
        }
        AudioBufferRef::U32(buf) => {
            interleave_to_stereo(&buf, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0)
        }
    }
}
