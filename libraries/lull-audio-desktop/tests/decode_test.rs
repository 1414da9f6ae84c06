//! Decoding tests against generated WAV files

use lull_audio_desktop::{decode_file, AudioError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_wav(dir: &Path, name: &str, channels: u16, sample_rate: u32, frames: &[i16]) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for sample in frames {
        writer.write_sample(*sample).unwrap();
    }
    writer.finalize().unwrap();
    path
}

#[test]
fn mono_is_duplicated_to_stereo() {
    let dir = TempDir::new().unwrap();
    let samples: Vec<i16> = vec![i16::MAX / 2; 1000];
    let path = write_wav(dir.path(), "rain.wav", 1, 44100, &samples);

    let decoded = decode_file(&path, 44100).unwrap();

    assert_eq!(decoded.len(), 2000);
    for frame in decoded.chunks_exact(2) {
        assert_eq!(frame[0], frame[1]);
        assert!((frame[0] - 0.5).abs() < 0.01);
    }
}

#[test]
fn stereo_channels_stay_separate() {
    let dir = TempDir::new().unwrap();
    let samples: Vec<i16> = (0..500).flat_map(|_| [i16::MAX / 4, -i16::MAX / 4]).collect();
    let path = write_wav(dir.path(), "wind.wav", 2, 48000, &samples);

    let decoded = decode_file(&path, 48000).unwrap();

    assert_eq!(decoded.len(), 1000);
    assert!(decoded[0] > 0.2);
    assert!(decoded[1] < -0.2);
}

#[test]
fn decoding_resamples_to_the_device_rate() {
    let dir = TempDir::new().unwrap();
    let samples: Vec<i16> = (0..24000)
        .map(|i| ((i as f32 * 0.05).sin() * 8000.0) as i16)
        .collect();
    let path = write_wav(dir.path(), "stream.wav", 1, 24000, &samples);

    let decoded = decode_file(&path, 48000).unwrap();
    let frames = decoded.len() / 2;

    assert!((frames as i64 - 48000).abs() < 512, "got {frames} frames");
}

#[test]
fn non_audio_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.wav");
    std::fs::write(&path, b"this is not a wave file").unwrap();

    let result = decode_file(&path, 44100);

    assert!(matches!(result, Err(AudioError::DecodeError { .. })));
}
