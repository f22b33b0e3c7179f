//! Fixture generation shared by the integration tests
//!
//! WAV files are written with hound; AIFF files are assembled by hand since
//! no AIFF writer is available.

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wav2vec::audio::container::FileSource;
use wav2vec::audio::decoder::{DecoderOptions, WaveformDecoder};

pub const TEST_SAMPLE_RATE: u32 = 44100;

/// 44100 Hz as an 80-bit extended float
const RATE_44100_EXTENDED: [u8; 10] = [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0];

/// Write an integer PCM WAV file with interleaved `samples`
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    channels: u16,
    bits_per_sample: u16,
    samples: &[i32],
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate: TEST_SAMPLE_RATE,
        bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Interleaved sine; channels after the first carry the inverted wave
pub fn sine_samples(frames: usize, channels: u16) -> Vec<i32> {
    (0..frames)
        .flat_map(|i| {
            let v = (i as f64 * 0.05).sin() * 16000.0;
            (0..channels).map(move |c| if c == 0 { v as i32 } else { -(v as i32) })
        })
        .collect()
}

/// Assemble an AIFF (or AIFF-C when `compression` is given) file in memory
pub fn aiff_bytes(
    channels: u16,
    sample_size: u16,
    compression: Option<(&[u8; 4], &str)>,
    sound_data: &[u8],
) -> Vec<u8> {
    let frame_bytes = channels as usize * ((sample_size as usize + 7) / 8);
    let frames = (sound_data.len() / frame_bytes) as u32;

    let mut comm = Vec::new();
    comm.extend_from_slice(&channels.to_be_bytes());
    comm.extend_from_slice(&frames.to_be_bytes());
    comm.extend_from_slice(&sample_size.to_be_bytes());
    comm.extend_from_slice(&RATE_44100_EXTENDED);
    if let Some((id, name)) = compression {
        comm.extend_from_slice(id);
        comm.push(name.len() as u8);
        comm.extend_from_slice(name.as_bytes());
        if name.len() % 2 == 0 {
            comm.push(0);
        }
    }

    let mut body = Vec::new();
    body.extend_from_slice(if compression.is_some() { b"AIFC" } else { b"AIFF" });
    body.extend_from_slice(b"COMM");
    body.extend_from_slice(&(comm.len() as u32).to_be_bytes());
    body.extend_from_slice(&comm);
    body.extend_from_slice(b"SSND");
    body.extend_from_slice(&(8 + sound_data.len() as u32).to_be_bytes());
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(sound_data);
    if sound_data.len() % 2 != 0 {
        body.push(0);
    }

    let mut file = Vec::new();
    file.extend_from_slice(b"FORM");
    file.extend_from_slice(&(body.len() as u32).to_be_bytes());
    file.extend_from_slice(&body);
    file
}

/// Temp directory holding one WAV fixture
pub fn wav_fixture(channels: u16, bits_per_sample: u16, samples: &[i32]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixture.wav");
    write_wav(&path, channels, bits_per_sample, samples).unwrap();
    (dir, path)
}

/// Temp directory holding one AIFF fixture
pub fn aiff_fixture(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixture.aiff");
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

/// Decoder over a sniffed file
pub fn decoder_for(path: &Path, options: DecoderOptions) -> WaveformDecoder {
    let source = FileSource::detect(path).unwrap();
    WaveformDecoder::new(Box::new(source), options)
}

/// Options with a fixed height so scaled values stay exact
pub fn options(max_height: u64, block_size: usize) -> DecoderOptions {
    DecoderOptions {
        max_height,
        block_size,
        ..DecoderOptions::default()
    }
}
