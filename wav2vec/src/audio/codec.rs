//! Sample codec
//!
//! Maps a sample width and signedness to a fixed-width integer decode rule and
//! turns raw, frame-interleaved PCM bytes into integer samples.
//!
//! # Supported encodings
//!
//! - 8-bit unsigned (WAV convention) and 8-bit signed (AIFF convention)
//! - 16-bit signed
//! - 32-bit signed
//!
//! 24-bit and every other width are rejected with `UnsupportedSampleWidth`.

use super::types::Endianness;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Integer decode rule for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// 8-bit unsigned, silence at 128
    U8,
    /// 8-bit signed
    I8,
    /// 16-bit signed
    I16,
    /// 32-bit signed
    I32,
}

impl SampleFormat {
    /// Select the decode rule for `sample_width` bytes.
    ///
    /// `signed` only affects 8-bit samples; wider samples are always signed.
    pub fn select(sample_width: u16, signed: bool) -> Result<Self> {
        match (sample_width, signed) {
            (1, false) => Ok(SampleFormat::U8),
            (1, true) => Ok(SampleFormat::I8),
            (2, _) => Ok(SampleFormat::I16),
            (4, _) => Ok(SampleFormat::I32),
            (width, _) => Err(Error::UnsupportedSampleWidth(width)),
        }
    }

    /// Bytes per sample
    pub fn width(&self) -> usize {
        match self {
            SampleFormat::U8 | SampleFormat::I8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::I32 => 4,
        }
    }

    /// Whether samples are stored with an unsigned offset
    pub fn is_unsigned(&self) -> bool {
        matches!(self, SampleFormat::U8)
    }

    /// Short human-readable description, used in log output
    pub fn describe(&self) -> &'static str {
        match self {
            SampleFormat::U8 => "unsigned 8-bit",
            SampleFormat::I8 => "signed 8-bit",
            SampleFormat::I16 => "signed 16-bit",
            SampleFormat::I32 => "signed 32-bit",
        }
    }
}

/// Decode frame-interleaved PCM bytes into integer samples.
///
/// The result keeps the interleaving of the input:
/// `[ch0_frame0, ch1_frame0, ch0_frame1, ch1_frame1, ...]`.
///
/// # Errors
/// - `MalformedFrameData` if `bytes.len()` is not a whole number of frames
///   (`channel_count * format.width()` bytes each). Partial frames are never
///   tolerated.
pub fn decode_samples(
    bytes: &[u8],
    format: SampleFormat,
    endianness: Endianness,
    channel_count: u16,
) -> Result<Vec<i32>> {
    let frame_bytes = channel_count as usize * format.width();
    if frame_bytes == 0 {
        return Err(Error::MalformedFrameData(
            "frame layout declares zero channels".to_string(),
        ));
    }
    if bytes.len() % frame_bytes != 0 {
        return Err(Error::MalformedFrameData(format!(
            "{} bytes is not a whole number of {}-byte frames ({} channels x {} bytes)",
            bytes.len(),
            frame_bytes,
            channel_count,
            format.width()
        )));
    }

    Ok(match endianness {
        Endianness::Little => decode_with::<LittleEndian>(bytes, format),
        Endianness::Big => decode_with::<BigEndian>(bytes, format),
    })
}

fn decode_with<B: ByteOrder>(bytes: &[u8], format: SampleFormat) -> Vec<i32> {
    match format {
        SampleFormat::U8 => bytes.iter().map(|&b| b as i32).collect(),
        SampleFormat::I8 => bytes.iter().map(|&b| b as i8 as i32).collect(),
        SampleFormat::I16 => bytes
            .chunks_exact(2)
            .map(|c| B::read_i16(c) as i32)
            .collect(),
        SampleFormat::I32 => bytes.chunks_exact(4).map(B::read_i32).collect(),
    }
}
