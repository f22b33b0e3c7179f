//! Core audio data types
//!
//! Container parameters and the per-family encoding conventions shared by the
//! container readers, the sample codec and the decoder.

use serde::Serialize;

/// Parameters read from a container header at open time
///
/// Immutable for the lifetime of an open decoder session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerParams {
    /// Number of interleaved channels per frame
    pub channel_count: u16,

    /// Bytes per sample (1, 2 or 4 are decodable)
    pub sample_width: u16,

    /// Frames per second
    pub frame_rate: u32,

    /// Total number of frames in the sound data
    pub frame_count: u64,

    /// Compression identifier ("NONE" for plain PCM)
    pub compression_type: String,

    /// Human-readable compression name
    pub compression_name: String,
}

impl ContainerParams {
    /// Uncompressed PCM parameters
    pub fn pcm(channel_count: u16, sample_width: u16, frame_rate: u32, frame_count: u64) -> Self {
        Self {
            channel_count,
            sample_width,
            frame_rate,
            frame_count,
            compression_type: "NONE".to_string(),
            compression_name: "not compressed".to_string(),
        }
    }

    /// Sample width in bits
    pub fn bit_depth(&self) -> u32 {
        self.sample_width as u32 * 8
    }

    /// Bytes occupied by one frame (one sample per channel)
    pub fn frame_bytes(&self) -> usize {
        self.channel_count as usize * self.sample_width as usize
    }

    /// Duration in seconds (0.0 when the frame rate is unknown)
    pub fn duration_seconds(&self) -> f64 {
        if self.frame_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 / self.frame_rate as f64
    }
}

/// Byte order of multi-byte samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endianness {
    Little,
    Big,
}

/// Supported container families
///
/// Each family fixes a default byte order and a default signedness for 8-bit
/// samples; both can be overridden through `DecoderOptions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    /// RIFF/WAVE: little-endian, 8-bit samples unsigned
    Wav,

    /// AIFF/AIFF-C: big-endian, 8-bit samples signed
    Aiff,
}

impl ContainerKind {
    /// Native byte order of the family
    pub fn default_endianness(&self) -> Endianness {
        match self {
            ContainerKind::Wav => Endianness::Little,
            ContainerKind::Aiff => Endianness::Big,
        }
    }

    /// Whether 8-bit samples are signed by convention
    pub fn signed_8bit(&self) -> bool {
        match self {
            ContainerKind::Wav => false,
            ContainerKind::Aiff => true,
        }
    }

    /// Human-readable family name
    pub fn name(&self) -> &'static str {
        match self {
            ContainerKind::Wav => "WAV",
            ContainerKind::Aiff => "AIFF",
        }
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
