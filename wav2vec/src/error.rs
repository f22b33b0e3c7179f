//! Error types for wav2vec
//!
//! Defines the decode/render error taxonomy using thiserror. End of stream is
//! not an error: block reads return `Ok(None)` once every frame is consumed.

use thiserror::Error;

/// Main error type for the wav2vec library
#[derive(Error, Debug)]
pub enum Error {
    /// File type cannot be determined, or the container is not a supported
    /// uncompressed PCM family
    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),

    /// Sample width (in bytes) outside {1, 2, 4}
    #[error("Unsupported sample width: {0} bytes (supported: 8, 16 and 32-bit PCM)")]
    UnsupportedSampleWidth(u16),

    /// Byte buffer length inconsistent with the declared frame layout
    #[error("Malformed frame data: {0}")]
    MalformedFrameData(String),

    /// Decoder or encoder used out of lifecycle order (programming error)
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors from wav2vec-common
    #[error("Configuration error: {0}")]
    Config(#[from] wav2vec_common::Error),
}

/// Convenience Result type using wav2vec Error
pub type Result<T> = std::result::Result<T, Error>;
