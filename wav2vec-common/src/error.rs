//! Common error types for wav2vec

use thiserror::Error;

/// Common result type for wav2vec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the wav2vec crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
