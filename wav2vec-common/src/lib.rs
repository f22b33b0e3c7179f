//! # wav2vec Common Library
//!
//! Shared code for the wav2vec crates including:
//! - Output format selection (OutputFormat enum)
//! - Render settings and TOML configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod format;

pub use error::{Error, Result};
pub use format::OutputFormat;
