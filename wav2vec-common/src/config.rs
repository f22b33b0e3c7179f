//! Configuration loading and config file resolution
//!
//! Render settings come from three layers, lowest priority first:
//! 1. Compiled defaults (`RenderSettings::default()`)
//! 2. TOML configuration file
//! 3. Command-line flags (applied by the binary)
//!
//! The TOML file itself is located by the priority order in [`resolve_config_path`].

use crate::{Error, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "WAV2VEC_CONFIG";

/// Configuration file loaded from TOML
///
/// Every section and field is optional; missing values fall back to the
/// compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Decoding and rendering parameters
    #[serde(default)]
    pub render: RenderSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters consumed by the decoder and output encoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Maximum output width; 0 disables horizontal scaling
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    /// Maximum output height per channel; 0 uses the full bit depth
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Frames decoded per block; 0 reads the whole file at once
    #[serde(default)]
    pub block_size: usize,

    /// Keep one sample out of every `downtoss` (must be >= 1)
    #[serde(default = "default_downtoss")]
    pub downtoss: usize,

    /// Output encoding
    #[serde(default)]
    pub format: OutputFormat,

    /// Force signed (true) or unsigned (false) 8-bit samples
    #[serde(default)]
    pub signed: Option<bool>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_max_width() -> u32 {
    1000
}

fn default_max_height() -> u32 {
    500
}

fn default_downtoss() -> usize {
    1
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_height: default_max_height(),
            block_size: 0,
            downtoss: default_downtoss(),
            format: OutputFormat::default(),
            signed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl RenderSettings {
    /// Reject settings the decoder cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.downtoss == 0 {
            return Err(Error::Config(
                "downtoss must be at least 1 (1 keeps every sample)".to_string(),
            ));
        }
        Ok(())
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.render.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read config {} failed: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }
}

/// Platform default configuration file path
///
/// `~/.config/wav2vec/config.toml` on Linux, the equivalent per-user config
/// directory elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wav2vec").join("config.toml"))
}

/// Locate the configuration file following the priority order:
/// 1. Explicit path (command-line argument)
/// 2. `WAV2VEC_CONFIG` environment variable
/// 3. Platform default config file, if it exists
///
/// Returns `None` when compiled defaults apply. Explicitly named files are
/// returned whether or not they exist, so that loading them reports the error.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform default location
    if let Some(path) = default_config_path() {
        if path.exists() {
            return Some(path);
        }
        debug!(path = %path.display(), "No config file at default location");
    }

    None
}

/// Load the configuration file chosen by [`resolve_config_path`], or the
/// compiled defaults when there is none
///
/// An explicitly named file that cannot be read is an error; a missing
/// default file is not.
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_path) {
        Some(path) => TomlConfig::load(&path),
        None => Ok(TomlConfig::default()),
    }
}
