//! Output format selection
//!
//! Names the three interchangeable output encodings a decoded waveform can be
//! rendered to. The encoders themselves live in the `wav2vec` crate; this enum
//! is shared so configuration files and the command line agree on spelling.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output encodings for a rendered waveform
///
/// - Svg: vector markup, one polyline per channel
/// - Csv: tabular text, one `x, y` row per point
/// - PostScript: page-description program with moveto/lineto paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// Vector markup (SVG)
    Svg,

    /// Tabular text (CSV)
    Csv,

    /// Page-description markup (PostScript)
    PostScript,
}

impl OutputFormat {
    /// Parse format from string
    ///
    /// Case-insensitive. Accepts the canonical names plus aliases:
    /// - 'svg', 'vector'
    /// - 'csv', 'tabular'
    /// - 'postscript', 'ps'
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "svg" | "vector" => Some(OutputFormat::Svg),
            "csv" | "tabular" => Some(OutputFormat::Csv),
            "postscript" | "ps" => Some(OutputFormat::PostScript),
            _ => None,
        }
    }

    /// Canonical name, as printed in help text and accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "SVG",
            OutputFormat::Csv => "CSV",
            OutputFormat::PostScript => "PostScript",
        }
    }

    /// All available output formats
    pub fn all_variants() -> &'static [OutputFormat] {
        &[OutputFormat::Svg, OutputFormat::Csv, OutputFormat::PostScript]
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Svg
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| {
            let expected: Vec<&str> = Self::all_variants().iter().map(|f| f.name()).collect();
            Error::InvalidInput(format!(
                "unknown output format '{}'; expected one of: {}",
                s,
                expected.join(", ")
            ))
        })
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.name().to_string()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
