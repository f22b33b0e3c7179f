//! wav2vec - Main entry point
//!
//! Decodes a WAV or AIFF file and writes the waveform to stdout as SVG, CSV
//! or PostScript. Diagnostics go to stderr.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wav2vec::audio::container::FileSource;
use wav2vec::audio::decoder::{DecoderOptions, WaveformDecoder};
use wav2vec::audio::types::{ContainerParams, Endianness};
use wav2vec::output::{encoder_for, render};
use wav2vec_common::config::{load_config, resolve_config_path, RenderSettings};
use wav2vec_common::OutputFormat;

/// Byte order override accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EndianArg {
    Little,
    Big,
}

impl From<EndianArg> for Endianness {
    fn from(arg: EndianArg) -> Self {
        match arg {
            EndianArg::Little => Endianness::Little,
            EndianArg::Big => Endianness::Big,
        }
    }
}

/// Command-line arguments for wav2vec
#[derive(Parser, Debug)]
#[command(name = "wav2vec")]
#[command(about = "Convert WAV and AIFF audio waveforms to SVG, CSV or PostScript")]
#[command(version)]
struct Args {
    /// WAV or AIFF file to convert
    filename: PathBuf,

    /// Output format (SVG, CSV or PostScript)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Maximum output width (0 = one unit per frame)
    #[arg(long)]
    width: Option<u32>,

    /// Maximum output height per channel (0 = full bit depth)
    #[arg(long)]
    height: Option<u32>,

    /// Stream the file in blocks of this many frames (0 = read all at once)
    #[arg(long = "stream", value_name = "FRAMES")]
    block_size: Option<usize>,

    /// Keep one sample out of every N
    #[arg(long, value_name = "N")]
    downtoss: Option<usize>,

    /// Treat 8-bit samples as signed
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "unsigned")]
    signed: bool,

    /// Treat 8-bit samples as unsigned
    #[arg(long, action = ArgAction::SetTrue)]
    unsigned: bool,

    /// Override the sample byte order
    #[arg(long, value_enum)]
    endian: Option<EndianArg>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log", value_name = "LEVEL")]
    log_level: Option<String>,

    /// Configuration file (default: $WAV2VEC_CONFIG, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the container parameters as JSON instead of rendering
    #[arg(long)]
    info: bool,
}

/// Container parameters as printed by `--info`
#[derive(Serialize)]
struct ContainerInfo<'a> {
    #[serde(flatten)]
    params: &'a ContainerParams,
    duration_seconds: f64,
}

impl<'a> ContainerInfo<'a> {
    fn new(params: &'a ContainerParams) -> Self {
        Self {
            params,
            duration_seconds: params.duration_seconds(),
        }
    }
}

impl Args {
    /// Layer command-line values over the file/default settings
    fn apply_to(&self, settings: &mut RenderSettings) {
        if let Some(format) = self.format {
            settings.format = format;
        }
        if let Some(width) = self.width {
            settings.max_width = width;
        }
        if let Some(height) = self.height {
            settings.max_height = height;
        }
        if let Some(block_size) = self.block_size {
            settings.block_size = block_size;
        }
        if let Some(downtoss) = self.downtoss {
            settings.downtoss = downtoss;
        }
        if self.signed {
            settings.signed = Some(true);
        } else if self.unsigned {
            settings.signed = Some(false);
        }
    }
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level);

    // Config loading ran before the subscriber existed
    match &config_path {
        Some(path) => info!(path = %path.display(), "Using configuration file"),
        None => debug!("No configuration file; using compiled defaults"),
    }

    let mut settings = config.render;
    args.apply_to(&mut settings);
    settings.validate().context("Invalid render settings")?;
    debug!(?settings, "Effective render settings");

    let source = FileSource::detect(&args.filename)
        .with_context(|| format!("Failed to open {}", args.filename.display()))?;
    info!(path = %args.filename.display(), kind = %source.kind(), "Input file");

    let mut options = DecoderOptions::from(&settings);
    options.endianness = args.endian.map(Endianness::from);
    let mut decoder = WaveformDecoder::new(Box::new(source), options);

    let stdout = io::stdout();
    if args.info {
        decoder.open().context("Failed to read container header")?;
        let params = decoder
            .params()
            .context("Decoder has no parameters after open")?;
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &ContainerInfo::new(params))
            .context("Failed to write container info")?;
        writeln!(out)?;
        decoder.close()?;
        return Ok(());
    }

    let mut encoder = encoder_for(settings.format);
    let out = render(&mut decoder, encoder.as_mut(), BufWriter::new(stdout.lock()))
        .with_context(|| format!("Failed to render {} as {}", args.filename.display(), settings.format))?;
    out.into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush output")?;

    Ok(())
}
