//! # wav2vec
//!
//! Decode PCM audio (WAV and AIFF) and render the waveform as vector or
//! tabular graphics.
//!
//! **Pipeline:** container handle → sample codec (bytes → integers) →
//! waveform decoder (integers → scaled points, block by block) →
//! output encoder (points → SVG, CSV or PostScript text) → caller's sink.
//!
//! ```no_run
//! use wav2vec::audio::container::FileSource;
//! use wav2vec::audio::decoder::{DecoderOptions, WaveformDecoder};
//! use wav2vec::output::{encoder_for, render};
//! use wav2vec_common::OutputFormat;
//!
//! # fn main() -> wav2vec::Result<()> {
//! let source = FileSource::detect("input.wav")?;
//! let mut decoder = WaveformDecoder::new(Box::new(source), DecoderOptions::default());
//! let mut encoder = encoder_for(OutputFormat::Svg);
//! render(&mut decoder, encoder.as_mut(), std::io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod error;
pub mod output;

pub use error::{Error, Result};
