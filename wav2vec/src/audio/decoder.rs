//! Streaming waveform decoder
//!
//! Reads raw frames from an [`AudioContainer`], decodes them through the
//! sample codec and scales every retained sample into a bounded coordinate
//! space.
//!
//! # Lifecycle
//!
//! `Closed → open() → read_block()* → close() → Closed`
//!
//! - [`WaveformDecoder::open`] acquires a fresh container handle and fixes
//!   width, height and the sample format for the session
//! - [`WaveformDecoder::read_block`] returns one [`PointBatch`] per call, or
//!   `None` once every frame has been consumed
//! - [`WaveformDecoder::close`] releases the handle
//!
//! Prefer [`WaveformDecoder::session`], which opens the decoder and closes it
//! again when the returned guard is dropped, including on error paths.
//!
//! # Scaling
//!
//! - `width = max_width > 0 ? min(max_width, frame_count) : frame_count`
//! - `height = max_height > 0 ? min(max_height, 2^(bits-1)) : 2^bits - 1`
//! - `x' = x * min(1, width / frame_count)`
//! - `y' = (y - offset) * height / 2 / 2^(bits-1)`, where `offset` is
//!   `2^(bits-1)` for unsigned 8-bit samples and 0 otherwise

use super::codec::{decode_samples, SampleFormat};
use super::container::{AudioContainer, ContainerSource};
use super::points::{Point, PointBatch};
use super::types::{ContainerParams, Endianness};
use crate::error::{Error, Result};
use tracing::{debug, info, warn};
use wav2vec_common::config::RenderSettings;

/// Decoder settings fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderOptions {
    /// Largest x coordinate after scaling (0 = frame count, no scaling)
    pub max_width: u64,

    /// Largest canvas height per channel (0 = full bit depth range)
    pub max_height: u64,

    /// Frames per [`WaveformDecoder::next_batch`] call (0 = whole file)
    pub block_size: usize,

    /// Keep one sample out of every `downtoss` (must be at least 1)
    pub downtoss: usize,

    /// Force 8-bit samples signed or unsigned (None = container convention)
    pub signed: Option<bool>,

    /// Force the sample byte order (None = container convention)
    pub endianness: Option<Endianness>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width: 0,
            max_height: 0,
            block_size: 0,
            downtoss: 1,
            signed: None,
            endianness: None,
        }
    }
}

impl From<&RenderSettings> for DecoderOptions {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            max_width: settings.max_width as u64,
            max_height: settings.max_height as u64,
            block_size: settings.block_size,
            downtoss: settings.downtoss,
            signed: settings.signed,
            endianness: None,
        }
    }
}

/// Per-session state, present only while the decoder is open
struct OpenState {
    container: Box<dyn AudioContainer>,
    params: ContainerParams,
    width: u64,
    height: u64,
    sample_format: SampleFormat,
    endianness: Endianness,
    /// Next unread frame; the container's own position is never consulted
    frame_index: u64,
}

impl OpenState {
    fn scale_x(&self, x: f64) -> f64 {
        if self.params.frame_count == 0 {
            return x;
        }
        x * (self.width as f64 / self.params.frame_count as f64).min(1.0)
    }

    fn scale_y(&self, y: f64) -> f64 {
        let divisor = 2f64.powi(self.params.bit_depth() as i32 - 1);
        let scale = (self.height as f64 * 0.5) / divisor;
        let centred = if self.sample_format.is_unsigned() {
            y - divisor
        } else {
            y
        };
        centred * scale
    }
}

/// Streaming decoder from container frames to scaled per-channel points
pub struct WaveformDecoder {
    source: Box<dyn ContainerSource>,
    options: DecoderOptions,
    state: Option<OpenState>,
}

impl WaveformDecoder {
    /// Create a closed decoder over `source`
    pub fn new(source: Box<dyn ContainerSource>, options: DecoderOptions) -> Self {
        info!(source = %source.describe(), "Waveform decoder initialized");
        Self {
            source,
            options,
            state: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Open a fresh container handle and compute the session parameters.
    ///
    /// Reopening an open decoder releases the previous handle first and
    /// restarts at frame 0.
    ///
    /// # Errors
    /// - Container errors from the source (`Io`, `UnsupportedContainer`)
    /// - `UnsupportedSampleWidth` if the sample width is not 1, 2 or 4 bytes
    /// - `ContractViolation` if `downtoss` is 0
    pub fn open(&mut self) -> Result<()> {
        if self.options.downtoss == 0 {
            return Err(Error::ContractViolation(
                "downtoss must be at least 1".to_string(),
            ));
        }
        if self.state.is_some() {
            self.close()?;
        }

        let mut container = self.source.open()?;
        let params = container.params().clone();
        let kind = container.kind();

        let signed = self.options.signed.unwrap_or_else(|| kind.signed_8bit());
        let sample_format = match SampleFormat::select(params.sample_width, signed) {
            Ok(format) => format,
            Err(e) => {
                if let Err(close_err) = container.close() {
                    warn!(error = %close_err, "Failed to close container after open error");
                }
                return Err(e);
            }
        };
        let endianness = self.options.endianness.unwrap_or_else(|| container.endianness());

        let bits = params.bit_depth();
        let width = if self.options.max_width > 0 {
            self.options.max_width.min(params.frame_count)
        } else {
            params.frame_count
        };
        let height = if self.options.max_height > 0 {
            self.options.max_height.min(1u64 << (bits - 1))
        } else {
            (1u64 << bits) - 1
        };

        debug!(width, height, "Canvas size set");
        debug!(format = sample_format.describe(), endianness = ?endianness, "Sample format selected");
        info!(
            source = %self.source.describe(),
            kind = %kind,
            channels = params.channel_count,
            frames = params.frame_count,
            "Opened waveform decoder"
        );

        self.state = Some(OpenState {
            container,
            params,
            width,
            height,
            sample_format,
            endianness,
            frame_index: 0,
        });
        Ok(())
    }

    /// Release the container handle.
    ///
    /// # Errors
    /// - `ContractViolation` if the decoder is not open
    pub fn close(&mut self) -> Result<()> {
        let mut state = self.state.take().ok_or_else(|| {
            Error::ContractViolation("close() called on a decoder that is not open".to_string())
        })?;
        state.container.close()?;
        debug!(source = %self.source.describe(), "Closed waveform decoder");
        Ok(())
    }

    /// Read and decode the next `block_size` frames (0 = all remaining).
    ///
    /// Returns `Ok(None)` once every declared frame has been consumed. A
    /// closed decoder is opened first.
    ///
    /// # Errors
    /// - `MalformedFrameData` if the container returns fewer bytes than the
    ///   requested whole frames
    pub fn read_block(&mut self, block_size: usize) -> Result<Option<PointBatch>> {
        if self.state.is_none() {
            info!("Decoder is not open; probably open() was not called. Opening it now");
            self.open()?;
        }
        let downtoss = self.options.downtoss;
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| Error::ContractViolation("decoder failed to open".to_string()))?;

        let remaining = state.params.frame_count.saturating_sub(state.frame_index);
        if remaining == 0 {
            debug!("No more frames");
            return Ok(None);
        }
        let frames = if block_size == 0 {
            remaining
        } else {
            (block_size as u64).min(remaining)
        };

        let frame_bytes = state.params.frame_bytes();
        let bytes = state.container.read_frames(frames as usize)?;
        let expected = frames as usize * frame_bytes;
        if bytes.len() != expected {
            return Err(Error::MalformedFrameData(format!(
                "expected {} bytes for {} frames at frame {}, got {}",
                expected,
                frames,
                state.frame_index,
                bytes.len()
            )));
        }
        debug!(frames, start = state.frame_index, "Read frames");

        let samples = decode_samples(
            &bytes,
            state.sample_format,
            state.endianness,
            state.params.channel_count,
        )?;

        let channel_count = state.params.channel_count as usize;
        let start = state.frame_index;
        // First local frame whose 1-indexed absolute position is 1 mod downtoss
        let first_kept = (downtoss - (start % downtoss as u64) as usize) % downtoss;

        let channels = (0..channel_count)
            .map(|chan| {
                samples
                    .iter()
                    .skip(chan)
                    .step_by(channel_count)
                    .enumerate()
                    .skip(first_kept)
                    .step_by(downtoss)
                    .map(|(i, &sample)| {
                        let x = (start + i as u64 + 1) as f64;
                        Point::new(state.scale_x(x), state.scale_y(sample as f64))
                    })
                    .collect()
            })
            .collect();

        state.frame_index += frames;

        Ok(Some(PointBatch {
            channels,
            start_frame: start,
            end_frame: state.frame_index,
            total_frames: state.params.frame_count,
        }))
    }

    /// Read the next block using the configured block size
    pub fn next_batch(&mut self) -> Result<Option<PointBatch>> {
        self.read_block(self.options.block_size)
    }

    /// Open the decoder and return a guard that closes it when dropped.
    ///
    /// The guard iterates over the remaining point batches exactly once.
    pub fn session(&mut self) -> Result<DecoderSession<'_>> {
        self.open()?;
        Ok(DecoderSession {
            decoder: self,
            finished: false,
        })
    }

    /// Scale an absolute 1-indexed frame position to the canvas width
    pub fn scale_x(&self, x: f64) -> Result<f64> {
        Ok(self.open_state()?.scale_x(x))
    }

    /// Scale a raw sample value to the canvas height
    pub fn scale_y(&self, y: f64) -> Result<f64> {
        Ok(self.open_state()?.scale_y(y))
    }

    pub fn params(&self) -> Option<&ContainerParams> {
        self.state.as_ref().map(|s| &s.params)
    }

    pub fn width(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.width)
    }

    pub fn height(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.height)
    }

    pub fn frame_index(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.frame_index)
    }

    pub fn sample_format(&self) -> Option<SampleFormat> {
        self.state.as_ref().map(|s| s.sample_format)
    }

    pub fn endianness(&self) -> Option<Endianness> {
        self.state.as_ref().map(|s| s.endianness)
    }

    fn open_state(&self) -> Result<&OpenState> {
        self.state
            .as_ref()
            .ok_or_else(|| Error::ContractViolation("decoder is not open".to_string()))
    }
}

impl Drop for WaveformDecoder {
    fn drop(&mut self) {
        if let Some(mut state) = self.state.take() {
            if let Err(e) = state.container.close() {
                warn!(error = %e, "Failed to close container on drop");
            }
        }
    }
}

/// An open decoder that closes itself on drop
///
/// Yields each remaining [`PointBatch`] once; after the end of the stream or
/// an error it only yields `None`.
pub struct DecoderSession<'a> {
    decoder: &'a mut WaveformDecoder,
    finished: bool,
}

impl<'a> DecoderSession<'a> {
    /// The decoder driven by this session
    pub fn decoder(&self) -> &WaveformDecoder {
        self.decoder
    }

    /// Close the decoder now, reporting any error from the container
    pub fn close(mut self) -> Result<()> {
        self.finished = true;
        if self.decoder.is_open() {
            self.decoder.close()?;
        }
        Ok(())
    }
}

impl Iterator for DecoderSession<'_> {
    type Item = Result<PointBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.decoder.next_batch() {
            Ok(Some(batch)) => Some(Ok(batch)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for DecoderSession<'_> {}

impl Drop for DecoderSession<'_> {
    fn drop(&mut self) {
        if self.decoder.is_open() {
            if let Err(e) = self.decoder.close() {
                warn!(error = %e, "Failed to close decoder at end of session");
            }
        }
    }
}
