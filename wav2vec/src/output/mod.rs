//! Output encoders
//!
//! Every encoding follows the same lifecycle, driven once by [`Renderer`]:
//!
//! 1. `document_preamble` once before any data
//! 2. per batch and channel: `path_preamble` when a path opens, one
//!    `point_to_text` per point, `path_postamble` when the path closes
//! 3. `document_postamble` once after all data
//!
//! A single-channel stream keeps one path open across blocks. With more than
//! one channel each batch opens and closes one path per channel.

pub mod csv;
pub mod postscript;
pub mod svg;

use crate::audio::decoder::WaveformDecoder;
use crate::audio::points::{Point, PointBatch};
use crate::audio::types::ContainerParams;
use crate::error::{Error, Result};
use std::io::Write;
use tracing::{debug, info};
use wav2vec_common::OutputFormat;

pub use self::csv::CsvEncoder;
pub use self::postscript::PostScriptEncoder;
pub use self::svg::SvgEncoder;

/// Canvas geometry of an open decoder session
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub params: ContainerParams,
    pub width: u64,
    /// Height of one channel's band
    pub height: u64,
}

impl DocumentLayout {
    /// Capture the geometry of an open decoder.
    ///
    /// # Errors
    /// - `ContractViolation` if the decoder is not open
    pub fn for_decoder(decoder: &WaveformDecoder) -> Result<Self> {
        match (decoder.params(), decoder.width(), decoder.height()) {
            (Some(params), Some(width), Some(height)) => Ok(Self {
                params: params.clone(),
                width,
                height,
            }),
            _ => Err(Error::ContractViolation(
                "encoder invoked on a decoder that is not open".to_string(),
            )),
        }
    }

    /// Height of the whole canvas, channels stacked vertically
    pub fn canvas_height(&self) -> u64 {
        self.height * self.params.channel_count as u64
    }

    /// Vertical centre line of `channel`'s band
    pub fn y_offset(&self, channel: usize) -> f64 {
        self.height as f64 * channel as f64 + self.height as f64 / 2.0
    }
}

/// One output encoding
///
/// Implementations write their fragments straight to `out` and may keep
/// per-document state between calls; `document_preamble` starts a new
/// document and resets it.
pub trait PathEncoder {
    /// Encoding name for log output
    fn name(&self) -> &'static str;

    fn document_preamble(&mut self, out: &mut dyn Write, layout: &DocumentLayout) -> Result<()>;

    fn document_postamble(&mut self, out: &mut dyn Write, layout: &DocumentLayout) -> Result<()>;

    /// Open or resume `channel`'s path; `first` is the first point to follow
    fn path_preamble(&mut self, out: &mut dyn Write, first: Point, channel: usize) -> Result<()>;

    /// Close `channel`'s path; `last` is the last point written
    fn path_postamble(&mut self, out: &mut dyn Write, last: Point, channel: usize) -> Result<()>;

    fn point_to_text(&mut self, out: &mut dyn Write, point: Point, channel: usize) -> Result<()>;
}

/// Build the encoder for `format`
pub fn encoder_for(format: OutputFormat) -> Box<dyn PathEncoder> {
    match format {
        OutputFormat::Svg => Box::new(SvgEncoder::new()),
        OutputFormat::Csv => Box::new(CsvEncoder::new()),
        OutputFormat::PostScript => Box::new(PostScriptEncoder::new()),
    }
}

/// Open path bookkeeping for one channel
#[derive(Debug, Clone, Copy, Default)]
struct ChannelPath {
    open: bool,
    last: Option<Point>,
}

/// Drives a [`PathEncoder`] through the document lifecycle
pub struct Renderer<'e, W: Write> {
    encoder: &'e mut dyn PathEncoder,
    out: W,
    layout: Option<DocumentLayout>,
    paths: Vec<ChannelPath>,
}

impl<'e, W: Write> Renderer<'e, W> {
    pub fn new(encoder: &'e mut dyn PathEncoder, out: W) -> Self {
        Self {
            encoder,
            out,
            layout: None,
            paths: Vec::new(),
        }
    }

    /// Write the document preamble and reset all path state
    pub fn begin(&mut self, layout: &DocumentLayout) -> Result<()> {
        self.encoder.document_preamble(&mut self.out, layout)?;
        self.paths = vec![ChannelPath::default(); layout.params.channel_count as usize];
        self.layout = Some(layout.clone());
        Ok(())
    }

    /// Write one decoded batch.
    ///
    /// Channels with no retained points in this batch are skipped.
    ///
    /// # Errors
    /// - `ContractViolation` if called before [`Renderer::begin`]
    pub fn write_batch(&mut self, batch: &PointBatch) -> Result<()> {
        if self.layout.is_none() {
            return Err(Error::ContractViolation(
                "channel data received before the document preamble".to_string(),
            ));
        }
        if self.paths.len() < batch.channel_count() {
            self.paths.resize(batch.channel_count(), ChannelPath::default());
        }
        let multi_channel = batch.channel_count() > 1;

        for (channel, points) in batch.channels.iter().enumerate() {
            let path = &mut self.paths[channel];
            if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
                if multi_channel || !path.open {
                    self.encoder.path_preamble(&mut self.out, first, channel)?;
                    path.open = true;
                }
                for &point in points {
                    self.encoder.point_to_text(&mut self.out, point, channel)?;
                }
                path.last = Some(last);
            }
            if path.open && (multi_channel || batch.is_last()) {
                if let Some(last) = path.last {
                    self.encoder.path_postamble(&mut self.out, last, channel)?;
                }
                path.open = false;
            }
        }
        Ok(())
    }

    /// Close any path still open, write the document postamble and hand back
    /// the sink.
    pub fn finish(mut self) -> Result<W> {
        let layout = self.layout.take().ok_or_else(|| {
            Error::ContractViolation("document finished before it was started".to_string())
        })?;
        for (channel, path) in self.paths.iter_mut().enumerate() {
            if let (true, Some(last)) = (path.open, path.last) {
                self.encoder.path_postamble(&mut self.out, last, channel)?;
                path.open = false;
            }
        }
        self.encoder.document_postamble(&mut self.out, &layout)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Decode everything from `decoder` and write it to `out` with `encoder`.
///
/// The decoder is opened for the duration of the call and closed again on
/// every exit path. Returns the sink.
pub fn render<W: Write>(
    decoder: &mut WaveformDecoder,
    encoder: &mut dyn PathEncoder,
    out: W,
) -> Result<W> {
    let name = encoder.name();
    let mut session = decoder.session()?;
    let layout = DocumentLayout::for_decoder(session.decoder())?;
    debug!(
        encoder = name,
        width = layout.width,
        height = layout.canvas_height(),
        "Rendering document"
    );

    let mut renderer = Renderer::new(encoder, out);
    renderer.begin(&layout)?;
    let mut batches = 0usize;
    for batch in &mut session {
        renderer.write_batch(&batch?)?;
        batches += 1;
    }
    let out = renderer.finish()?;
    session.close()?;

    info!(encoder = name, batches, "Rendered document");
    Ok(out)
}

/// Render the whole document into a string
pub fn render_to_string(decoder: &mut WaveformDecoder, encoder: &mut dyn PathEncoder) -> Result<String> {
    let bytes = render(decoder, encoder, Vec::new())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
