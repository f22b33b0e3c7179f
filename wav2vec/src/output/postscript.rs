//! PostScript encoder
//!
//! Writes a single-page program. The origin is moved to the top-left corner
//! and the y axis flipped, so channel bands stack downward as in SVG.
//!
//! A streamed single-channel path is resumed in every block with a `moveto` to
//! the last point drawn for that channel, which keeps the stroke continuous.

use super::{DocumentLayout, PathEncoder};
use crate::audio::points::Point;
use crate::error::{Error, Result};
use std::io::Write;

/// Page-description encoder
#[derive(Debug, Default)]
pub struct PostScriptEncoder {
    layout: Option<DocumentLayout>,
    /// Last point drawn per channel, in page coordinates
    last_points: Vec<Option<Point>>,
}

impl PostScriptEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn to_page(&self, point: Point, channel: usize) -> Result<Point> {
        let layout = self.layout.as_ref().ok_or_else(|| {
            Error::ContractViolation(
                "PostScript path written before the document preamble".to_string(),
            )
        })?;
        Ok(Point::new(point.x, -point.y + layout.y_offset(channel)))
    }

    fn remembered(&self, channel: usize) -> Option<Point> {
        self.last_points.get(channel).copied().flatten()
    }

    fn remember(&mut self, channel: usize, point: Point) {
        if self.last_points.len() <= channel {
            self.last_points.resize(channel + 1, None);
        }
        self.last_points[channel] = Some(point);
    }
}

impl PathEncoder for PostScriptEncoder {
    fn name(&self) -> &'static str {
        "PostScript"
    }

    fn document_preamble(&mut self, out: &mut dyn Write, layout: &DocumentLayout) -> Result<()> {
        let width = layout.width;
        let height = layout.canvas_height();
        writeln!(out, "%!PS-Adobe-3.0")?;
        writeln!(out, "%%BoundingBox: 0 0 {} {}", width, height)?;
        writeln!(out, "<< /PageSize [{} {}] >> setpagedevice", width, height)?;
        writeln!(out, "0 {} translate", height)?;
        writeln!(out, "1 -1 scale")?;
        writeln!(out, "newpath")?;
        self.layout = Some(layout.clone());
        self.last_points = vec![None; layout.params.channel_count as usize];
        Ok(())
    }

    fn document_postamble(&mut self, out: &mut dyn Write, _layout: &DocumentLayout) -> Result<()> {
        writeln!(out, "stroke")?;
        writeln!(out, "showpage")?;
        Ok(())
    }

    fn path_preamble(&mut self, out: &mut dyn Write, first: Point, channel: usize) -> Result<()> {
        let start = match self.remembered(channel) {
            Some(point) => point,
            None => self.to_page(first, channel)?,
        };
        writeln!(out, "{:.6} {:.6} moveto", start.x, start.y)?;
        Ok(())
    }

    fn path_postamble(&mut self, _out: &mut dyn Write, _last: Point, _channel: usize) -> Result<()> {
        Ok(())
    }

    fn point_to_text(&mut self, out: &mut dyn Write, point: Point, channel: usize) -> Result<()> {
        let page = self.to_page(point, channel)?;
        writeln!(out, "{:.6} {:.6} lineto", page.x, page.y)?;
        self.remember(channel, page);
        Ok(())
    }
}
