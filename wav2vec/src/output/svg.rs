//! SVG encoder
//!
//! One `<polyline>` per channel path. SVG's y axis grows downward, so sample
//! values are negated and shifted onto the centre line of their channel band.

use super::{DocumentLayout, PathEncoder};
use crate::audio::points::Point;
use crate::error::{Error, Result};
use std::io::Write;

/// Vector markup encoder
#[derive(Debug, Default)]
pub struct SvgEncoder {
    layout: Option<DocumentLayout>,
}

impl SvgEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn layout(&self) -> Result<&DocumentLayout> {
        self.layout.as_ref().ok_or_else(|| {
            Error::ContractViolation("SVG point written before the document preamble".to_string())
        })
    }
}

impl PathEncoder for SvgEncoder {
    fn name(&self) -> &'static str {
        "SVG"
    }

    fn document_preamble(&mut self, out: &mut dyn Write, layout: &DocumentLayout) -> Result<()> {
        write!(
            out,
            r#"<svg width="{}" height="{}" xmlns="http://www.w3.org/2000/svg" version="1.1">"#,
            layout.width,
            layout.canvas_height()
        )?;
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn document_postamble(&mut self, out: &mut dyn Write, _layout: &DocumentLayout) -> Result<()> {
        write!(out, "</svg>")?;
        Ok(())
    }

    fn path_preamble(&mut self, out: &mut dyn Write, _first: Point, _channel: usize) -> Result<()> {
        write!(
            out,
            r#"<polyline stroke="black" stroke-linecap="round" stroke-linejoin="round" fill="none" points=""#
        )?;
        Ok(())
    }

    fn path_postamble(&mut self, out: &mut dyn Write, _last: Point, _channel: usize) -> Result<()> {
        write!(out, r#"" />"#)?;
        Ok(())
    }

    fn point_to_text(&mut self, out: &mut dyn Write, point: Point, channel: usize) -> Result<()> {
        let y = -point.y + self.layout()?.y_offset(channel);
        write!(out, " {:.6}, {:.6}", point.x, y)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::ContainerParams;

    fn layout(channels: u16) -> DocumentLayout {
        DocumentLayout {
            params: ContainerParams::pcm(channels, 2, 8000, 4),
            width: 4,
            height: 100,
        }
    }

    #[test]
    fn test_document_header_sizes_canvas() {
        let mut encoder = SvgEncoder::new();
        let mut out = Vec::new();
        encoder.document_preamble(&mut out, &layout(2)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<svg width="4" height="200" xmlns="http://www.w3.org/2000/svg" version="1.1">"#
        );
    }

    #[test]
    fn test_points_inverted_into_channel_band() {
        let mut encoder = SvgEncoder::new();
        let mut out = Vec::new();
        encoder.document_preamble(&mut out, &layout(2)).unwrap();
        out.clear();
        encoder.point_to_text(&mut out, Point::new(1.0, 10.0), 0).unwrap();
        encoder.point_to_text(&mut out, Point::new(2.0, -10.0), 1).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " 1.000000, 40.000000 2.000000, 160.000000"
        );
    }

    #[test]
    fn test_path_wraps_polyline() {
        let mut encoder = SvgEncoder::new();
        let mut out = Vec::new();
        let origin = Point::new(0.0, 0.0);
        encoder.path_preamble(&mut out, origin, 0).unwrap();
        encoder.path_postamble(&mut out, origin, 0).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<polyline stroke="black" stroke-linecap="round" stroke-linejoin="round" fill="none" points="" />"#
        );
    }

    #[test]
    fn test_point_before_preamble_is_contract_violation() {
        let mut encoder = SvgEncoder::new();
        let result = encoder.point_to_text(&mut Vec::new(), Point::new(1.0, 1.0), 0);
        assert!(matches!(result, Err(Error::ContractViolation(_))));
    }
}
