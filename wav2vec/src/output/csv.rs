//! CSV encoder
//!
//! Each channel path starts with a `Channel #n` line and an `X, Y` header,
//! followed by one row per point. Values are written unshifted.

use super::{DocumentLayout, PathEncoder};
use crate::audio::points::Point;
use crate::error::Result;
use std::io::Write;

/// Tabular text encoder
#[derive(Debug, Default)]
pub struct CsvEncoder;

impl CsvEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl PathEncoder for CsvEncoder {
    fn name(&self) -> &'static str {
        "CSV"
    }

    fn document_preamble(&mut self, _out: &mut dyn Write, _layout: &DocumentLayout) -> Result<()> {
        Ok(())
    }

    fn document_postamble(&mut self, _out: &mut dyn Write, _layout: &DocumentLayout) -> Result<()> {
        Ok(())
    }

    fn path_preamble(&mut self, out: &mut dyn Write, _first: Point, channel: usize) -> Result<()> {
        write!(out, "Channel #{}\nX, Y\n", channel + 1)?;
        Ok(())
    }

    fn path_postamble(&mut self, _out: &mut dyn Write, _last: Point, _channel: usize) -> Result<()> {
        Ok(())
    }

    fn point_to_text(&mut self, out: &mut dyn Write, point: Point, _channel: usize) -> Result<()> {
        writeln!(out, "{:.6}, {:.6}", point.x, point.y)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_header_is_one_based() {
        let mut out = Vec::new();
        CsvEncoder::new()
            .path_preamble(&mut out, Point::new(0.0, 0.0), 1)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Channel #2\nX, Y\n");
    }

    #[test]
    fn test_rows_keep_sign() {
        let mut encoder = CsvEncoder::new();
        let mut out = Vec::new();
        encoder.point_to_text(&mut out, Point::new(1.0, -2.5), 0).unwrap();
        encoder.point_to_text(&mut out, Point::new(2.0, 0.125), 0).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1.000000, -2.500000\n2.000000, 0.125000\n"
        );
    }
}
