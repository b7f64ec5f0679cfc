//! PDF content stream generation for labels.
//!
//! This module provides:
//! - The four drawing primitives a label needs (frame transform, image,
//!   stroked rectangle, text line)
//! - String encoding for PDF (WinAnsi with octal escapes)
//! - Flate compression for image data

use anyhow::Result;
use std::io::Write;

use crate::layout::{Point, Rect};

/// Builder for a page content stream
pub struct ContentBuilder {
    pub content_parts: Vec<String>,
    font_name: String,
}

impl ContentBuilder {
    /// Create a new ContentBuilder drawing text with the given font resource
    pub fn new(font_name: String) -> Self {
        Self {
            content_parts: Vec::new(),
            font_name,
        }
    }

    /// Save the graphics state and concatenate `matrix` to the CTM
    pub fn push_transform(&mut self, matrix: [f64; 6]) {
        let [a, b, c, d, e, f] = matrix.map(fmt_num);
        self.content_parts
            .push(format!("q {} {} {} {} {} {} cm ", a, b, c, d, e, f));
    }

    /// Restore the graphics state saved by the matching `push_transform`
    pub fn pop_transform(&mut self) {
        self.content_parts.push("Q ".to_string());
    }

    /// Paint an image XObject scaled into `rect`
    pub fn draw_image(&mut self, xobject_name: &str, rect: Rect) {
        self.content_parts.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q ",
            fmt_num(rect.w),
            fmt_num(rect.h),
            fmt_num(rect.x),
            fmt_num(rect.y),
            xobject_name
        ));
    }

    /// Stroke the outline of `rect` without filling it
    pub fn stroke_rect(&mut self, rect: Rect) {
        self.content_parts.push(format!(
            "{} {} {} {} re S ",
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.w),
            fmt_num(rect.h)
        ));
    }

    /// Show one line of text with its baseline starting at `origin`
    pub fn draw_text(&mut self, value: &str, font_size: f64, origin: Point) {
        self.content_parts.push(format!(
            "BT 0 g /{} {} Tf {} {} Td ({}) Tj ET ",
            self.font_name,
            fmt_num(font_size),
            fmt_num(origin.x),
            fmt_num(origin.y),
            escape_pdf_string(value)
        ));
    }

    /// Build the final content bytes
    pub fn build_content_bytes(&self) -> Vec<u8> {
        self.content_parts.join("").into_bytes()
    }
}

/// Format a coordinate with at most three decimals and no trailing zeros
fn fmt_num(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

/// Escape a string for a PDF literal in WinAnsiEncoding
///
/// Latin-1 characters become octal escapes; anything outside Latin-1 is
/// replaced with `?`.
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '(' => result.push_str(r"\("),
            ')' => result.push_str(r"\)"),
            '\\' => result.push_str(r"\\"),
            '\n' => result.push_str(r"\n"),
            '\r' => result.push_str(r"\r"),
            '\t' => result.push_str(r"\t"),
            ' '..='~' => result.push(c),
            '\u{A0}'..='\u{FF}' => result.push_str(&format!("\\{:03o}", c as u32)),
            _ => result.push('?'),
        }
    }
    result
}

/// Compress data using zlib/flate2
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("hello"), "hello");
        assert_eq!(escape_pdf_string("(hello)"), r"\(hello\)");
        assert_eq!(escape_pdf_string("hello\\world"), r"hello\\world");
        assert_eq!(escape_pdf_string("Café"), r"Caf\351");
        assert_eq!(escape_pdf_string("5€"), "5?");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(81.0), "81");
        assert_eq!(fmt_num(43.2), "43.2");
        assert_eq!(fmt_num(-1.0), "-1");
        assert_eq!(fmt_num(0.1 + 0.2), "0.3");
        assert_eq!(fmt_num(-0.0001), "0");
    }

    #[test]
    fn test_content_builder_primitives() {
        let mut builder = ContentBuilder::new("F1".to_string());
        builder.push_transform([0.0, -1.0, 1.0, 0.0, 0.0, 234.0]);
        builder.draw_image("Im4", Rect { x: 0.0, y: 0.0, w: 81.0, h: 81.0 });
        builder.stroke_rect(Rect { x: 0.0, y: 0.0, w: 234.0, h: 81.0 });
        builder.draw_text("Hello", 12.0, Point { x: 85.0, y: 36.5 });
        builder.pop_transform();

        let content = String::from_utf8(builder.build_content_bytes()).unwrap();
        assert_eq!(
            content,
            "q 0 -1 1 0 0 234 cm \
             q 81 0 0 81 0 0 cm /Im4 Do Q \
             0 0 234 81 re S \
             BT 0 g /F1 12 Tf 85 36.5 Td (Hello) Tj ET \
             Q "
        );
    }

    #[test]
    fn test_compress_data() {
        let data = vec![255u8; 1024];
        let compressed = compress_data(&data).unwrap();
        assert!(compressed.len() < data.len());

        let mut decoded = Vec::new();
        flate2::read::ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }
}
