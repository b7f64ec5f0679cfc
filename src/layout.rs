//! Label layout engine.
//!
//! Positions the QR code, the icon and the word-wrapped caption inside the
//! landscape working frame of a label. All coordinates are in points and are
//! expressed in the rotated frame: x runs along the long side of the label,
//! y along the short side. The renderer maps the frame onto the portrait page
//! with [`LabelSpec::frame_transform`].

use thiserror::Error;

/// Axis-aligned rectangle, origin at the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn square(x: f64, y: f64, side: f64) -> Self {
        Self { x, y, w: side, h: side }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Physical size and layout constants of one label stock.
///
/// The physical page is `short_side` wide and `long_side` tall; the working
/// frame is the same page turned on its side.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub short_side: f64,
    pub long_side: f64,
    pub left_margin: f64,
    pub item_spacing: f64,
    /// Applied at both the top and the bottom of the working frame.
    pub vertical_margin: f64,
    pub icon_size: f64,
    pub default_font_size: f64,
}

impl LabelSpec {
    /// Physical page size (width, height) in points.
    pub fn page_size(&self) -> (f64, f64) {
        (self.short_side, self.long_side)
    }

    /// The landscape working frame.
    pub fn frame(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            w: self.long_side,
            h: self.short_side,
        }
    }

    /// Vertical span available to the text block.
    pub fn available_height(&self) -> f64 {
        self.short_side - 2.0 * self.vertical_margin
    }

    /// `cm` operands that move the origin to the top-left corner of the page
    /// and rotate the frame by -90 degrees.
    pub fn frame_transform(&self) -> [f64; 6] {
        [0.0, -1.0, 1.0, 0.0, 0.0, self.long_side]
    }
}

/// Horizontal and vertical metrics of a font, in 1/1000 em.
pub trait FontMetrics {
    fn char_width(&self, c: char) -> f64;

    fn ascent(&self) -> f64;

    /// Usually negative.
    fn descent(&self) -> f64;

    /// Advance width of `text` at `size`, in points.
    fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().map(|c| self.char_width(c)).sum::<f64>() * size / 1000.0
    }

    fn line_height(&self, size: f64) -> f64 {
        (self.ascent() - self.descent()) * size / 1000.0
    }
}

/// Everything the engine needs to lay out one label.
pub struct LayoutRequest<'a> {
    pub text: &'a str,
    pub font: &'a dyn FontMetrics,
    pub font_size: f64,
    pub with_qr: bool,
    pub with_icon: bool,
    pub draw_bbox: bool,
}

/// One wrapped line of the caption and its baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub frame: Rect,
    pub qr: Option<Rect>,
    pub icon: Option<Rect>,
    /// Area reserved for the caption.
    pub column: Rect,
    pub lines: Vec<TextLine>,
    pub line_height: f64,
    pub text_height: f64,
    pub bbox: Option<Rect>,
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error(
        "text does not fit on the label: {lines} line(s) need {required:.1}pt but only {available:.1}pt is available"
    )]
    Overflow {
        lines: usize,
        required: f64,
        available: f64,
    },
    #[error("no horizontal room left for text ({width:.1}pt)")]
    NoTextRoom { width: f64 },
    #[error("invalid font size {0}")]
    InvalidFontSize(f64),
}

/// Greedy word wrap.
///
/// Words are separated by any whitespace and joined by a single space. A word
/// wider than `max_width` on its own is kept intact on a line of its own.
pub fn wrap_text(text: &str, font: &dyn FontMetrics, size: f64, max_width: f64) -> Vec<String> {
    let space = font.text_width(" ", size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = font.text_width(word, size);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Compute the placement of every element on the label.
pub fn layout(spec: &LabelSpec, request: &LayoutRequest<'_>) -> Result<Layout, LayoutError> {
    let size = request.font_size;
    if !size.is_finite() || size <= 0.0 {
        return Err(LayoutError::InvalidFontSize(size));
    }

    let frame = spec.frame();

    let qr = request
        .with_qr
        .then(|| Rect::square(0.0, 0.0, spec.short_side));
    let qr_width = qr.map_or(0.0, |r| r.w);

    let mut text_x = qr_width + spec.left_margin;
    let mut text_width = spec.long_side - qr_width - spec.left_margin - spec.item_spacing;

    let icon = if request.with_icon {
        let rect = Rect::square(
            text_x,
            (spec.short_side - spec.icon_size) / 2.0,
            spec.icon_size,
        );
        text_x += spec.icon_size + spec.item_spacing;
        text_width -= spec.icon_size + spec.item_spacing;
        Some(rect)
    } else {
        None
    };

    let wrapped = wrap_text(request.text, request.font, size, text_width);
    if !wrapped.is_empty() && text_width <= 0.0 {
        return Err(LayoutError::NoTextRoom { width: text_width });
    }

    let line_height = request.font.line_height(size);
    let text_height = line_height * wrapped.len() as f64;
    let available = spec.available_height();
    if text_height > available {
        return Err(LayoutError::Overflow {
            lines: wrapped.len(),
            required: text_height,
            available,
        });
    }

    // Centre the block, then step down one line height per line.
    let block_top = spec.vertical_margin + (available + text_height) / 2.0;
    let ascent = request.font.ascent() * size / 1000.0;
    let lines: Vec<TextLine> = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextLine {
            text,
            origin: Point {
                x: text_x,
                y: block_top - ascent - line_height * i as f64,
            },
        })
        .collect();

    tracing::debug!(
        lines = lines.len(),
        column_width = text_width,
        line_height,
        text_height,
        available,
        "laid out label"
    );

    Ok(Layout {
        frame,
        qr,
        icon,
        column: Rect {
            x: text_x,
            y: spec.vertical_margin,
            w: text_width,
            h: available,
        },
        lines,
        line_height,
        text_height,
        bbox: request.draw_bbox.then_some(frame),
    })
}
