//! Single label rendering: glyphs, layout, PDF, file.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::glyph::Glyph;
use crate::layout::{layout, LabelSpec, Layout, LayoutRequest};
use crate::pdf::fonts::StandardFont;
use crate::pdf::{render_label, save_document, LabelGlyphs};

/// Everything needed to produce one label file
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub spec: LabelSpec,
    pub text: String,
    pub qr_text: Option<String>,
    pub icon: Option<PathBuf>,
    pub font: StandardFont,
    pub font_size: f64,
    pub draw_bbox: bool,
}

/// Lay out and render the label, then write it to `output`.
///
/// Nothing is written when the layout fails.
pub fn render_to_file(request: &RenderRequest, output: &Path) -> Result<Layout> {
    let qr = request.qr_text.as_deref().map(Glyph::qr).transpose()?;
    let icon = request.icon.as_deref().map(Glyph::icon).transpose()?;

    let layout = layout(
        &request.spec,
        &LayoutRequest {
            text: &request.text,
            font: &request.font,
            font_size: request.font_size,
            with_qr: qr.is_some(),
            with_icon: icon.is_some(),
            draw_bbox: request.draw_bbox,
        },
    )?;

    let glyphs = LabelGlyphs {
        qr: qr.as_ref(),
        icon: icon.as_ref(),
    };
    let mut doc = render_label(&request.spec, &layout, request.font, request.font_size, &glyphs)?;
    save_document(&mut doc, output)?;

    tracing::info!(
        output = %output.display(),
        lines = layout.lines.len(),
        "label written"
    );
    Ok(layout)
}
