use anyhow::{anyhow, Context, Result};
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;

use super::content::ContentBuilder;
use super::fonts::{create_font, StandardFont};
use super::resources::{add_glyph_image, page_resources};
use crate::glyph::Glyph;
use crate::layout::{LabelSpec, Layout, Rect};

const FONT_RESOURCE: &str = "F1";

/// Images to paint into the slots reserved by the layout
#[derive(Default)]
pub struct LabelGlyphs<'a> {
    pub qr: Option<&'a Glyph>,
    pub icon: Option<&'a Glyph>,
}

/// Embed `glyph` and paint it into `rect`
fn place_glyph(
    doc: &mut Document,
    builder: &mut ContentBuilder,
    xobjects: &mut Dictionary,
    glyph: &Glyph,
    rect: Rect,
) -> Result<()> {
    let img_id = add_glyph_image(doc, glyph)?;
    let img_name = format!("Im{}", img_id.0);
    xobjects.set(img_name.clone(), Object::Reference(img_id));
    builder.draw_image(&img_name, rect);
    Ok(())
}

/// Render a computed layout into a single-page document
pub fn render_label(
    spec: &LabelSpec,
    layout: &Layout,
    font: StandardFont,
    font_size: f64,
    glyphs: &LabelGlyphs<'_>,
) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = create_font(&mut doc, font);

    let mut builder = ContentBuilder::new(FONT_RESOURCE.to_string());
    let mut xobjects = Dictionary::new();

    builder.push_transform(spec.frame_transform());

    match (layout.qr, glyphs.qr) {
        (Some(rect), Some(glyph)) => place_glyph(&mut doc, &mut builder, &mut xobjects, glyph, rect)?,
        (None, None) => {}
        _ => return Err(anyhow!("QR code slot and QR image do not match")),
    }

    match (layout.icon, glyphs.icon) {
        (Some(rect), Some(glyph)) => place_glyph(&mut doc, &mut builder, &mut xobjects, glyph, rect)?,
        (None, None) => {}
        _ => return Err(anyhow!("icon slot and icon image do not match")),
    }

    if let Some(rect) = layout.bbox {
        builder.stroke_rect(rect);
    }

    for line in &layout.lines {
        builder.draw_text(&line.text, font_size, line.origin);
    }

    builder.pop_transform();

    let content_id = doc.add_object(Stream::new(Dictionary::new(), builder.build_content_bytes()));
    let resources = page_resources(FONT_RESOURCE, font_id, &xobjects);

    let (page_width, page_height) = spec.page_size();
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", "Page");
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page_width as f32),
            Object::Real(page_height as f32),
        ],
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));
    let page_id = doc.add_object(Object::Dictionary(page_dict));

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", "Pages");
    pages_dict.set("Kids", vec![Object::Reference(page_id)]);
    pages_dict.set("Count", 1_i64);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", "Catalog");
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    Ok(doc)
}

/// Write the document to `path`
pub fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    doc.save(path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}
