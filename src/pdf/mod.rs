pub mod content;
pub mod document;
pub mod fonts;
pub mod resources;

pub use document::{render_label, save_document, LabelGlyphs};
