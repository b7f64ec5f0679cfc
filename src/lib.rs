//! Printable labels for DYMO-style label writers.
//!
//! A label carries a caption, an optional QR code and an optional icon, laid
//! out on a landscape frame inside a portrait page and written as a
//! single-page PDF.

pub mod batch;
pub mod config;
pub mod glyph;
pub mod label;
pub mod layout;
pub mod pdf;
pub mod system;

use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
