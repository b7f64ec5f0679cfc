//! Square raster elements placed on a label: QR codes and icons.

use image::{GrayImage, Luma, RgbaImage};
use qrcode::QrCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pixel size QR codes are rendered at before being scaled onto the page
pub const QR_SIZE: u32 = 200;

#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("QR code data must not be empty")]
    EmptyQrData,
    #[error("failed to generate QR code for data: {data}")]
    Qr {
        data: String,
        #[source]
        source: qrcode::types::QrError,
    },
    #[error("failed to load icon {path:?}")]
    Icon {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone)]
pub enum Glyph {
    Qr(GrayImage),
    Icon(RgbaImage),
}

impl Glyph {
    pub fn qr(data: &str) -> Result<Glyph, GlyphError> {
        generate_qr_code(data, QR_SIZE, QR_SIZE).map(Glyph::Qr)
    }

    pub fn icon(path: &Path) -> Result<Glyph, GlyphError> {
        load_icon(path).map(Glyph::Icon)
    }
}

/// Generate a QR code as an image buffer
pub fn generate_qr_code(data: &str, width: u32, height: u32) -> Result<GrayImage, GlyphError> {
    if data.is_empty() {
        return Err(GlyphError::EmptyQrData);
    }

    let qr_code = QrCode::new(data).map_err(|source| GlyphError::Qr {
        data: data.to_string(),
        source,
    })?;

    // Render QR code with light=255 (white) and dark=0 (black)
    let img = qr_code
        .render::<Luma<u8>>()
        .light_color(Luma([255u8]))
        .dark_color(Luma([0u8]))
        .build();

    // Nearest keeps module edges sharp
    let scaled = image::imageops::resize(
        &img,
        width,
        height,
        image::imageops::FilterType::Nearest,
    );
    Ok(scaled)
}

/// Load an icon file as RGBA
pub fn load_icon(path: &Path) -> Result<RgbaImage, GlyphError> {
    let img = image::open(path).map_err(|source| GlyphError::Icon {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_generate_qr_code() {
        let img = generate_qr_code("https://shop.justbuchanan.com/inventory/7", 200, 200).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
        // Quiet zone is light, the finder pattern corner is dark.
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert!(img.pixels().any(|p| p[0] == 0));
    }

    #[test]
    fn test_empty_qr_data() {
        assert!(matches!(Glyph::qr(""), Err(GlyphError::EmptyQrData)));
    }

    #[test]
    fn test_load_icon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gear.png");
        RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        match Glyph::icon(&path).unwrap() {
            Glyph::Icon(img) => assert_eq!(img.dimensions(), (8, 8)),
            Glyph::Qr(_) => panic!("expected an icon"),
        }
    }

    #[test]
    fn test_missing_icon() {
        let err = load_icon(Path::new("icons/does-not-exist.png")).unwrap_err();
        assert!(matches!(err, GlyphError::Icon { .. }));
        assert!(err.to_string().contains("does-not-exist.png"));
    }
}
