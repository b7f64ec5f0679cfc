use anyhow::Result;
use image::{GrayImage, RgbaImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::content::compress_data;
use crate::glyph::Glyph;

/// Add a compressed 8-bit image XObject and return its id
fn add_image_object(
    doc: &mut Document,
    width: u32,
    height: u32,
    color_space: &str,
    raw_bytes: &[u8],
    soft_mask: Option<ObjectId>,
) -> Result<ObjectId> {
    let compressed_bytes = compress_data(raw_bytes)?;

    let mut img_dict = Dictionary::new();
    img_dict.set("Type", "XObject");
    img_dict.set("Subtype", "Image");
    img_dict.set("Width", width as i64);
    img_dict.set("Height", height as i64);
    img_dict.set("ColorSpace", color_space);
    img_dict.set("BitsPerComponent", 8_i64);
    img_dict.set("Filter", "FlateDecode");
    if let Some(mask_id) = soft_mask {
        img_dict.set("SMask", Object::Reference(mask_id));
    }

    Ok(doc.add_object(Stream::new(img_dict, compressed_bytes)))
}

fn add_gray_image(doc: &mut Document, img: &GrayImage) -> Result<ObjectId> {
    add_image_object(doc, img.width(), img.height(), "DeviceGray", img.as_raw(), None)
}

/// RGB samples go in the image itself, the alpha channel becomes its soft mask
fn add_rgba_image(doc: &mut Document, img: &RgbaImage) -> Result<ObjectId> {
    let (rgb, alpha): (Vec<[u8; 3]>, Vec<u8>) = img
        .pixels()
        .map(|pixel| ([pixel[0], pixel[1], pixel[2]], pixel[3]))
        .unzip();
    let rgb: Vec<u8> = rgb.into_iter().flatten().collect();

    let mask_id = if alpha.iter().all(|&a| a == u8::MAX) {
        None
    } else {
        Some(add_image_object(doc, img.width(), img.height(), "DeviceGray", &alpha, None)?)
    };

    add_image_object(doc, img.width(), img.height(), "DeviceRGB", &rgb, mask_id)
}

/// Embed a glyph as an image XObject and return its id
pub fn add_glyph_image(doc: &mut Document, glyph: &Glyph) -> Result<ObjectId> {
    match glyph {
        Glyph::Qr(img) => add_gray_image(doc, img),
        Glyph::Icon(img) => add_rgba_image(doc, img),
    }
}

/// Build the resources dictionary of the label page
///
/// The font is registered under `font_name`; XObjects are copied in as given.
pub fn page_resources(font_name: &str, font_id: ObjectId, xobject_dict: &Dictionary) -> Dictionary {
    let mut font_resources = Dictionary::new();
    font_resources.set(font_name, Object::Reference(font_id));

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(font_resources));

    if !xobject_dict.is_empty() {
        let mut xobject_resources = Dictionary::new();
        for (key, value) in xobject_dict.iter() {
            xobject_resources.set(key.to_vec(), value.clone());
        }
        resources.set("XObject", Object::Dictionary(xobject_resources));
    }

    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn test_gray_image_object() {
        let mut doc = Document::with_version("1.5");
        let glyph = Glyph::Qr(GrayImage::from_pixel(4, 3, Luma([0u8])));
        let id = add_glyph_image(&mut doc, &glyph).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 4);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 3);
        assert_eq!(stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceGray");
        assert!(stream.dict.get(b"SMask").is_err());
    }

    #[test]
    fn test_transparent_icon_gets_soft_mask() {
        let mut doc = Document::with_version("1.5");
        let glyph = Glyph::Icon(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 128])));
        let id = add_glyph_image(&mut doc, &glyph).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceRGB");
        let mask_id = stream.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let mask = doc.get_object(mask_id).unwrap().as_stream().unwrap();
        assert_eq!(mask.dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceGray");
    }

    #[test]
    fn test_opaque_icon_has_no_soft_mask() {
        let mut doc = Document::with_version("1.5");
        let glyph = Glyph::Icon(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])));
        let id = add_glyph_image(&mut doc, &glyph).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_err());
    }

    #[test]
    fn test_page_resources() {
        let mut xobjects = Dictionary::new();
        xobjects.set("Im7", Object::Reference((7, 0)));
        let resources = page_resources("F1", (3, 0), &xobjects);

        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert_eq!(fonts.get(b"F1").unwrap().as_reference().unwrap(), (3, 0));
        let images = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert_eq!(images.get(b"Im7").unwrap().as_reference().unwrap(), (7, 0));
    }

    #[test]
    fn test_page_resources_without_images() {
        let resources = page_resources("F1", (3, 0), &Dictionary::new());
        assert!(resources.get(b"XObject").is_err());
    }
}
