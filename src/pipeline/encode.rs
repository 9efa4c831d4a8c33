//! PDF encoding: one decoded image → one single-page PDF document.
//!
//! The image is embedded as an uncompressed 8-bit RGB XObject. printpdf
//! sizes images by `pixels / dpi` inches, so drawing at 72 DPI makes one
//! pixel exactly one point, which is what [`Placement`] assumes.

use crate::pipeline::layout::Placement;
use image::{DynamicImage, GenericImageView};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Pt, Px,
};
use tracing::debug;

const LAYER_NAME: &str = "Image";

/// Points-to-pixels density that maps one image pixel to one point.
const NATIVE_DPI: f32 = 72.0;

/// Serialise `img` onto a fresh page laid out by `placement`.
///
/// Returns the PDF bytes, or the serialiser's error message.
pub fn encode_pdf(img: &DynamicImage, placement: &Placement, title: &str) -> Result<Vec<u8>, String> {
    let (w, h) = img.dimensions();
    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm::from(Pt(placement.page_width)),
        Mm::from(Pt(placement.page_height)),
        LAYER_NAME,
    );
    let current_layer = doc.get_page(page).get_layer(layer);

    let rgb = img.to_rgb8();
    let image_x_object = ImageXObject {
        width: Px(w as usize),
        height: Px(h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    let transform = ImageTransform {
        translate_x: Some(Mm::from(Pt(placement.x))),
        translate_y: Some(Mm::from(Pt(placement.y))),
        dpi: Some(NATIVE_DPI),
        ..Default::default()
    };
    Image::from(image_x_object).add_to_layer(current_layer, transform);

    let bytes = doc.save_to_bytes().map_err(|e| e.to_string())?;
    debug!(
        "Encoded {}x{} px image → {} byte PDF",
        w,
        h,
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSize;
    use crate::pipeline::layout::place_image;
    use image::{Rgba, RgbaImage};

    #[test]
    fn produces_a_pdf() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([255, 0, 0, 128])));
        let placement = place_image(PageSize::A4, 50.0, 8, 6);
        let bytes = encode_pdf(&img, &placement, "red").expect("encode should succeed");
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 100);
    }

    #[test]
    fn oversized_image_still_encodes() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(900, 1200, Rgba([0, 0, 0, 255])));
        let placement = place_image(PageSize::A4, 50.0, 900, 1200);
        assert!(placement.overflows());
        let bytes = encode_pdf(&img, &placement, "big").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
