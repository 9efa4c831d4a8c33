//! Selection previews: a small PNG thumbnail wrapped in a `data:` URL.
//!
//! A data URL can be dropped straight into an `<img src>` or any widget that
//! accepts URLs, so front-ends need no extra decoding step.

use crate::config::DecodeMode;
use crate::pipeline::decode::{decode_image, ImageKind};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,…`
    pub data_url: String,
}

/// Decode `bytes` and shrink them to at most `max_width` pixels wide.
///
/// Images already narrower than `max_width` keep their size. Previews always
/// use the native decoder for the declared kind.
pub fn render_thumbnail(
    bytes: &[u8],
    kind: ImageKind,
    max_width: u32,
) -> Result<Thumbnail, image::ImageError> {
    let img = decode_image(bytes, kind, DecodeMode::Native)?;
    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Triangle)
    } else {
        img
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    let b64 = STANDARD.encode(&buf);
    debug!(
        "Thumbnail {}x{} px → {} bytes base64",
        img.width(),
        img.height(),
        b64.len()
    );

    Ok(Thumbnail {
        width: img.width(),
        height: img.height(),
        data_url: format!("data:image/png;base64,{b64}"),
    })
}
