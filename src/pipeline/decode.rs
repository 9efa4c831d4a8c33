//! Image kind detection and decoding.
//!
//! The kind of an input is decided from its *declared* MIME type, never by
//! sniffing the bytes: a `.png` declared as `text/plain` is rejected, and a
//! PNG declared as `image/gif` is fed to the GIF decoder (and fails there).

use crate::config::DecodeMode;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// The image kinds a batch accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
}

impl ImageKind {
    pub const ALL: [ImageKind; 5] = [
        ImageKind::Png,
        ImageKind::Jpeg,
        ImageKind::Gif,
        ImageKind::Bmp,
        ImageKind::Webp,
    ];

    /// Resolve a declared MIME type by prefix, so parameters such as
    /// `image/png; charset=binary` still match.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        let mime = mime_type.trim().to_ascii_lowercase();
        if mime.starts_with("image/png") {
            Some(ImageKind::Png)
        } else if mime.starts_with("image/jpeg") || mime.starts_with("image/jpg") {
            Some(ImageKind::Jpeg)
        } else if mime.starts_with("image/gif") {
            Some(ImageKind::Gif)
        } else if mime.starts_with("image/bmp") {
            Some(ImageKind::Bmp)
        } else if mime.starts_with("image/webp") {
            Some(ImageKind::Webp)
        } else {
            None
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Gif => ImageFormat::Gif,
            ImageKind::Bmp => ImageFormat::Bmp,
            ImageKind::Webp => ImageFormat::WebP,
        }
    }

    /// The decoder actually used for this kind under `mode`.
    pub fn decoder_format(self, mode: DecodeMode) -> ImageFormat {
        match (mode, self) {
            (DecodeMode::PngFallback, ImageKind::Gif | ImageKind::Bmp | ImageKind::Webp) => {
                ImageFormat::Png
            }
            _ => self.format(),
        }
    }
}

/// Decode `bytes` as `kind`.
pub fn decode_image(
    bytes: &[u8],
    kind: ImageKind,
    mode: DecodeMode,
) -> Result<DynamicImage, image::ImageError> {
    let format = kind.decoder_format(mode);
    let img = image::load_from_memory_with_format(bytes, format)?;
    debug!(
        "Decoded {:?} via {:?} decoder → {}x{} px",
        kind,
        format,
        img.width(),
        img.height()
    );
    Ok(img)
}
