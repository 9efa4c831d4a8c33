//! Configuration types for image-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the classic
//! behaviour: an A4 page, the image at its native pixel size, 50 points from
//! the left and top edges.

use crate::error::Img2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of files a working set (and therefore a batch) may hold.
pub const MAX_FILES: usize = 3;

/// Configuration for a batch conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_img2pdf::{ConversionConfig, PageSize};
///
/// let config = ConversionConfig::builder()
///     .page_size(PageSize::Letter)
///     .margin(36.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.margin, 36.0);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Page format of every produced document. Default: A4.
    pub page_size: PageSize,

    /// Distance in points between the image and the page's left and top
    /// edges. Default: 50.
    pub margin: f32,

    /// How GIF, BMP and WEBP inputs are decoded. Default: [`DecodeMode::Native`].
    pub decode_mode: DecodeMode,

    /// Maximum thumbnail width in pixels for selection previews. Default: 100.
    pub thumbnail_width: u32,

    /// Title written into each PDF's document information. Default: the
    /// source file's display name when `None`.
    pub document_title: Option<String>,

    /// Optional progress callback for real-time per-file events.
    ///
    /// See [`crate::progress::ConversionProgressCallback`].
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margin: 50.0,
            decode_mode: DecodeMode::default(),
            thumbnail_width: 100,
            document_title: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("page_size", &self.page_size)
            .field("margin", &self.margin)
            .field("decode_mode", &self.decode_mode)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("document_title", &self.document_title)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn margin(mut self, points: f32) -> Self {
        self.config.margin = points;
        self
    }

    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.config.decode_mode = mode;
        self
    }

    pub fn thumbnail_width(mut self, px: u32) -> Self {
        self.config.thumbnail_width = px.clamp(16, 1024);
        self
    }

    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.config.document_title = Some(title.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Img2PdfError> {
        let c = &self.config;
        if !c.margin.is_finite() || c.margin < 0.0 {
            return Err(Img2PdfError::InvalidConfig(format!(
                "Margin must be a finite, non-negative number of points, got {}",
                c.margin
            )));
        }
        let (width, height) = c.page_size.dimensions();
        if c.margin * 2.0 >= width.min(height) {
            return Err(Img2PdfError::InvalidConfig(format!(
                "Margin {} leaves no room on a {:?} page",
                c.margin, c.page_size
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Fixed page formats, in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// ISO A4, 595.28 × 841.89 pt (default).
    #[default]
    A4,
    /// US Letter, 612 × 792 pt.
    Letter,
    /// US Legal, 612 × 1008 pt.
    Legal,
}

impl PageSize {
    /// `(width, height)` in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

/// Decoder selection for the formats that have no direct PDF embedding path.
///
/// PNG and JPEG are always decoded with their own decoders. For GIF, BMP and
/// WEBP, the classic browser tool handed the raw bytes to its PNG embedder,
/// which rejects anything that is not actually a PNG stream.
/// [`DecodeMode::Native`] decodes each format properly;
/// [`DecodeMode::PngFallback`] reproduces the old behaviour for callers that
/// need byte-for-byte parity with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Decode every supported format with its own decoder (default).
    #[default]
    Native,
    /// Decode GIF, BMP and WEBP bytes as PNG.
    PngFallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let c = ConversionConfig::default();
        assert_eq!(c.page_size, PageSize::A4);
        assert_eq!(c.margin, 50.0);
        assert_eq!(c.decode_mode, DecodeMode::Native);
        assert_eq!(c.thumbnail_width, 100);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn builder_rejects_negative_margin() {
        let err = ConversionConfig::builder().margin(-1.0).build().unwrap_err();
        assert!(matches!(err, Img2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_margin_wider_than_page() {
        let err = ConversionConfig::builder()
            .page_size(PageSize::A4)
            .margin(400.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("no room"));
    }

    #[test]
    fn builder_clamps_thumbnail_width() {
        let c = ConversionConfig::builder()
            .thumbnail_width(1)
            .build()
            .unwrap();
        assert_eq!(c.thumbnail_width, 16);
    }

    #[test]
    fn a4_dimensions() {
        let (w, h) = PageSize::A4.dimensions();
        assert!((w - 595.28).abs() < f32::EPSILON);
        assert!((h - 841.89).abs() < 0.001);
    }

    #[test]
    fn debug_hides_callback() {
        let c = ConversionConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ConversionProgressCallback>"));
    }
}
