//! Page layout: where an image lands on its page.
//!
//! PDF user space has its origin at the bottom-left corner with y growing
//! upwards. One image pixel maps to one point; images are never scaled, so
//! anything larger than the page simply overflows it.

use crate::config::PageSize;
use serde::{Deserialize, Serialize};

/// Page size and image rectangle of one produced document, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub page_width: f32,
    pub page_height: f32,
    /// Left edge of the image.
    pub x: f32,
    /// Bottom edge of the image. May be negative when the image overflows.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Distance from the page's top edge down to the image's top edge.
    pub fn top_offset(&self) -> f32 {
        self.page_height - (self.y + self.height)
    }

    /// `true` if any part of the image falls outside the page.
    pub fn overflows(&self) -> bool {
        self.x + self.width > self.page_width || self.y < 0.0
    }
}

/// Place a `width_px` × `height_px` image `margin` points from the left and
/// top edges of a `page` page.
pub fn place_image(page: PageSize, margin: f32, width_px: u32, height_px: u32) -> Placement {
    let (page_width, page_height) = page.dimensions();
    let width = width_px as f32;
    let height = height_px as f32;
    Placement {
        page_width,
        page_height,
        x: margin,
        y: page_height - height - margin,
        width,
        height,
    }
}
