//! Pipeline stages for image-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step, with no I/O
//! and no async, so the orchestrator can run them inside `spawn_blocking`.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ decode ──▶ layout ──▶ encode ──▶ PDF bytes
//!  (MIME)   (image)   (points)   (printpdf)
//!
//! bytes ──▶ thumbnail ──▶ data URL          (selection previews)
//! ```
//!
//! 1. [`decode`]    — map the declared MIME type to an [`decode::ImageKind`]
//!    and decode the raster
//! 2. [`layout`]    — compute where the image sits on the fixed-size page
//! 3. [`encode`]    — build the single-page document and serialise it
//! 4. [`thumbnail`] — shrink and base64-wrap a preview for the selection UI

pub mod decode;
pub mod encode;
pub mod layout;
pub mod thumbnail;
