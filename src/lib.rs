//! # edgequake-img2pdf
//!
//! Convert up to three images (PNG, JPEG, GIF, BMP, WEBP) into single-page
//! PDF documents, one document per image.
//!
//! ## Pipeline Overview
//!
//! ```text
//! picker
//!  │
//!  ├─ 1. Select   working set of 1–3 files, thumbnails, picker kept in sync
//!  ├─ 2. Convert  one tokio task per file, all launched at once
//!  │     ├─ decode  declared MIME type → image decoder
//!  │     ├─ layout  A4 page, native size, 50 pt from left and top
//!  │     └─ encode  printpdf → PDF bytes
//!  ├─ 3. Join     all-or-nothing BatchOutcome (first failure aborts)
//!  └─ 4. Deliver  atomic write of `<name>.pdf` per result
//! ```
//!
//! [`Session`] wraps the whole flow behind explicit event handlers that drive
//! the [`UiState`] machine (`Idle → FilesSelected → Converting → Complete`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_img2pdf::{convert_batch, ConversionConfig, SelectedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let files = vec![
//!         SelectedFile::from_path("holiday.jpg"),
//!         SelectedFile::from_path("diagram.png"),
//!     ];
//!     let outcome = convert_batch(&files, &ConversionConfig::default()).await?;
//!     for result in outcome.into_result()? {
//!         std::fs::write(&result.file_name, &result.pdf)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `img2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-img2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod download;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod selection;
pub mod session;
pub mod state;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DecodeMode, PageSize, MAX_FILES};
pub use convert::{convert_batch, convert_file, convert_sync};
pub use download::{download, DirectoryTarget, DownloadTarget};
pub use error::{FileError, Img2PdfError};
pub use output::{BatchOutcome, ConversionResult};
pub use pipeline::decode::ImageKind;
pub use pipeline::layout::Placement;
pub use pipeline::thumbnail::Thumbnail;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, Progress, ProgressCallback};
pub use selection::{
    FileInput, FileSource, NoopFileInput, NoopPreviewSink, Preview, PreviewSink, SelectedFile,
    SelectionManager,
};
pub use session::{LogNotifier, Notifier, Session};
pub use state::{Controls, UiEvent, UiPhase, UiState};
pub use stream::{convert_stream, BatchEvent, BatchEventStream};
