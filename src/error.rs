//! Error types for the edgequake-img2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Img2PdfError`] — **Session-level**: the requested action cannot
//!   proceed at all (too many files selected, nothing to convert, an event
//!   that is illegal in the current phase, a download that could not be
//!   written). Returned as `Err(Img2PdfError)` from the public entry points.
//!
//! * [`FileError`] — **Per-file**: a single image could not be read, is of
//!   an unsupported type, or failed to decode/encode. Any one of these fails
//!   the whole batch; it travels inside
//!   [`crate::output::BatchOutcome::Failed`] and, at the session level,
//!   inside [`Img2PdfError::BatchFailed`].

use crate::state::UiPhase;
use std::path::PathBuf;
use thiserror::Error;

/// All session-level errors returned by the edgequake-img2pdf library.
#[derive(Debug, Error)]
pub enum Img2PdfError {
    // ── Selection errors ─────────────────────────────────────────────────
    /// More files were picked than the working set can hold.
    #[error("You can select a maximum of {max} files (got {got}).")]
    TooManyFiles { got: usize, max: usize },

    /// A preview/file index did not address an entry of the working set.
    #[error("File index {index} is out of range (working set has {len} files)")]
    IndexOutOfRange { index: usize, len: usize },

    // ── Conversion errors ────────────────────────────────────────────────
    /// Convert was requested with an empty working set.
    #[error("No files selected.\nSelect between 1 and 3 images before converting.")]
    EmptyBatch,

    /// One file failed, so the whole batch was discarded.
    #[error("Conversion failed: {0}")]
    BatchFailed(#[from] FileError),

    /// The event is not accepted in the current UI phase.
    #[error("Cannot {event} while {phase:?}")]
    InvalidTransition { phase: UiPhase, event: &'static str },

    // ── I/O errors ───────────────────────────────────────────────────────
    /// Could not create or write a downloaded PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure while converting one file of a batch.
///
/// Every variant carries the original file name so the message shown to the
/// user always identifies which image broke the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// Declared MIME type is not one of the supported image kinds.
    #[error(
        "Unsupported image type for {name}: {mime_type}. Only PNG, JPG, JPEG, GIF, BMP and WEBP are supported."
    )]
    UnsupportedFormat { name: String, mime_type: String },

    /// The file's bytes could not be read.
    #[error("Error reading {name}: {detail}")]
    Read { name: String, detail: String },

    /// Decoding, page layout or PDF serialisation failed.
    #[error("Error converting {name}: {detail}")]
    Conversion { name: String, detail: String },
}

impl FileError {
    /// The original name of the file that failed.
    pub fn file_name(&self) -> &str {
        match self {
            FileError::UnsupportedFormat { name, .. }
            | FileError::Read { name, .. }
            | FileError::Conversion { name, .. } => name,
        }
    }
}
