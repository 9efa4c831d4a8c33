//! Progress reporting for batch conversion.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the orchestrator finishes each file.
//!
//! Events are always delivered from the orchestrator's own task, never from
//! the per-file workers, so `on_file_complete` sees a strictly increasing
//! `completed` count even though files finish in arbitrary order.
//!
//! # Example
//!
//! ```rust
//! use edgequake_img2pdf::{ConversionConfig, ConversionProgressCallback, Progress};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, file_name: &str, progress: Progress) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{file_name}: {}", progress.fraction_text());
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Batch progress after a file completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `completed / total * 100`, rounded to the nearest integer.
    pub percentage: u8,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((completed.min(total) as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }

    /// Human-readable progress line, e.g. `Processed 2/3 files (67%)`.
    pub fn fraction_text(&self) -> String {
        format!(
            "Processed {}/{} files ({}%)",
            self.completed, self.total, self.percentage
        )
    }
}

/// Called by the orchestrator as it processes a batch.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any file is converted.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called when a file's conversion task is launched.
    ///
    /// # Arguments
    /// * `file_name` — original file name
    /// * `index`     — 0-based position in the working set
    /// * `total`     — number of files in the batch
    fn on_file_start(&self, file_name: &str, index: usize, total: usize) {
        let _ = (file_name, index, total);
    }

    /// Called when a file converted successfully.
    fn on_file_complete(&self, file_name: &str, progress: Progress) {
        let _ = (file_name, progress);
    }

    /// Called for the failure that aborts the batch.
    fn on_file_error(&self, file_name: &str, error: &FileError) {
        let _ = (file_name, error);
    }

    /// Called once after the batch terminates.
    ///
    /// # Arguments
    /// * `total`   — number of files in the batch
    /// * `success` — `true` only if every file converted
    fn on_batch_complete(&self, total: usize, success: bool) {
        let _ = (total, success);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
