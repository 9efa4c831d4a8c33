//! Streaming conversion API: observe a batch as it runs.
//!
//! [`convert_stream`] runs [`crate::convert::convert_batch`] on a background
//! task and turns its progress callbacks into a `Stream` of [`BatchEvent`]s,
//! ending with exactly one [`BatchEvent::Finished`]. This is the natural
//! shape for event-loop front-ends: each event maps onto one
//! [`crate::state::UiEvent`].

use crate::config::{ConversionConfig, MAX_FILES};
use crate::convert::convert_batch;
use crate::error::{FileError, Img2PdfError};
use crate::output::BatchOutcome;
use crate::progress::{ConversionProgressCallback, Progress, ProgressCallback};
use crate::selection::SelectedFile;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::{info, warn};

/// One observable step of a running batch.
#[derive(Debug)]
pub enum BatchEvent {
    /// The batch launched `total` conversions.
    Started { total: usize },
    /// A file finished successfully.
    FileCompleted { file_name: String, progress: Progress },
    /// A file failed; the batch is being aborted.
    FileFailed { file_name: String, error: FileError },
    /// Terminal event; nothing follows it.
    Finished(Result<BatchOutcome, Img2PdfError>),
}

/// A boxed stream of batch events.
pub type BatchEventStream = Pin<Box<dyn Stream<Item = BatchEvent> + Send>>;

/// Forwards callback events into the stream and on to the caller's own
/// callback, if one was configured.
struct ChannelCallback {
    tx: mpsc::UnboundedSender<BatchEvent>,
    inner: Option<ProgressCallback>,
}

impl ChannelCallback {
    fn send(&self, event: BatchEvent) {
        // The receiver is gone only if the caller dropped the stream.
        let _ = self.tx.send(event);
    }
}

impl ConversionProgressCallback for ChannelCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.send(BatchEvent::Started { total: total_files });
        if let Some(ref cb) = self.inner {
            cb.on_batch_start(total_files);
        }
    }

    fn on_file_start(&self, file_name: &str, index: usize, total: usize) {
        if let Some(ref cb) = self.inner {
            cb.on_file_start(file_name, index, total);
        }
    }

    fn on_file_complete(&self, file_name: &str, progress: Progress) {
        self.send(BatchEvent::FileCompleted {
            file_name: file_name.to_string(),
            progress,
        });
        if let Some(ref cb) = self.inner {
            cb.on_file_complete(file_name, progress);
        }
    }

    fn on_file_error(&self, file_name: &str, error: &FileError) {
        self.send(BatchEvent::FileFailed {
            file_name: file_name.to_string(),
            error: error.clone(),
        });
        if let Some(ref cb) = self.inner {
            cb.on_file_error(file_name, error);
        }
    }

    fn on_batch_complete(&self, total: usize, success: bool) {
        if let Some(ref cb) = self.inner {
            cb.on_batch_complete(total, success);
        }
    }
}

/// Convert a working set, streaming events as the batch progresses.
///
/// Events arrive in the order the orchestrator observed them, so
/// `FileCompleted` progress is monotonic.
///
/// # Returns
/// - `Ok(BatchEventStream)` — `Started`, zero or more file events, then `Finished`
/// - `Err(Img2PdfError)` — the batch could not start (empty or oversize set)
pub fn convert_stream(
    files: Vec<SelectedFile>,
    config: &ConversionConfig,
) -> Result<BatchEventStream, Img2PdfError> {
    if files.is_empty() {
        return Err(Img2PdfError::EmptyBatch);
    }
    if files.len() > MAX_FILES {
        return Err(Img2PdfError::TooManyFiles {
            got: files.len(),
            max: MAX_FILES,
        });
    }
    info!("Starting streaming batch of {} file(s)", files.len());

    let (tx, rx) = mpsc::unbounded_channel();
    let mut cfg = config.clone();
    cfg.progress_callback = Some(Arc::new(ChannelCallback {
        tx: tx.clone(),
        inner: config.progress_callback.clone(),
    }));

    tokio::spawn(async move {
        let outcome = convert_batch(&files, &cfg).await;
        if tx.send(BatchEvent::Finished(outcome)).is_err() {
            warn!("Batch finished after its event stream was dropped");
        }
    });

    Ok(Box::pin(UnboundedReceiverStream::new(rx)))
}
