//! Session controller: the event handlers a front-end calls.
//!
//! A [`Session`] ties the three components together and is the only place
//! that mutates them:
//!
//! * the [`SelectionManager`] (working set, previews, picker sync),
//! * the [`UiState`] machine (phase + controls),
//! * the results of the last successful batch.
//!
//! Every collaborator outside the crate (picker, preview area, alert box,
//! download folder) is injected, so the same controller drives a terminal,
//! a GUI or a test harness.
//!
//! `convert` takes `&mut self` for its whole duration, which is what keeps
//! the working set read-only while a batch is in flight.

use crate::config::ConversionConfig;
use crate::download::{self, DownloadTarget};
use crate::error::Img2PdfError;
use crate::output::{BatchOutcome, ConversionResult};
use crate::selection::{FileInput, PreviewSink, SelectedFile, SelectionManager};
use crate::state::{Controls, UiEvent, UiPhase, UiState};
use crate::stream::{convert_stream, BatchEvent};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Blocking user notification (an alert box, a stderr line, …).
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// A notifier that only logs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!("{}", message);
    }
}

pub struct Session {
    config: ConversionConfig,
    selection: SelectionManager,
    ui: UiState,
    results: Vec<ConversionResult>,
    notifier: Arc<dyn Notifier>,
}

impl Session {
    pub fn new(
        config: ConversionConfig,
        file_input: Box<dyn FileInput>,
        previews: Box<dyn PreviewSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let selection = SelectionManager::new(file_input, previews, config.thumbnail_width);
        Self {
            config,
            selection,
            ui: UiState::new(),
            results: Vec::new(),
            notifier,
        }
    }

    pub fn phase(&self) -> UiPhase {
        self.ui.phase()
    }

    pub fn controls(&self) -> Controls {
        self.ui.controls()
    }

    pub fn files(&self) -> &[SelectedFile] {
        self.selection.files()
    }

    /// Results of the last batch; empty unless the phase is `Complete`.
    pub fn results(&self) -> &[ConversionResult] {
        &self.results
    }

    /// The user picked `candidates` (0–3 files).
    pub async fn select_files(&mut self, candidates: Vec<SelectedFile>) -> Result<(), Img2PdfError> {
        self.guard(&[UiPhase::Idle, UiPhase::FilesSelected, UiPhase::Failed], "select files")?;

        match self.selection.select_files(candidates).await {
            Ok(true) => self.ui.apply(UiEvent::FilesSelected {
                count: self.selection.len(),
            }),
            Ok(false) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    /// The user removed the file at `index` before converting.
    pub fn remove_file(&mut self, index: usize) -> Result<(), Img2PdfError> {
        self.guard(&[UiPhase::FilesSelected, UiPhase::Failed], "remove a file")?;

        if let Err(e) = self.selection.remove_file(index) {
            return Err(self.report(e));
        }
        if self.selection.is_empty() {
            self.ui.apply(UiEvent::AllFilesRemoved)?;
        }
        Ok(())
    }

    /// Convert the working set.
    ///
    /// On success the phase becomes `Complete` and the results are returned.
    /// On failure the user is alerted, nothing is kept, the phase becomes
    /// `Failed` (convert re-enabled) and the failure is returned as
    /// [`Img2PdfError::BatchFailed`].
    pub async fn convert(&mut self) -> Result<&[ConversionResult], Img2PdfError> {
        if self.selection.is_empty() {
            return Err(self.report(Img2PdfError::EmptyBatch));
        }
        self.guard(&[UiPhase::FilesSelected, UiPhase::Failed], "convert")?;

        let files = self.selection.files().to_vec();
        self.results.clear();
        self.ui.apply(UiEvent::ConvertStarted { total: files.len() })?;

        let mut events = convert_stream(files, &self.config)?;
        let mut finished = None;
        while let Some(event) = events.next().await {
            match event {
                BatchEvent::FileCompleted { progress, .. } => {
                    self.ui.apply(UiEvent::Progress(progress))?;
                }
                BatchEvent::Finished(outcome) => {
                    finished = Some(outcome);
                    break;
                }
                BatchEvent::Started { .. } | BatchEvent::FileFailed { .. } => {}
            }
        }

        let outcome = finished.unwrap_or_else(|| {
            Err(Img2PdfError::Internal(
                "batch ended without a final event".into(),
            ))
        });

        match outcome {
            Ok(BatchOutcome::AllSucceeded(results)) => {
                self.ui.apply(UiEvent::BatchSucceeded)?;
                info!("{} PDF(s) ready for download", results.len());
                self.results = results;
                Ok(self.results.as_slice())
            }
            Ok(BatchOutcome::Failed(file_error)) => {
                let message = file_error.to_string();
                error!("Batch aborted: {}", message);
                self.notifier.alert(&message);
                self.ui.apply(UiEvent::BatchFailed { message })?;
                Err(Img2PdfError::BatchFailed(file_error))
            }
            Err(e) => {
                self.ui.apply(UiEvent::BatchFailed {
                    message: e.to_string(),
                })?;
                Err(self.report(e))
            }
        }
    }

    /// Message of the last failed batch, while the phase is `Failed`.
    pub fn last_error(&self) -> Option<&str> {
        self.ui.error()
    }

    /// Hand every result of the completed batch to `target`.
    pub fn download(&self, target: &dyn DownloadTarget) -> Result<Vec<PathBuf>, Img2PdfError> {
        self.guard(&[UiPhase::Complete], "download")?;
        download::download(&self.results, target).map_err(|e| self.report(e))
    }

    /// Full reset: empty working set, no results, `Idle`.
    pub fn restart(&mut self) {
        self.selection.clear();
        self.results.clear();
        // Restart is accepted from every phase.
        let _ = self.ui.apply(UiEvent::Restart);
        info!("Session restarted");
    }

    fn guard(&self, allowed: &[UiPhase], event: &'static str) -> Result<(), Img2PdfError> {
        let phase = self.ui.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(self.report(Img2PdfError::InvalidTransition { phase, event }))
        }
    }

    /// Log `e` and alert the user before handing it back.
    fn report(&self, e: Img2PdfError) -> Img2PdfError {
        error!("{}", e);
        self.notifier.alert(&e.to_string());
        e
    }
}
