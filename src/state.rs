//! UI state machine: which phase the converter is in and which controls
//! that phase exposes.
//!
//! The state is a pure value. Front-ends feed it discrete [`UiEvent`]s from
//! user actions or orchestrator completion and render [`UiState::controls`];
//! nothing here depends on time.
//!
//! ```text
//!            FilesSelected            ConvertStarted
//!   Idle ───────────────────▶ FilesSelected ───────────▶ Converting
//!    ▲  ◀── AllFilesRemoved ──┘   ▲                        │    │
//!    │                            │ FilesSelected /        │    │ BatchSucceeded
//!    │                            │ ConvertStarted         │    ▼
//!    │                          Failed ◀── BatchFailed ────┘  Complete
//!    └──────────────── Restart (from any phase) ─────────────────┘
//! ```

use crate::error::Img2PdfError;
use crate::progress::Progress;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The converter's current phase. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UiPhase {
    /// Nothing selected; only the select control is shown.
    #[default]
    Idle,
    /// 1–3 files selected; convert is enabled.
    FilesSelected,
    /// A batch is running; progress is visible.
    Converting,
    /// Every file converted; download and restart are offered.
    Complete,
    /// The last batch failed; behaves like `FilesSelected` plus an error.
    Failed,
}

/// Discrete inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A non-empty selection replaced the working set.
    FilesSelected { count: usize },
    /// The last file of the working set was removed.
    AllFilesRemoved,
    /// The user started a batch of `total` files.
    ConvertStarted { total: usize },
    /// A file of the running batch completed.
    Progress(Progress),
    /// Every file of the running batch completed.
    BatchSucceeded,
    /// The running batch was aborted.
    BatchFailed { message: String },
    /// Full reset.
    Restart,
}

impl UiEvent {
    fn describe(&self) -> &'static str {
        match self {
            UiEvent::FilesSelected { .. } => "select files",
            UiEvent::AllFilesRemoved => "remove all files",
            UiEvent::ConvertStarted { .. } => "start conversion",
            UiEvent::Progress(_) => "report progress",
            UiEvent::BatchSucceeded => "complete batch",
            UiEvent::BatchFailed { .. } => "fail batch",
            UiEvent::Restart => "restart",
        }
    }
}

/// What a front-end should show for the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub select_visible: bool,
    pub new_files_visible: bool,
    pub convert_enabled: bool,
    pub convert_label: &'static str,
    /// `Some` while the progress indicator is visible.
    pub progress: Option<Progress>,
    pub download_visible: bool,
    pub restart_visible: bool,
    /// Message of the batch failure being shown, if any.
    pub error: Option<String>,
}

pub const CONVERT_LABEL: &str = "Convert to PDF";
pub const CONVERTING_LABEL: &str = "Converting...";
pub const COMPLETE_LABEL: &str = "Conversion Complete!";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    phase: UiPhase,
    progress: Option<Progress>,
    error: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UiPhase {
        self.phase
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply one event. Illegal events leave the state untouched.
    pub fn apply(&mut self, event: UiEvent) -> Result<(), Img2PdfError> {
        use UiPhase::*;

        let from = self.phase;
        let next = match (&event, from) {
            (UiEvent::Restart, _) => {
                *self = Self::default();
                debug!("UI phase {:?} → Idle", from);
                return Ok(());
            }
            (UiEvent::FilesSelected { count }, Idle | FilesSelected | Failed) if *count > 0 => {
                self.progress = None;
                self.error = None;
                FilesSelected
            }
            (UiEvent::AllFilesRemoved, FilesSelected | Failed) => {
                self.error = None;
                Idle
            }
            (UiEvent::ConvertStarted { total }, FilesSelected | Failed) if *total > 0 => {
                self.progress = Some(Progress::new(0, *total));
                self.error = None;
                Converting
            }
            (UiEvent::Progress(p), Converting) => {
                self.progress = Some(*p);
                Converting
            }
            (UiEvent::BatchSucceeded, Converting) => {
                self.progress = self.progress.map(|p| Progress::new(p.total, p.total));
                Complete
            }
            (UiEvent::BatchFailed { message }, Converting) => {
                self.progress = None;
                self.error = Some(message.clone());
                Failed
            }
            _ => {
                return Err(Img2PdfError::InvalidTransition {
                    phase: from,
                    event: event.describe(),
                })
            }
        };

        if next != from {
            debug!("UI phase {:?} → {:?}", from, next);
        }
        self.phase = next;
        Ok(())
    }

    /// Derive the control layout for the current phase.
    pub fn controls(&self) -> Controls {
        match self.phase {
            UiPhase::Idle => Controls {
                select_visible: true,
                new_files_visible: false,
                convert_enabled: false,
                convert_label: CONVERT_LABEL,
                progress: None,
                download_visible: false,
                restart_visible: false,
                error: None,
            },
            UiPhase::FilesSelected | UiPhase::Failed => Controls {
                select_visible: false,
                new_files_visible: true,
                convert_enabled: true,
                convert_label: CONVERT_LABEL,
                progress: None,
                download_visible: false,
                restart_visible: false,
                error: self.error.clone(),
            },
            UiPhase::Converting => Controls {
                select_visible: false,
                new_files_visible: true,
                convert_enabled: false,
                convert_label: CONVERTING_LABEL,
                progress: self.progress,
                download_visible: false,
                restart_visible: false,
                error: None,
            },
            UiPhase::Complete => Controls {
                select_visible: false,
                new_files_visible: true,
                convert_enabled: false,
                convert_label: COMPLETE_LABEL,
                progress: self.progress,
                download_visible: true,
                restart_visible: true,
                error: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_in(phase_events: &[UiEvent]) -> UiState {
        let mut s = UiState::new();
        for e in phase_events {
            s.apply(e.clone()).expect("legal transition");
        }
        s
    }

    #[test]
    fn idle_controls() {
        let c = UiState::new().controls();
        assert!(c.select_visible);
        assert!(!c.convert_enabled);
        assert!(!c.download_visible);
        assert!(c.progress.is_none());
    }

    #[test]
    fn selecting_enables_convert() {
        let s = state_in(&[UiEvent::FilesSelected { count: 2 }]);
        assert_eq!(s.phase(), UiPhase::FilesSelected);
        let c = s.controls();
        assert!(c.convert_enabled);
        assert!(!c.select_visible);
        assert!(c.new_files_visible);
    }

    #[test]
    fn empty_selection_is_not_a_transition() {
        let mut s = UiState::new();
        assert!(s.apply(UiEvent::FilesSelected { count: 0 }).is_err());
        assert_eq!(s.phase(), UiPhase::Idle);
    }

    #[test]
    fn removing_everything_returns_to_idle() {
        let s = state_in(&[
            UiEvent::FilesSelected { count: 1 },
            UiEvent::AllFilesRemoved,
        ]);
        assert_eq!(s.phase(), UiPhase::Idle);
        assert!(s.controls().select_visible);
    }

    #[test]
    fn converting_shows_progress_and_disables_convert() {
        let s = state_in(&[
            UiEvent::FilesSelected { count: 3 },
            UiEvent::ConvertStarted { total: 3 },
            UiEvent::Progress(Progress::new(1, 3)),
        ]);
        let c = s.controls();
        assert_eq!(s.phase(), UiPhase::Converting);
        assert!(!c.convert_enabled);
        assert_eq!(c.convert_label, CONVERTING_LABEL);
        assert_eq!(c.progress, Some(Progress::new(1, 3)));
    }

    #[test]
    fn success_offers_download_and_restart() {
        let s = state_in(&[
            UiEvent::FilesSelected { count: 1 },
            UiEvent::ConvertStarted { total: 1 },
            UiEvent::BatchSucceeded,
        ]);
        let c = s.controls();
        assert_eq!(s.phase(), UiPhase::Complete);
        assert!(c.download_visible);
        assert!(c.restart_visible);
        assert!(!c.convert_enabled);
        assert_eq!(c.convert_label, COMPLETE_LABEL);
        assert_eq!(c.progress.map(|p| p.percentage), Some(100));
    }

    #[test]
    fn failure_is_retryable() {
        let mut s = state_in(&[
            UiEvent::FilesSelected { count: 2 },
            UiEvent::ConvertStarted { total: 2 },
            UiEvent::BatchFailed {
                message: "Error reading a.png: gone".into(),
            },
        ]);
        assert_eq!(s.phase(), UiPhase::Failed);
        let c = s.controls();
        assert!(c.convert_enabled);
        assert!(c.progress.is_none());
        assert!(!c.download_visible);
        assert_eq!(c.error.as_deref(), Some("Error reading a.png: gone"));

        s.apply(UiEvent::ConvertStarted { total: 2 }).unwrap();
        assert_eq!(s.phase(), UiPhase::Converting);
        assert!(s.error().is_none());
    }

    #[test]
    fn complete_rejects_new_batch() {
        let mut s = state_in(&[
            UiEvent::FilesSelected { count: 1 },
            UiEvent::ConvertStarted { total: 1 },
            UiEvent::BatchSucceeded,
        ]);
        let before = s.clone();
        let err = s.apply(UiEvent::ConvertStarted { total: 1 }).unwrap_err();
        assert!(matches!(
            err,
            Img2PdfError::InvalidTransition {
                phase: UiPhase::Complete,
                ..
            }
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn progress_outside_conversion_is_rejected() {
        let mut s = UiState::new();
        assert!(s.apply(UiEvent::Progress(Progress::new(1, 1))).is_err());
    }

    #[test]
    fn restart_from_every_phase() {
        let paths: Vec<Vec<UiEvent>> = vec![
            vec![],
            vec![UiEvent::FilesSelected { count: 1 }],
            vec![
                UiEvent::FilesSelected { count: 1 },
                UiEvent::ConvertStarted { total: 1 },
            ],
            vec![
                UiEvent::FilesSelected { count: 1 },
                UiEvent::ConvertStarted { total: 1 },
                UiEvent::BatchSucceeded,
            ],
            vec![
                UiEvent::FilesSelected { count: 1 },
                UiEvent::ConvertStarted { total: 1 },
                UiEvent::BatchFailed {
                    message: "x".into(),
                },
            ],
        ];
        for events in paths {
            let mut s = state_in(&events);
            s.apply(UiEvent::Restart).unwrap();
            assert_eq!(s, UiState::new());
        }
    }
}
