//! Output types produced by a batch conversion.

use crate::error::FileError;
use crate::pipeline::layout::Placement;
use serde::Serialize;

/// One converted file.
///
/// Created once by the orchestrator and never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    /// Name to save the PDF under: `<source name without extension>.pdf`.
    pub file_name: String,
    /// Original name of the image this document was made from.
    pub source_name: String,
    /// Where the image sits on its page.
    pub placement: Placement,
    /// The serialised PDF document.
    #[serde(skip)]
    pub pdf: Vec<u8>,
}

impl ConversionResult {
    pub fn pdf_len(&self) -> usize {
        self.pdf.len()
    }
}

/// Terminal result of one batch.
///
/// There is no partial success: one failed file discards every result
/// already produced by the same batch.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// Every file converted. Results are in completion order.
    AllSucceeded(Vec<ConversionResult>),
    /// The first failure observed; no results are kept.
    Failed(FileError),
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::AllSucceeded(_))
    }

    pub fn results(&self) -> Option<&[ConversionResult]> {
        match self {
            BatchOutcome::AllSucceeded(r) => Some(r),
            BatchOutcome::Failed(_) => None,
        }
    }

    /// Treat a failed batch as an error.
    pub fn into_result(self) -> Result<Vec<ConversionResult>, FileError> {
        match self {
            BatchOutcome::AllSucceeded(r) => Ok(r),
            BatchOutcome::Failed(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSize;
    use crate::pipeline::layout::place_image;

    fn result() -> ConversionResult {
        ConversionResult {
            file_name: "a.pdf".into(),
            source_name: "a.png".into(),
            placement: place_image(PageSize::A4, 50.0, 1, 1),
            pdf: b"%PDF-1.3".to_vec(),
        }
    }

    #[test]
    fn success_exposes_results() {
        let o = BatchOutcome::AllSucceeded(vec![result()]);
        assert!(o.is_success());
        assert_eq!(o.results().map(|r| r.len()), Some(1));
        assert_eq!(o.into_result().unwrap()[0].pdf_len(), 8);
    }

    #[test]
    fn failure_exposes_nothing() {
        let o = BatchOutcome::Failed(FileError::Read {
            name: "a.png".into(),
            detail: "gone".into(),
        });
        assert!(!o.is_success());
        assert!(o.results().is_none());
        assert_eq!(o.into_result().unwrap_err().file_name(), "a.png");
    }

    #[test]
    fn json_omits_pdf_bytes() {
        let json = serde_json::to_value(result()).unwrap();
        assert_eq!(json["file_name"], "a.pdf");
        assert!(json.get("pdf").is_none());
        assert_eq!(json["placement"]["x"], 50.0);
    }
}
