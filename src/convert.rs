//! Batch conversion: every working-set file → its own single-page PDF.
//!
//! All files are launched at once as independent tokio tasks and joined
//! through a [`FuturesUnordered`], so results arrive in completion order.
//! The first failure aborts the tasks still in flight and discards every
//! result already collected: a batch either succeeds as a whole or yields
//! nothing.

use crate::config::{ConversionConfig, MAX_FILES};
use crate::error::{FileError, Img2PdfError};
use crate::output::{BatchOutcome, ConversionResult};
use crate::pipeline::{decode, encode, layout};
use crate::progress::Progress;
use crate::selection::SelectedFile;
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Instant;
use tracing::{debug, error, info};

/// Convert every file of a working set.
///
/// # Returns
/// `Ok(BatchOutcome::AllSucceeded)` with one result per input, or
/// `Ok(BatchOutcome::Failed)` carrying the first per-file error.
///
/// # Errors
/// Returns `Err(Img2PdfError)` only when the batch cannot start or the
/// runtime lost a task:
/// - [`Img2PdfError::EmptyBatch`] for an empty working set
/// - [`Img2PdfError::TooManyFiles`] for more than three files
/// - [`Img2PdfError::Internal`] if a conversion task panicked
pub async fn convert_batch(
    files: &[SelectedFile],
    config: &ConversionConfig,
) -> Result<BatchOutcome, Img2PdfError> {
    if files.is_empty() {
        return Err(Img2PdfError::EmptyBatch);
    }
    if files.len() > MAX_FILES {
        return Err(Img2PdfError::TooManyFiles {
            got: files.len(),
            max: MAX_FILES,
        });
    }

    let start = Instant::now();
    let total = files.len();
    info!("Starting batch of {} file(s)", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut tasks = FuturesUnordered::new();
    for (index, file) in files.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(file.file_name(), index, total);
        }
        let file = file.clone();
        let cfg = config.clone();
        tasks.push(tokio::spawn(async move { convert_file(&file, &cfg).await }));
    }

    let mut results = Vec::with_capacity(total);
    while let Some(joined) = tasks.next().await {
        let outcome = joined
            .map_err(|e| Img2PdfError::Internal(format!("Conversion task panicked: {}", e)))?;

        match outcome {
            Ok(result) => {
                let progress = Progress::new(results.len() + 1, total);
                debug!("{} done: {}", result.source_name, progress.fraction_text());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_complete(&result.source_name, progress);
                }
                results.push(result);
            }
            Err(e) => {
                error!("{}", e);
                for task in tasks.iter() {
                    task.abort();
                }
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(e.file_name(), &e);
                    cb.on_batch_complete(total, false);
                }
                info!(
                    "Batch failed after {}ms; discarded {} finished file(s)",
                    start.elapsed().as_millis(),
                    results.len()
                );
                return Ok(BatchOutcome::Failed(e));
            }
        }
    }

    info!(
        "Batch complete: {} file(s) in {}ms",
        total,
        start.elapsed().as_millis()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, true);
    }
    Ok(BatchOutcome::AllSucceeded(results))
}

/// Convert a single file: resolve its kind, read it, decode, lay out, encode.
pub async fn convert_file(
    file: &SelectedFile,
    config: &ConversionConfig,
) -> Result<ConversionResult, FileError> {
    let name = file.file_name().to_string();
    let kind = decode::ImageKind::from_mime_type(file.mime_type()).ok_or_else(|| {
        FileError::UnsupportedFormat {
            name: name.clone(),
            mime_type: file.mime_type().to_string(),
        }
    })?;

    let bytes = file.read().await?;
    debug!("Read {} ({} bytes, {:?})", name, bytes.len(), kind);

    let page_size = config.page_size;
    let margin = config.margin;
    let mode = config.decode_mode;
    let title = config
        .document_title
        .clone()
        .unwrap_or_else(|| file.display_name().to_string());
    let task_name = name.clone();

    let (placement, pdf) = tokio::task::spawn_blocking(move || {
        let img = decode::decode_image(&bytes, kind, mode).map_err(|e| FileError::Conversion {
            name: task_name.clone(),
            detail: e.to_string(),
        })?;
        let placement = layout::place_image(page_size, margin, img.width(), img.height());
        if placement.overflows() {
            debug!(
                "{} ({}x{}) does not fit the page and will be clipped",
                task_name,
                img.width(),
                img.height()
            );
        }
        let pdf = encode::encode_pdf(&img, &placement, &title).map_err(|detail| {
            FileError::Conversion {
                name: task_name.clone(),
                detail,
            }
        })?;
        Ok::<_, FileError>((placement, pdf))
    })
    .await
    .map_err(|e| FileError::Conversion {
        name: name.clone(),
        detail: format!("encoder task panicked: {}", e),
    })??;

    Ok(ConversionResult {
        file_name: file.output_file_name(),
        source_name: name,
        placement,
        pdf,
    })
}

/// Synchronous wrapper around [`convert_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    files: &[SelectedFile],
    config: &ConversionConfig,
) -> Result<BatchOutcome, Img2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Img2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_batch(files, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn image_file(name: &str, mime: &str, format: ImageFormat, w: u32, h: u32) -> SelectedFile {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([0, 128, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        SelectedFile::from_bytes(name, mime, buf)
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let err = convert_batch(&[], &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Img2PdfError::EmptyBatch));
    }

    #[tokio::test]
    async fn single_png_converts() {
        let file = image_file("dot.png", "image/png", ImageFormat::Png, 20, 10);
        let result = convert_file(&file, &ConversionConfig::default()).await.unwrap();
        assert_eq!(result.file_name, "dot.pdf");
        assert_eq!(result.source_name, "dot.png");
        assert_eq!((result.placement.width, result.placement.height), (20.0, 10.0));
        assert!(result.pdf.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn unsupported_type_fails_before_reading() {
        let file = SelectedFile::from_path("/missing/notes.txt").with_mime_type("text/plain");
        let err = convert_file(&file, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FileError::UnsupportedFormat {
                name: "notes.txt".into(),
                mime_type: "text/plain".into(),
            }
        );
    }

    #[tokio::test]
    async fn corrupt_bytes_are_a_conversion_error() {
        let file = SelectedFile::from_bytes("bad.png", "image/png", b"garbage".to_vec());
        let err = convert_file(&file, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Conversion { ref name, .. } if name == "bad.png"));
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch() {
        let files = vec![
            image_file("a.png", "image/png", ImageFormat::Png, 4, 4),
            SelectedFile::from_bytes("b.txt", "text/plain", b"hello".to_vec()),
        ];
        let outcome = convert_batch(&files, &ConversionConfig::default())
            .await
            .unwrap();
        assert!(outcome.results().is_none());
        match outcome {
            BatchOutcome::Failed(e) => assert_eq!(e.file_name(), "b.txt"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn sync_wrapper_runs_its_own_runtime() {
        let files = vec![image_file("s.jpg", "image/jpeg", ImageFormat::Jpeg, 8, 8)];
        let outcome = convert_sync(&files, &ConversionConfig::default()).unwrap();
        assert!(outcome.is_success());
    }
}
