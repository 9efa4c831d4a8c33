//! Delivering converted documents ("download").
//!
//! A [`DownloadTarget`] receives each finished PDF. [`DirectoryTarget`]
//! saves into a folder the way a browser's download manager would: the
//! bytes go to a temporary file in the destination directory which is then
//! renamed into place, and an existing name gets a ` (1)`, ` (2)`, … suffix
//! instead of being overwritten. The temporary file handle never outlives
//! the single delivery it was created for.

use crate::error::Img2PdfError;
use crate::output::ConversionResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Receives finished PDFs.
pub trait DownloadTarget: Send + Sync {
    /// Store `pdf` under `file_name` and return where it ended up.
    fn deliver(&self, file_name: &str, pdf: &[u8]) -> Result<PathBuf, Img2PdfError>;
}

/// Saves downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadTarget for DirectoryTarget {
    fn deliver(&self, file_name: &str, pdf: &[u8]) -> Result<PathBuf, Img2PdfError> {
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| Img2PdfError::OutputWriteFailed { path, source }
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err(&self.dir))?;
        let dest = unique_destination(&self.dir, file_name);

        let mut tmp = tempfile::Builder::new()
            .prefix(".img2pdf-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(write_err(&dest))?;
        tmp.write_all(pdf).map_err(write_err(&dest))?;
        tmp.flush().map_err(write_err(&dest))?;
        tmp.persist_noclobber(&dest)
            .map_err(|e| Img2PdfError::OutputWriteFailed {
                path: dest.clone(),
                source: e.error,
            })?;

        debug!("Saved {} ({} bytes)", dest.display(), pdf.len());
        Ok(dest)
    }
}

/// `dir/name`, or `dir/stem (n).ext` for the first free `n`.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Deliver every result, in order. Stops at the first failed write.
pub fn download(
    results: &[ConversionResult],
    target: &dyn DownloadTarget,
) -> Result<Vec<PathBuf>, Img2PdfError> {
    let mut saved = Vec::with_capacity(results.len());
    for result in results {
        saved.push(target.deliver(&result.file_name, &result.pdf)?);
    }
    info!("Downloaded {} file(s)", saved.len());
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSize;
    use crate::pipeline::layout::place_image;

    fn result(name: &str, body: &[u8]) -> ConversionResult {
        ConversionResult {
            file_name: name.into(),
            source_name: name.replace(".pdf", ".png"),
            placement: place_image(PageSize::A4, 50.0, 1, 1),
            pdf: body.to_vec(),
        }
    }

    #[test]
    fn writes_each_result() {
        let dir = tempfile::tempdir().unwrap();
        let target = DirectoryTarget::new(dir.path());
        let saved = download(&[result("a.pdf", b"AAA"), result("b.pdf", b"BB")], &target)
            .unwrap();
        assert_eq!(saved, vec![dir.path().join("a.pdf"), dir.path().join("b.pdf")]);
        assert_eq!(std::fs::read(dir.path().join("a.pdf")).unwrap(), b"AAA");
    }

    #[test]
    fn collisions_get_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let target = DirectoryTarget::new(dir.path());
        let saved = download(
            &[result("same.pdf", b"1"), result("same.pdf", b"2"), result("same.pdf", b"3")],
            &target,
        )
        .unwrap();
        assert_eq!(saved[1], dir.path().join("same (1).pdf"));
        assert_eq!(saved[2], dir.path().join("same (2).pdf"));
        assert_eq!(std::fs::read(&saved[0]).unwrap(), b"1");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        download(&[result("a.pdf", b"x")], &DirectoryTarget::new(dir.path())).unwrap();
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf"]);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/pdfs");
        let saved = DirectoryTarget::new(&nested).deliver("n.pdf", b"n").unwrap();
        assert_eq!(saved, nested.join("n.pdf"));
    }
}
