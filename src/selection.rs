//! File selection: the working set of up to [`MAX_FILES`] images.
//!
//! The [`SelectionManager`] owns the working set and keeps two injected
//! collaborators in step with it:
//!
//! * a [`FileInput`] — the picker's own list of chosen files, which must
//!   always mirror the working set (same entries, same order) so a stale
//!   picker selection can never be converted;
//! * a [`PreviewSink`] — wherever thumbnails are rendered.

use crate::config::MAX_FILES;
use crate::error::{FileError, Img2PdfError};
use crate::pipeline::decode::ImageKind;
use crate::pipeline::thumbnail::{render_thumbnail, Thumbnail};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Last extension of a file name, e.g. `.png` in `holiday.photo.png`.
static RE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").unwrap());

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Strip the last extension from a file name (`scan.2024.png` → `scan.2024`).
pub fn strip_extension(file_name: &str) -> String {
    RE_EXTENSION.replace(file_name, "").into_owned()
}

/// Where a selected file's bytes come from.
#[derive(Clone)]
pub enum FileSource {
    /// Bytes already in memory.
    Memory(Arc<[u8]>),
    /// A file on disk, read when the bytes are first needed.
    Path(PathBuf),
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            FileSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
        }
    }
}

/// One entry of the working set.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    file_name: String,
    display_name: String,
    mime_type: String,
    source: FileSource,
}

impl SelectedFile {
    /// Wrap an in-memory buffer with its declared MIME type.
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            display_name: strip_extension(&file_name),
            file_name,
            mime_type: mime_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// Reference a file on disk. The MIME type is guessed from the extension;
    /// unknown extensions are declared as `application/octet-stream`.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = image::ImageFormat::from_path(path)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| UNKNOWN_MIME.to_string());
        Self {
            display_name: strip_extension(&file_name),
            file_name,
            mime_type,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// Override the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name without its last extension.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// `<display name>.pdf`
    pub fn output_file_name(&self) -> String {
        format!("{}.pdf", self.display_name)
    }

    /// Read the file's bytes.
    pub async fn read(&self) -> Result<Arc<[u8]>, FileError> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(Arc::clone(bytes)),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|e| FileError::Read {
                    name: self.file_name.clone(),
                    detail: e.to_string(),
                }),
        }
    }
}

/// A rendered preview of one working-set entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub index: usize,
    pub file_name: String,
    pub mime_type: String,
    /// `None` when the file could not be decoded as its declared type.
    pub thumbnail: Option<Thumbnail>,
}

/// The picker's backing list of chosen files.
pub trait FileInput: Send {
    /// Replace the picker's list with exactly `files`, in order.
    fn set_files(&mut self, files: &[SelectedFile]);

    /// Forget the picker's list.
    fn clear(&mut self);
}

/// Render target for selection previews.
pub trait PreviewSink: Send {
    /// Show `preview` at position `preview.index`.
    fn show(&mut self, preview: &Preview);

    /// Remove the preview at `index`; later previews shift down by one.
    fn remove(&mut self, index: usize);

    /// Remove every preview.
    fn clear(&mut self);
}

/// A file input with no widget behind it.
pub struct NoopFileInput;

impl FileInput for NoopFileInput {
    fn set_files(&mut self, _files: &[SelectedFile]) {}
    fn clear(&mut self) {}
}

/// A preview sink that renders nothing.
pub struct NoopPreviewSink;

impl PreviewSink for NoopPreviewSink {
    fn show(&mut self, _preview: &Preview) {}
    fn remove(&mut self, _index: usize) {}
    fn clear(&mut self) {}
}

/// Owns the working set and keeps the picker and previews consistent with it.
pub struct SelectionManager {
    files: Vec<SelectedFile>,
    input: Box<dyn FileInput>,
    previews: Box<dyn PreviewSink>,
    thumbnail_width: u32,
}

impl SelectionManager {
    pub fn new(
        input: Box<dyn FileInput>,
        previews: Box<dyn PreviewSink>,
        thumbnail_width: u32,
    ) -> Self {
        Self {
            files: Vec::with_capacity(MAX_FILES),
            input,
            previews,
            thumbnail_width,
        }
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Replace the working set with `candidates`.
    ///
    /// Returns `Ok(false)` for an empty selection (nothing changes) and
    /// `Ok(true)` once the working set has been replaced and previewed.
    ///
    /// # Errors
    /// [`Img2PdfError::TooManyFiles`] when more than [`MAX_FILES`] are
    /// offered; the working set is kept and the picker's list is cleared.
    pub async fn select_files(
        &mut self,
        candidates: Vec<SelectedFile>,
    ) -> Result<bool, Img2PdfError> {
        if candidates.len() > MAX_FILES {
            warn!(
                "Rejected selection of {} files (maximum {})",
                candidates.len(),
                MAX_FILES
            );
            self.input.clear();
            return Err(Img2PdfError::TooManyFiles {
                got: candidates.len(),
                max: MAX_FILES,
            });
        }
        if candidates.is_empty() {
            debug!("Empty selection ignored");
            return Ok(false);
        }

        self.previews.clear();
        self.files = candidates;
        self.input.set_files(&self.files);
        info!("Selected {} file(s)", self.files.len());

        for (index, file) in self.files.iter().enumerate() {
            let preview = Preview {
                index,
                file_name: file.file_name().to_string(),
                mime_type: file.mime_type().to_string(),
                thumbnail: preview_thumbnail(file, self.thumbnail_width).await,
            };
            self.previews.show(&preview);
        }
        Ok(true)
    }

    /// Remove the file at `index` and its preview.
    pub fn remove_file(&mut self, index: usize) -> Result<SelectedFile, Img2PdfError> {
        if index >= self.files.len() {
            return Err(Img2PdfError::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }
        let removed = self.files.remove(index);
        self.previews.remove(index);
        self.input.set_files(&self.files);
        debug!(
            "Removed {} ({} file(s) left)",
            removed.file_name(),
            self.files.len()
        );
        Ok(removed)
    }

    /// Empty the working set, the previews and the picker's list.
    pub fn clear(&mut self) {
        self.files.clear();
        self.previews.clear();
        self.input.clear();
    }
}

/// Best-effort thumbnail; a broken preview never blocks selection.
async fn preview_thumbnail(file: &SelectedFile, max_width: u32) -> Option<Thumbnail> {
    let kind = ImageKind::from_mime_type(file.mime_type())?;
    let bytes = match file.read().await {
        Ok(b) => b,
        Err(e) => {
            debug!("No preview: {}", e);
            return None;
        }
    };
    let result = tokio::task::spawn_blocking(move || render_thumbnail(&bytes, kind, max_width))
        .await
        .ok()?;
    match result {
        Ok(t) => Some(t),
        Err(e) => {
            debug!("No preview for {}: {}", file.file_name(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Recorder {
        input: Arc<Mutex<Vec<String>>>,
        previews: Arc<Mutex<Vec<String>>>,
    }

    impl FileInput for Recorder {
        fn set_files(&mut self, files: &[SelectedFile]) {
            *self.input.lock().unwrap() = files.iter().map(|f| f.file_name().to_string()).collect();
        }
        fn clear(&mut self) {
            self.input.lock().unwrap().clear();
        }
    }

    impl PreviewSink for Recorder {
        fn show(&mut self, preview: &Preview) {
            let mut p = self.previews.lock().unwrap();
            assert_eq!(p.len(), preview.index);
            p.push(preview.file_name.clone());
        }
        fn remove(&mut self, index: usize) {
            self.previews.lock().unwrap().remove(index);
        }
        fn clear(&mut self) {
            self.previews.lock().unwrap().clear();
        }
    }

    fn manager() -> (SelectionManager, Recorder) {
        let rec = Recorder::default();
        let m = SelectionManager::new(Box::new(rec.clone()), Box::new(rec.clone()), 100);
        (m, rec)
    }

    fn file(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, "image/png", b"not decoded here".to_vec())
    }

    fn names(m: &SelectionManager) -> Vec<&str> {
        m.files().iter().map(|f| f.file_name()).collect()
    }

    #[test]
    fn strip_extension_removes_last_only() {
        assert_eq!(strip_extension("photo.png"), "photo");
        assert_eq!(strip_extension("scan.2024.jpeg"), "scan.2024");
        assert_eq!(strip_extension("README"), "README");
        assert_eq!(strip_extension(".hidden"), "");
    }

    #[test]
    fn output_name_uses_display_name() {
        assert_eq!(file("cat.final.png").output_file_name(), "cat.final.pdf");
    }

    #[test]
    fn from_path_guesses_mime_type() {
        assert_eq!(SelectedFile::from_path("/tmp/a.JPG").mime_type(), "image/jpeg");
        assert_eq!(SelectedFile::from_path("b.webp").mime_type(), "image/webp");
        assert_eq!(SelectedFile::from_path("notes.txt").mime_type(), UNKNOWN_MIME);
        assert_eq!(SelectedFile::from_path("dir/c.png").display_name(), "c");
    }

    #[tokio::test]
    async fn select_replaces_and_syncs() {
        let (mut m, rec) = manager();
        assert!(m.select_files(vec![file("a.png"), file("b.png")]).await.unwrap());
        assert!(m.select_files(vec![file("c.png")]).await.unwrap());
        assert_eq!(names(&m), vec!["c.png"]);
        assert_eq!(*rec.input.lock().unwrap(), vec!["c.png"]);
        assert_eq!(*rec.previews.lock().unwrap(), vec!["c.png"]);
    }

    #[tokio::test]
    async fn empty_selection_is_noop() {
        let (mut m, rec) = manager();
        m.select_files(vec![file("a.png")]).await.unwrap();
        assert!(!m.select_files(vec![]).await.unwrap());
        assert_eq!(names(&m), vec!["a.png"]);
        assert_eq!(*rec.input.lock().unwrap(), vec!["a.png"]);
    }

    #[tokio::test]
    async fn oversize_selection_keeps_set_and_clears_picker() {
        let (mut m, rec) = manager();
        m.select_files(vec![file("a.png")]).await.unwrap();
        let err = m
            .select_files(vec![file("1.png"), file("2.png"), file("3.png"), file("4.png")])
            .await
            .unwrap_err();
        assert!(matches!(err, Img2PdfError::TooManyFiles { got: 4, max: 3 }));
        assert_eq!(names(&m), vec!["a.png"]);
        assert!(rec.input.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_keeps_relative_order() {
        let (mut m, rec) = manager();
        m.select_files(vec![file("a.png"), file("b.png"), file("c.png")])
            .await
            .unwrap();
        let removed = m.remove_file(1).unwrap();
        assert_eq!(removed.file_name(), "b.png");
        assert_eq!(names(&m), vec!["a.png", "c.png"]);
        assert_eq!(*rec.input.lock().unwrap(), vec!["a.png", "c.png"]);
        assert_eq!(*rec.previews.lock().unwrap(), vec!["a.png", "c.png"]);
    }

    #[tokio::test]
    async fn remove_out_of_range() {
        let (mut m, _) = manager();
        m.select_files(vec![file("a.png")]).await.unwrap();
        let err = m.remove_file(1).unwrap_err();
        assert!(matches!(err, Img2PdfError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(m.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_everything() {
        let (mut m, rec) = manager();
        m.select_files(vec![file("a.png"), file("b.png")]).await.unwrap();
        m.clear();
        assert!(m.is_empty());
        assert!(rec.input.lock().unwrap().is_empty());
        assert!(rec.previews.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_path_gets_no_thumbnail() {
        let f = SelectedFile::from_path("/definitely/not/here.png");
        assert!(preview_thumbnail(&f, 100).await.is_none());
        assert!(matches!(f.read().await, Err(FileError::Read { .. })));
    }
}
