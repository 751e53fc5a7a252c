//! One open document: its engine handle, view state, thumbnails, and metadata.

pub mod metadata;
pub mod thumbnails;
pub mod view;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{PdfBackend, load_default_shared_bytes, open_default_backend_with_shared_bytes};
use crate::error::{AppError, AppResult};

pub use metadata::{
    DocumentDetails, FileStats, MetadataRecord, format_file_size, format_pdf_date,
    format_system_time, permissions_list,
};
pub use thumbnails::{ThumbnailCache, ThumbnailLookup, ThumbnailQueue, render_thumbnail};
pub use view::{FitMode, ViewState};

pub type SessionId = u64;

pub struct DocumentSession {
    session_id: SessionId,
    file_path: PathBuf,
    file_name: String,
    stats: FileStats,
    bytes: Arc<Vec<u8>>,
    doc: Box<dyn PdfBackend>,
    pub view: ViewState,
    pub thumbnails: ThumbnailCache,
    metadata: Option<MetadataRecord>,
}

impl DocumentSession {
    pub fn load(path: impl AsRef<Path>, session_id: SessionId) -> AppResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading document");

        let bytes = load_default_shared_bytes(path)?;
        let doc = open_default_backend_with_shared_bytes(path, Arc::clone(&bytes))?;
        let stats = FileStats::read(path).unwrap_or_else(|err| {
            warn!(error = %err, "file stats unavailable");
            FileStats {
                size: bytes.len() as u64,
                ..FileStats::default()
            }
        });

        let session = Self::from_backend(session_id, doc, bytes, stats);
        info!(
            session_id,
            pages = session.page_count(),
            size = session.stats.size,
            "document loaded"
        );
        Ok(session)
    }

    pub fn from_backend(
        session_id: SessionId,
        doc: Box<dyn PdfBackend>,
        bytes: Arc<Vec<u8>>,
        stats: FileStats,
    ) -> Self {
        let file_path = doc.path().to_path_buf();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());
        let view = ViewState::new(doc.page_count());
        let metadata = metadata::extract(doc.as_ref());

        Self {
            session_id,
            file_path,
            file_name,
            stats,
            bytes,
            doc,
            view,
            thumbnails: ThumbnailCache::new(),
            metadata,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.stats.size
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    pub fn doc(&self) -> &dyn PdfBackend {
        self.doc.as_ref()
    }

    pub fn shared_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    pub fn metadata(&self) -> Option<&MetadataRecord> {
        self.metadata.as_ref()
    }

    pub fn fit_to_width(&mut self, container_width: f32) -> f32 {
        self.view.fit_to_width(self.doc.as_ref(), container_width)
    }

    pub fn fit_to_page(&mut self, container_width: f32, container_height: f32) -> f32 {
        self.view
            .fit_to_page(self.doc.as_ref(), container_width, container_height)
    }

    pub fn refit(&mut self, container_width: f32, container_height: f32) -> f32 {
        self.view
            .refit(self.doc.as_ref(), container_width, container_height)
    }

    /// Renders the first `eager` thumbnails in page order. Returns the pages
    /// that failed so the background queue can skip them.
    pub fn prime_thumbnails(&mut self, eager: usize) -> Vec<usize> {
        let limit = eager.min(self.page_count());
        let mut failed = Vec::new();
        for page in 1..=limit {
            if let Err(err) = self.thumbnails.populate(self.doc.as_ref(), page) {
                warn!(error = %err, page, "thumbnail generation failed");
                failed.push(page);
            }
        }
        failed
    }

    pub fn details(&self) -> DocumentDetails {
        DocumentDetails {
            file_name: self.file_name.clone(),
            file_size: format_file_size(self.stats.size),
            file_path: self.file_path.display().to_string(),
            total_pages: self.page_count(),
            current_page: self.view.current_page(),
            file_created: format_system_time(self.stats.created),
            file_modified: format_system_time(self.stats.modified),
            metadata: self.metadata.clone(),
        }
    }
}

/// Owns the active session and hands out ids for new ones.
#[derive(Default)]
pub struct SessionHost {
    current: Option<DocumentSession>,
    last_session_id: SessionId,
}

impl SessionHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_session_id(&mut self) -> SessionId {
        self.last_session_id += 1;
        self.last_session_id
    }

    /// Loads `path` into a new session. On failure the current session stays.
    pub fn open(&mut self, path: impl AsRef<Path>) -> AppResult<&mut DocumentSession> {
        let session_id = self.next_session_id();
        let session = DocumentSession::load(path, session_id)?;
        self.replace_session(session);
        self.current
            .as_mut()
            .ok_or_else(|| AppError::unsupported("session vanished after load"))
    }

    /// Installs `session`, returning the one it replaced.
    pub fn replace_session(&mut self, session: DocumentSession) -> Option<DocumentSession> {
        self.last_session_id = self.last_session_id.max(session.session_id());
        self.current.replace(session)
    }

    pub fn session(&self) -> Option<&DocumentSession> {
        self.current.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DocumentSession> {
        self.current.as_mut()
    }

    pub fn current_id(&self) -> Option<SessionId> {
        self.current.as_ref().map(DocumentSession::session_id)
    }

    pub fn is_current(&self, session_id: SessionId) -> bool {
        self.current_id() == Some(session_id)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use crate::backend::{DocumentInfo, PdfBackend, RgbaFrame};
    use crate::error::{AppError, AppResult};
    use crate::test_support::{build_pdf, build_pdf_with_sizes, unique_temp_path};

    use super::{DocumentSession, FileStats, FitMode, SessionHost, ThumbnailLookup};

    /// Four letter-sized pages; page 2 has a degenerate box and never renders.
    struct BrokenPageDoc;

    impl PdfBackend for BrokenPageDoc {
        fn path(&self) -> &Path {
            Path::new("broken.pdf")
        }

        fn doc_id(&self) -> u64 {
            11
        }

        fn page_count(&self) -> usize {
            4
        }

        fn page_dimensions(&self, page: usize) -> AppResult<(f32, f32)> {
            if page == 1 {
                Ok((0.0, 0.0))
            } else {
                Ok((612.0, 792.0))
            }
        }

        fn render_page(&self, page: usize, scale: f32) -> AppResult<RgbaFrame> {
            if page == 1 {
                return Err(AppError::unsupported("page has no drawable area"));
            }
            let width = (612.0 * scale).round() as u32;
            let height = (792.0 * scale).round() as u32;
            Ok(RgbaFrame {
                width,
                height,
                pixels: vec![255; width as usize * height as usize * 4].into(),
            })
        }

        fn metadata(&self) -> AppResult<DocumentInfo> {
            Ok(DocumentInfo::default())
        }
    }

    #[test]
    fn load_starts_on_page_one_at_default_scale() {
        let file = unique_temp_path("session.pdf");
        fs::write(
            &file,
            build_pdf_with_sizes(
                &[(600.0, 800.0), (600.0, 800.0)],
                Some("/Title (Field Guide) /ModDate (D:20200202020202Z)"),
            ),
        )
        .expect("test file should be created");

        let session = DocumentSession::load(&file, 1).expect("document should load");
        assert_eq!(session.page_count(), 2);
        assert_eq!(session.view.current_page(), 1);
        assert!((session.view.scale() - 1.5).abs() < f32::EPSILON);
        assert_eq!(session.view.fit_mode(), FitMode::None);
        assert_eq!(session.file_size(), fs::metadata(&file).expect("stat").len());

        let metadata = session.metadata().expect("metadata should be extracted");
        assert_eq!(metadata.title, "Field Guide");
        assert_eq!(metadata.modification_date, "2020-02-02 02:02:02");

        let details = session.details();
        assert_eq!(details.total_pages, 2);
        assert_eq!(details.current_page, 1);
        assert!(details.file_name.starts_with("pdfv_session.pdf"));

        fs::remove_file(&file).expect("test file should be removed");
    }

    #[test]
    fn load_fails_for_non_pdf_bytes() {
        let file = unique_temp_path("fake.pdf");
        fs::write(&file, b"hello").expect("test file should be created");

        let err = DocumentSession::load(&file, 1)
            .err()
            .expect("non-pdf should not load");
        assert!(matches!(err, AppError::PdfLoad { .. }));

        fs::remove_file(&file).expect("test file should be removed");
    }

    #[test]
    fn prime_thumbnails_renders_leading_pages_only() {
        let file = unique_temp_path("prime.pdf");
        fs::write(&file, build_pdf(&["1", "2", "3", "4", "5"])).expect("test file should be created");

        let mut session = DocumentSession::load(&file, 1).expect("document should load");
        assert!(session.prime_thumbnails(3).is_empty());
        assert_eq!(session.thumbnails.len(), 3);
        assert!(matches!(session.thumbnails.get(3), ThumbnailLookup::Ready(_)));
        assert_eq!(session.thumbnails.get(4), ThumbnailLookup::Pending);

        fs::remove_file(&file).expect("test file should be removed");
    }

    #[test]
    fn prime_thumbnails_reports_pages_that_failed() {
        let mut session = DocumentSession::from_backend(
            3,
            Box::new(BrokenPageDoc),
            Arc::new(Vec::new()),
            FileStats::default(),
        );

        assert_eq!(session.prime_thumbnails(3), vec![2]);
        assert!(matches!(session.thumbnails.get(1), ThumbnailLookup::Ready(_)));
        assert!(matches!(session.thumbnails.get(3), ThumbnailLookup::Ready(_)));
        assert!(!session.thumbnails.contains(2));
        assert_eq!(session.thumbnails.get(4), ThumbnailLookup::Pending);
    }

    #[test]
    fn fit_to_width_uses_real_page_geometry() {
        let file = unique_temp_path("fit.pdf");
        fs::write(&file, build_pdf_with_sizes(&[(600.0, 800.0)], None))
            .expect("test file should be created");

        let mut session = DocumentSession::load(&file, 1).expect("document should load");
        assert!((session.fit_to_width(630.0) - 1.0).abs() < 1e-4);

        fs::remove_file(&file).expect("test file should be removed");
    }

    #[test]
    fn host_replaces_session_with_fresh_state() {
        let first = unique_temp_path("first.pdf");
        let second = unique_temp_path("second.pdf");
        fs::write(&first, build_pdf(&["a", "b", "c"])).expect("test file should be created");
        fs::write(&second, build_pdf(&["x"])).expect("test file should be created");

        let mut host = SessionHost::new();
        {
            let session = host.open(&first).expect("first document should load");
            session.view.goto_page(3);
            session.prime_thumbnails(3);
        }
        let first_id = host.current_id().expect("session should exist");

        let session = host.open(&second).expect("second document should load");
        assert_eq!(session.view.current_page(), 1);
        assert!(session.thumbnails.is_empty());
        let second_id = session.session_id();
        assert_ne!(first_id, second_id);
        assert!(host.is_current(second_id));
        assert!(!host.is_current(first_id));

        fs::remove_file(&first).expect("test file should be removed");
        fs::remove_file(&second).expect("test file should be removed");
    }

    #[test]
    fn failed_open_keeps_previous_session() {
        let good = unique_temp_path("good.pdf");
        fs::write(&good, build_pdf(&["ok"])).expect("test file should be created");

        let mut host = SessionHost::new();
        host.open(&good).expect("document should load");
        let id = host.current_id();

        assert!(host.open(unique_temp_path("missing.pdf")).is_err());
        assert_eq!(host.current_id(), id);

        fs::remove_file(&good).expect("test file should be removed");
    }
}
