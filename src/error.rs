use std::path::{Path, PathBuf};

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to load {}: {reason}", path.display())]
    PdfLoad { path: PathBuf, reason: String },
    #[error("metadata unavailable: {0}")]
    Metadata(String),
    #[error("PDF render failed for page {page}")]
    PdfRender {
        page: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("page geometry unavailable for page {page}: {reason}")]
    Geometry { page: usize, reason: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn pdf_load(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::PdfLoad {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata(message.into())
    }

    pub fn pdf_render(page: usize, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::PdfRender {
            page,
            source: Box::new(source),
        }
    }

    pub fn geometry(page: usize, reason: impl Into<String>) -> Self {
        Self::Geometry {
            page,
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Load failures are the only errors surfaced as blocking to the user.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::PdfLoad { .. } | Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn pdf_render_error_wraps_page_and_source() {
        let err = AppError::pdf_render(7, AppError::invalid_argument("bad page"));
        assert!(matches!(err, AppError::PdfRender { page: 7, .. }));
        assert_eq!(err.to_string(), "PDF render failed for page 7");
    }

    #[test]
    fn pdf_load_error_names_the_path() {
        let err = AppError::pdf_load("/tmp/broken.pdf", "not a pdf");
        assert_eq!(err.to_string(), "failed to load /tmp/broken.pdf: not a pdf");
        assert!(err.is_load_failure());
        assert!(!AppError::metadata("no info").is_load_failure());
    }
}
