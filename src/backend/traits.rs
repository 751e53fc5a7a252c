use std::path::Path;
use std::sync::Arc;

use crate::error::AppResult;

use super::info::DocumentInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl RgbaFrame {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels_to_vec(&self) -> Vec<u8> {
        self.pixels.as_ref().to_vec()
    }

    /// True when both frames point at the same pixel buffer.
    pub fn shares_pixels(&self, other: &RgbaFrame) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// Capability surface of the external PDF engine. Pages are 0-based here.
pub trait PdfBackend: Send {
    fn path(&self) -> &Path;
    fn doc_id(&self) -> u64;
    fn page_count(&self) -> usize;
    /// Unscaled page size in points (the viewport at scale 1.0).
    fn page_dimensions(&self, page: usize) -> AppResult<(f32, f32)>;
    fn render_page(&self, page: usize, scale: f32) -> AppResult<RgbaFrame>;
    fn metadata(&self) -> AppResult<DocumentInfo>;
}
