use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use tracing::debug;

use crate::backend::{PdfBackend, RgbaFrame};
use crate::error::{AppError, AppResult};

pub const THUMBNAIL_MAX_WIDTH: f32 = 150.0;
pub const THUMBNAIL_MAX_HEIGHT: f32 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailLookup {
    Ready(RgbaFrame),
    Pending,
}

/// Scale that fits a page of the given size into the thumbnail box.
pub fn thumbnail_scale(page_width: f32, page_height: f32) -> AppResult<f32> {
    if !page_width.is_finite() || !page_height.is_finite() || page_width <= 0.0 || page_height <= 0.0
    {
        return Err(AppError::invalid_argument(
            "thumbnail source page must have a positive size",
        ));
    }
    Ok((THUMBNAIL_MAX_WIDTH / page_width).min(THUMBNAIL_MAX_HEIGHT / page_height))
}

/// Renders the thumbnail of a 1-based page without touching any cache.
pub fn render_thumbnail(doc: &dyn PdfBackend, page: usize) -> AppResult<RgbaFrame> {
    if page == 0 || page > doc.page_count() {
        return Err(AppError::invalid_argument("page index is out of range"));
    }
    let (width, height) = doc.page_dimensions(page - 1)?;
    let scale = thumbnail_scale(width, height)?;
    doc.render_page(page - 1, scale)
}

/// Per-document thumbnail store. Entries live until the document is replaced.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    entries: HashMap<usize, RgbaFrame>,
    wanted: VecDeque<usize>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A miss marks the page as wanted so background population serves it next.
    pub fn get(&mut self, page: usize) -> ThumbnailLookup {
        if let Some(frame) = self.entries.get(&page) {
            return ThumbnailLookup::Ready(frame.clone());
        }
        if !self.wanted.contains(&page) {
            self.wanted.push_back(page);
        }
        ThumbnailLookup::Pending
    }

    pub fn contains(&self, page: usize) -> bool {
        self.entries.contains_key(&page)
    }

    pub fn populate(&mut self, doc: &dyn PdfBackend, page: usize) -> AppResult<RgbaFrame> {
        if let Some(frame) = self.entries.get(&page) {
            return Ok(frame.clone());
        }
        let frame = render_thumbnail(doc, page)?;
        debug!(page, width = frame.width, height = frame.height, "thumbnail generated");
        self.insert(page, frame.clone());
        Ok(frame)
    }

    pub fn insert(&mut self, page: usize, frame: RgbaFrame) {
        self.wanted.retain(|wanted| *wanted != page);
        self.entries.entry(page).or_insert(frame);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.wanted.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take_wanted(&mut self) -> Option<usize> {
        while let Some(page) = self.wanted.pop_front() {
            if !self.entries.contains_key(&page) {
                return Some(page);
            }
        }
        None
    }
}

/// Orders background thumbnail jobs: wanted pages first, then ascending
/// page order. At most one job is outstanding at a time.
#[derive(Debug)]
pub struct ThumbnailQueue {
    page_count: usize,
    cursor: usize,
    in_flight: Option<usize>,
    failed: HashSet<usize>,
    yield_every: usize,
    yield_pause: Duration,
}

impl ThumbnailQueue {
    pub fn new(page_count: usize, yield_every: usize, yield_pause: Duration) -> Self {
        Self {
            page_count,
            cursor: 1,
            in_flight: None,
            failed: HashSet::new(),
            yield_every: yield_every.max(1),
            yield_pause,
        }
    }

    pub fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    pub fn next_job(&mut self, cache: &mut ThumbnailCache) -> Option<usize> {
        if self.in_flight.is_some() {
            return None;
        }

        let next = loop {
            if let Some(page) = cache.take_wanted() {
                if (1..=self.page_count).contains(&page) && !self.failed.contains(&page) {
                    break Some(page);
                }
                continue;
            }
            while self.cursor <= self.page_count
                && (cache.contains(self.cursor) || self.failed.contains(&self.cursor))
            {
                self.cursor += 1;
            }
            if self.cursor > self.page_count {
                break None;
            }
            break Some(self.cursor);
        };

        self.in_flight = next;
        next
    }

    /// Returns the pause to take before dispatching the next job.
    pub fn on_completed(&mut self, page: usize) -> Duration {
        if self.in_flight == Some(page) {
            self.in_flight = None;
        }
        if page % self.yield_every == 0 {
            self.yield_pause
        } else {
            Duration::ZERO
        }
    }

    /// Failed pages are not retried for the rest of the session.
    pub fn on_failed(&mut self, page: usize) {
        if self.in_flight == Some(page) {
            self.in_flight = None;
        }
        self.failed.insert(page);
    }

    pub fn is_finished(&self, cache: &ThumbnailCache) -> bool {
        self.in_flight.is_none()
            && (1..=self.page_count).all(|page| cache.contains(page) || self.failed.contains(&page))
    }
}
