use tracing::{debug, warn};

use crate::backend::PdfBackend;

pub const DEFAULT_SCALE: f32 = 1.5;
pub const RESET_SCALE: f32 = 1.0;
pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 5.0;
pub const ZOOM_STEP: f32 = 1.2;
/// Horizontal and vertical breathing room, in pixels, kept around a fitted page.
pub const FIT_MARGIN_PX: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    #[default]
    None,
    FitWidth,
    FitPage,
}

impl FitMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "manual",
            Self::FitWidth => "fit width",
            Self::FitPage => "fit page",
        }
    }
}

/// Page position and zoom of one open document.
///
/// Pages are 1-based. Every mutation clamps, so `current_page` always lies in
/// `1..=page_count` and `scale` in `MIN_SCALE..=MAX_SCALE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    current_page: usize,
    page_count: usize,
    scale: f32,
    fit_mode: FitMode,
}

impl ViewState {
    pub fn new(page_count: usize) -> Self {
        Self {
            current_page: 1,
            page_count: page_count.max(1),
            scale: DEFAULT_SCALE,
            fit_mode: FitMode::None,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    pub fn peek_next(&self) -> usize {
        (self.current_page + 1).min(self.page_count)
    }

    pub fn peek_prev(&self) -> usize {
        self.current_page.saturating_sub(1).max(1)
    }

    /// Makes `page` current once its render has landed.
    pub fn commit(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.page_count);
        self.current_page
    }

    /// Out-of-range targets leave the current page untouched.
    pub fn goto_page(&mut self, page: usize) -> usize {
        if (1..=self.page_count).contains(&page) {
            self.current_page = page;
        } else {
            debug!(page, page_count = self.page_count, "ignoring out-of-range page");
        }
        self.current_page
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.apply_manual_scale(self.scale * ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.apply_manual_scale(self.scale / ZOOM_STEP)
    }

    pub fn reset_zoom(&mut self) -> f32 {
        self.apply_manual_scale(RESET_SCALE)
    }

    pub fn set_scale(&mut self, scale: f32) -> f32 {
        if !scale.is_finite() {
            warn!(scale, "ignoring non-finite scale");
            return self.scale;
        }
        self.apply_manual_scale(scale)
    }

    pub fn fit_to_width(&mut self, doc: &dyn PdfBackend, container_width: f32) -> f32 {
        let (width, _) = match doc.page_dimensions(self.current_page - 1) {
            Ok(dimensions) => dimensions,
            Err(err) => {
                warn!(error = %err, page = self.current_page, "fit to width skipped");
                return self.scale;
            }
        };

        let Some(scale) = fit_scale(container_width, width) else {
            return self.scale;
        };
        self.scale = clamp_scale(scale);
        self.fit_mode = FitMode::FitWidth;
        debug!(scale = self.scale, container_width, "fit to width");
        self.scale
    }

    pub fn fit_to_page(
        &mut self,
        doc: &dyn PdfBackend,
        container_width: f32,
        container_height: f32,
    ) -> f32 {
        let (width, height) = match doc.page_dimensions(self.current_page - 1) {
            Ok(dimensions) => dimensions,
            Err(err) => {
                warn!(error = %err, page = self.current_page, "fit to page skipped");
                return self.scale;
            }
        };

        let (Some(by_width), Some(by_height)) = (
            fit_scale(container_width, width),
            fit_scale(container_height, height),
        ) else {
            return self.scale;
        };
        self.scale = clamp_scale(by_width.min(by_height));
        self.fit_mode = FitMode::FitPage;
        debug!(scale = self.scale, container_width, container_height, "fit to page");
        self.scale
    }

    /// Re-runs the active fit against a new container size.
    pub fn refit(&mut self, doc: &dyn PdfBackend, container_width: f32, container_height: f32) -> f32 {
        match self.fit_mode {
            FitMode::None => self.scale,
            FitMode::FitWidth => self.fit_to_width(doc, container_width),
            FitMode::FitPage => self.fit_to_page(doc, container_width, container_height),
        }
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    fn apply_manual_scale(&mut self, scale: f32) -> f32 {
        self.scale = clamp_scale(scale);
        self.fit_mode = FitMode::None;
        self.scale
    }
}

fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn fit_scale(container: f32, extent: f32) -> Option<f32> {
    if !container.is_finite() || !extent.is_finite() || extent <= 0.0 {
        return None;
    }
    Some((container - FIT_MARGIN_PX) / extent)
}
