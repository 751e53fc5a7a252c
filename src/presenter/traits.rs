use ratatui::Frame;
use ratatui::layout::Rect;

use crate::backend::RgbaFrame;
use crate::error::AppResult;
use crate::render::PageFrameKey;
use crate::session::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    RatatuiImage,
}

/// Pan of the page view, in terminal cells from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PanOffset {
    pub cells_x: i32,
    pub cells_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterCaps {
    pub backend_name: &'static str,
    /// Size of one terminal cell in pixels.
    pub cell_px: (u16, u16),
    pub graphics_protocol: &'static str,
}

pub trait ImagePresenter {
    fn initialize_terminal(&mut self) -> AppResult<()> {
        Ok(())
    }

    fn status_label(&self) -> String {
        let caps = self.capabilities();
        format!("{}/{}", caps.backend_name, caps.graphics_protocol)
    }

    /// Installs `frame` as the visible page. Returns the pan actually applied,
    /// clamped so the view never runs past the page edge.
    fn show_page(
        &mut self,
        key: PageFrameKey,
        frame: &RgbaFrame,
        area: Rect,
        pan: PanOffset,
    ) -> AppResult<PanOffset>;

    fn has_page(&self) -> bool;

    fn draw_page(&mut self, frame: &mut Frame<'_>, area: Rect) -> AppResult<bool>;

    fn draw_thumbnail(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        session_id: SessionId,
        page: usize,
        thumbnail: &RgbaFrame,
    ) -> AppResult<bool>;

    /// Drops every prepared image, e.g. when another document is opened.
    fn reset(&mut self);

    fn capabilities(&self) -> PresenterCaps;
}
