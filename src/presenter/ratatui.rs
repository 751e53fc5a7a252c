use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{FilterType, Resize, StatefulImage};
use tracing::debug;

use crate::backend::RgbaFrame;
use crate::error::{AppError, AppResult};
use crate::render::PageFrameKey;
use crate::session::SessionId;

use super::image_ops::{clamp_pan, crop_frame, downscale_frame_for_area, frame_to_image};
use super::terminal_cell::{center_rect_within, detect_picker, protocol_label, px_to_cells};
use super::traits::{ImagePresenter, PanOffset, PresenterCaps};

const ENCODE_FAILURE_MESSAGE: &str = "failed to encode terminal image";
const RESIZE_FILTER: FilterType = FilterType::Nearest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageSlot {
    key: PageFrameKey,
    area: Rect,
    pan: PanOffset,
}

struct PreparedPage {
    slot: PageSlot,
    /// Cell footprint of the cropped frame.
    cells: (u16, u16),
    protocol: StatefulProtocol,
}

struct PreparedThumbnail {
    area: Rect,
    protocol: StatefulProtocol,
}

/// Terminal image output through ratatui-image. Keeps one prepared protocol
/// for the page and one per drawn thumbnail.
pub struct RatatuiImagePresenter {
    picker: Picker,
    protocol_label: &'static str,
    terminal_initialized: bool,
    page: Option<PreparedPage>,
    thumbnails_session: Option<SessionId>,
    thumbnails: HashMap<usize, PreparedThumbnail>,
}

impl Default for RatatuiImagePresenter {
    fn default() -> Self {
        Self::with_picker(Picker::halfblocks())
    }
}

impl RatatuiImagePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_picker(picker: Picker) -> Self {
        Self {
            protocol_label: protocol_label(picker.protocol_type()),
            picker,
            terminal_initialized: false,
            page: None,
            thumbnails_session: None,
            thumbnails: HashMap::new(),
        }
    }

    pub fn thumbnail_count(&self) -> usize {
        self.thumbnails.len()
    }

    fn cell_px(&self) -> (u16, u16) {
        self.picker.font_size()
    }

    fn draw_protocol(
        frame: &mut Frame<'_>,
        area: Rect,
        protocol: &mut StatefulProtocol,
    ) -> AppResult<()> {
        frame.render_stateful_widget(
            StatefulImage::<StatefulProtocol>::default().resize(Resize::Fit(Some(RESIZE_FILTER))),
            area,
            protocol,
        );
        if let Some(result) = protocol.last_encoding_result() {
            result.map_err(|_| AppError::unsupported(ENCODE_FAILURE_MESSAGE))?;
        }
        Ok(())
    }
}

impl ImagePresenter for RatatuiImagePresenter {
    fn initialize_terminal(&mut self) -> AppResult<()> {
        if self.terminal_initialized {
            return Ok(());
        }
        self.picker = detect_picker();
        self.protocol_label = protocol_label(self.picker.protocol_type());
        self.reset();
        self.terminal_initialized = true;
        debug!(
            protocol = self.protocol_label,
            cell_px = ?self.picker.font_size(),
            "terminal graphics ready"
        );
        Ok(())
    }

    fn show_page(
        &mut self,
        key: PageFrameKey,
        frame: &RgbaFrame,
        area: Rect,
        pan: PanOffset,
    ) -> AppResult<PanOffset> {
        let cell_px = self.cell_px();
        let pan = clamp_pan(frame.width, frame.height, area, cell_px, pan);
        let slot = PageSlot { key, area, pan };
        if self.page.as_ref().is_some_and(|page| page.slot == slot) {
            return Ok(pan);
        }

        let visible = crop_frame(frame, area, cell_px, pan);
        let cells = (
            px_to_cells(visible.width, cell_px.0, area.width),
            px_to_cells(visible.height, cell_px.1, area.height),
        );
        let protocol = self.picker.new_resize_protocol(frame_to_image(&visible)?);
        self.page = Some(PreparedPage {
            slot,
            cells,
            protocol,
        });
        Ok(pan)
    }

    fn has_page(&self) -> bool {
        self.page.is_some()
    }

    fn draw_page(&mut self, frame: &mut Frame<'_>, area: Rect) -> AppResult<bool> {
        if area.width == 0 || area.height == 0 {
            return Ok(false);
        }
        let Some(page) = self.page.as_mut() else {
            return Ok(false);
        };

        frame.render_widget(Clear, area);
        let target = center_rect_within(area, page.cells.0, page.cells.1);
        Self::draw_protocol(frame, target, &mut page.protocol)?;
        Ok(true)
    }

    fn draw_thumbnail(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        session_id: SessionId,
        page: usize,
        thumbnail: &RgbaFrame,
    ) -> AppResult<bool> {
        if area.width == 0 || area.height == 0 {
            return Ok(false);
        }
        if self.thumbnails_session != Some(session_id) {
            self.thumbnails.clear();
            self.thumbnails_session = Some(session_id);
        }

        let stale = self
            .thumbnails
            .get(&page)
            .is_none_or(|prepared| prepared.area.width != area.width || prepared.area.height != area.height);
        if stale {
            let small = downscale_frame_for_area(thumbnail, area, self.cell_px())?;
            let protocol = self.picker.new_resize_protocol(frame_to_image(&small)?);
            self.thumbnails
                .insert(page, PreparedThumbnail { area, protocol });
        }

        let Some(prepared) = self.thumbnails.get_mut(&page) else {
            return Ok(false);
        };
        prepared.area = area;
        Self::draw_protocol(frame, area, &mut prepared.protocol)?;
        Ok(true)
    }

    fn reset(&mut self) {
        self.page = None;
        self.thumbnails.clear();
        self.thumbnails_session = None;
    }

    fn capabilities(&self) -> PresenterCaps {
        PresenterCaps {
            backend_name: "ratatui-image",
            cell_px: self.cell_px(),
            graphics_protocol: self.protocol_label,
        }
    }
}
