use std::time::Instant;

use ratatui::layout::Rect;

use crate::command::ActionId;
use crate::error::AppResult;
use crate::input::Prompt;
use crate::presenter::PanOffset;
use crate::ui::{
    DocumentStatus, ThumbnailStrip, draw_details_modal, draw_loading_overlay, draw_notice,
    draw_prompt_overlay, draw_status_bar, draw_thumbnail_sidebar, split_layout,
};

use super::core::App;
use super::state::Mode;
use super::terminal_session::TerminalSurface;

impl App {
    pub(crate) fn on_resize(&mut self, width: u16, height: u16, now: Instant) {
        self.area = Rect::new(0, 0, width, height);
        self.resize_deadline = Some(now + self.config.view.resize_debounce());
    }

    /// Re-fits the page once resizing has settled. Returns whether anything
    /// needs redrawing.
    pub(crate) fn apply_pending_resize(&mut self, now: Instant) -> bool {
        match self.resize_deadline {
            Some(deadline) if now >= deadline => self.resize_deadline = None,
            _ => return false,
        }

        let (width, height) = self.viewer_px();
        let Some(session) = self.host.session_mut() else {
            return true;
        };
        let before = session.view.scale();
        let after = session.refit(width, height);
        if (after - before).abs() <= f32::EPSILON {
            return true;
        }

        let page = session.view.current_page();
        self.state.status.last_action_id = Some(ActionId::Resize);
        self.state.status.message = format!(
            "refit to {}% ({})",
            session.view.zoom_percent(),
            session.view.fit_mode().label()
        );
        self.state.reset_scroll();
        self.show_page(page);
        true
    }

    pub(crate) fn sidebar_strip(&self) -> Option<ThumbnailStrip> {
        let session = self.host.session()?;
        split_layout(self.area, self.state.thumbnails_visible)
            .sidebar
            .map(|area| ThumbnailStrip::new(area, session.view.current_page(), session.page_count()))
    }

    fn document_status(&self) -> Option<DocumentStatus> {
        self.host.session().map(|session| DocumentStatus {
            file_name: session.file_name().to_string(),
            current_page: session.view.current_page(),
            page_count: session.page_count(),
            zoom_percent: session.view.zoom_percent(),
            fit_mode: session.view.fit_mode(),
        })
    }

    /// Hands the current frame to the presenter and keeps the scroll offset
    /// in step with the pan it could actually apply.
    fn present_current(&mut self, viewer: Rect) -> AppResult<()> {
        let Some((key, frame)) = self.render.current_frame.as_ref() else {
            return Ok(());
        };
        let pan = PanOffset {
            cells_x: self.state.scroll_x,
            cells_y: self.state.scroll_y,
        };
        let applied = self.render.presenter.show_page(*key, frame, viewer, pan)?;
        self.state.scroll_x = applied.cells_x;
        self.state.scroll_y = applied.cells_y;
        Ok(())
    }

    pub(crate) fn draw(&mut self, surface: &mut impl TerminalSurface) -> AppResult<()> {
        let size = surface.size()?;
        self.area = Rect::new(0, 0, size.width, size.height);
        let layout = split_layout(self.area, self.state.thumbnails_visible);
        self.present_current(layout.viewer)?;

        let document = self.document_status();
        let strip = self.sidebar_strip();
        let prompt_view = self.prompt.as_ref().map(Prompt::view);
        let details = match (self.state.mode, self.host.session()) {
            (Mode::Details, Some(session)) => Some(session.details().rows()),
            _ => None,
        };

        let state = &self.state;
        let host = &mut self.host;
        let presenter = self.render.presenter.as_mut();
        let mut outcome = Ok(());
        surface.draw(|frame| {
            outcome = (|| -> AppResult<()> {
                let page_drawn = presenter.draw_page(frame, layout.viewer)?;
                if !page_drawn && host.session().is_none() {
                    match &state.load_error {
                        Some(error) => draw_notice(frame, layout.viewer, "Load failed", error, true),
                        None => draw_notice(
                            frame,
                            layout.viewer,
                            "No document",
                            "press o to open a PDF, q to quit",
                            false,
                        ),
                    }
                }
                if let Some(page) = state.pending_page {
                    draw_loading_overlay(frame, layout.viewer, page);
                }
                if let (Some(strip), Some(session)) = (strip.as_ref(), host.session_mut()) {
                    draw_thumbnail_sidebar(frame, strip, session, presenter)?;
                }
                draw_status_bar(frame, layout.status, state, document.as_ref());
                if let Some(rows) = &details {
                    draw_details_modal(frame, layout.viewer, rows);
                }
                if let Some(view) = &prompt_view {
                    draw_prompt_overlay(frame, overlay_area(layout.viewer, layout.sidebar), view);
                }
                Ok(())
            })();
        })?;
        outcome
    }
}

/// Prompts span the page view and the sidebar.
fn overlay_area(viewer: Rect, sidebar: Option<Rect>) -> Rect {
    match sidebar {
        Some(sidebar) => viewer.union(sidebar),
        None => viewer,
    }
}
