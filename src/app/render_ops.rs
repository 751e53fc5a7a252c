use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::backend::RgbaFrame;
use crate::command::ActionId;
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::presenter::cells_to_px;
use crate::render::{PageFrameKey, RenderJob, RenderOutcome, RenderWorker};
use crate::session::ThumbnailQueue;
use crate::ui::split_layout;

use super::core::{App, PendingRender};
use super::state::Mode;

impl App {
    /// Replaces the current document with the one at `path`. On failure the
    /// previous document, if any, stays open.
    pub fn open_document(&mut self, path: &Path) -> bool {
        let eager = self.config.thumbnails.eager_pages;
        let opened = self.host.open(path).map(|session| {
            let failed_thumbnails = session.prime_thumbnails(eager);
            (
                session.session_id(),
                session.page_count(),
                session.file_path().to_path_buf(),
                session.shared_bytes(),
                session.file_name().to_string(),
                failed_thumbnails,
            )
        });
        let (session_id, pages, file_path, bytes, name, failed_thumbnails) = match opened {
            Ok(opened) => opened,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "open failed");
                self.state.load_error = Some(err.to_string());
                self.state.status.last_action_id = Some(ActionId::OpenFile);
                self.state.status.message = format!("open failed: {err}");
                return false;
            }
        };

        self.render.cache.retain_session(session_id);
        self.render.presenter.reset();
        self.render.current_frame = None;
        self.render.pending = None;
        // the old pool holds the previous document's bytes
        self.render.worker = None;
        self.render.worker = match RenderWorker::spawn(
            session_id,
            file_path,
            bytes,
            self.config.render.worker_threads,
        ) {
            Ok(worker) => Some(worker),
            Err(err) => {
                warn!(error = %err, "render workers unavailable");
                None
            }
        };
        let mut queue = ThumbnailQueue::new(
            pages,
            self.config.thumbnails.yield_every,
            self.config.thumbnails.yield_pause(),
        );
        for page in failed_thumbnails {
            queue.on_failed(page);
        }
        self.render.thumbnail_queue = Some(queue);
        self.render.thumbnails_resume_at =
            Some(Instant::now() + self.config.thumbnails.start_delay());

        self.state.pending_page = None;
        self.state.load_error = None;
        self.state.reset_scroll();
        self.state.mode = Mode::Normal;
        self.prompt = None;
        self.state.status.last_action_id = Some(ActionId::OpenFile);
        self.state.status.message = format!("opened {name} ({pages} pages)");
        AppEvent::DocumentOpened { session_id, pages }.trace();

        self.show_page(1);
        true
    }

    /// Shows `page` at the current scale. A cached frame is committed at once;
    /// otherwise a render is requested and the page commits when it lands.
    pub fn show_page(&mut self, page: usize) {
        let Some(session) = self.host.session() else {
            return;
        };
        let scale = session.view.scale();
        let key = PageFrameKey::new(session.session_id(), page, scale);
        if let Some(frame) = self.render.cache.get(&key) {
            self.commit_frame(key, frame);
            return;
        }

        let Some(worker) = self.render.worker.as_mut() else {
            self.state.status.last_action_id = Some(ActionId::RenderPage);
            self.state.status.message = "renderer unavailable".to_string();
            return;
        };
        let ticket = self.render.tickets.issue();
        if !worker.submit(RenderJob::Page { page, scale }, ticket) {
            debug!(page, scale, "page render already in flight");
        }
        self.render.pending = Some(PendingRender {
            ticket,
            page,
            scale,
        });
        self.state.pending_page = Some(page);
    }

    fn commit_frame(&mut self, key: PageFrameKey, frame: RgbaFrame) {
        let shown = self.render.current_frame.as_ref().map(|(shown, _)| shown.page);
        if let Some(session) = self.host.session_mut() {
            let from = session.view.current_page();
            let to = session.view.commit(key.page);
            if from != to {
                AppEvent::PageChanged { from, to }.trace();
            }
        }
        if shown != Some(key.page) {
            self.state.reset_scroll();
        }
        self.render.current_frame = Some((key, frame));
        self.render.pending = None;
        self.state.pending_page = None;
    }

    /// Applies a finished render. Returns whether the screen needs a redraw.
    pub fn handle_render_outcome(&mut self, outcome: RenderOutcome) -> bool {
        if !self.host.is_current(outcome.session_id) {
            debug!(session_id = outcome.session_id, "dropping render for closed document");
            return false;
        }
        match outcome.job {
            RenderJob::Thumbnail { page } => self.on_thumbnail_rendered(page, outcome.result),
            RenderJob::Page { page, scale } => {
                debug!(
                    page,
                    scale,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "page render finished"
                );
                self.on_page_rendered(outcome.ticket, page, scale, outcome.result)
            }
        }
    }

    fn on_page_rendered(
        &mut self,
        ticket: u64,
        page: usize,
        scale: f32,
        result: AppResult<RgbaFrame>,
    ) -> bool {
        let Some(session_id) = self.host.current_id() else {
            return false;
        };
        let key = PageFrameKey::new(session_id, page, scale);
        // a deduplicated submit leaves the older ticket on the job
        let wanted = self.render.pending.is_some_and(|pending| {
            (pending.ticket == ticket && self.render.tickets.is_current(ticket))
                || PageFrameKey::new(session_id, pending.page, pending.scale) == key
        });

        match result {
            Ok(frame) => {
                self.render.cache.insert(key, frame.clone());
                if !wanted {
                    debug!(page, ticket, "cached superseded page render");
                    return false;
                }
                self.commit_frame(key, frame);
                true
            }
            Err(err) => {
                if !wanted {
                    debug!(page, error = %err, "superseded page render failed");
                    return false;
                }
                warn!(page, error = %err, "page render failed");
                self.state.status.last_action_id = Some(ActionId::RenderPage);
                self.state.status.message = format!("render failed for page {page}: {err}");
                self.render.pending = None;
                self.state.pending_page = None;
                true
            }
        }
    }

    fn on_thumbnail_rendered(&mut self, page: usize, result: AppResult<RgbaFrame>) -> bool {
        let (Some(session), Some(queue)) =
            (self.host.session_mut(), self.render.thumbnail_queue.as_mut())
        else {
            return false;
        };

        let pause = match result {
            Ok(frame) => {
                session.thumbnails.insert(page, frame);
                queue.on_completed(page)
            }
            Err(err) => {
                warn!(page, error = %err, "thumbnail generation failed");
                queue.on_failed(page);
                Duration::ZERO
            }
        };

        if queue.is_finished(&session.thumbnails) {
            info!(count = session.thumbnails.len(), "thumbnails complete");
            self.render.thumbnails_resume_at = None;
        } else {
            self.render.thumbnails_resume_at = Some(Instant::now() + pause);
        }
        self.state.thumbnails_visible
    }

    /// Dispatches the next background thumbnail when its pause has elapsed.
    /// One thumbnail is in flight at a time so page renders keep priority.
    pub fn pump_thumbnails(&mut self, now: Instant) -> bool {
        match self.render.thumbnails_resume_at {
            Some(resume_at) if now >= resume_at => {}
            _ => return false,
        }
        let (Some(session), Some(queue), Some(worker)) = (
            self.host.session_mut(),
            self.render.thumbnail_queue.as_mut(),
            self.render.worker.as_mut(),
        ) else {
            return false;
        };

        let Some(page) = queue.next_job(&mut session.thumbnails) else {
            if queue.is_finished(&session.thumbnails) {
                self.render.thumbnails_resume_at = None;
            }
            return false;
        };
        if !worker.submit(RenderJob::Thumbnail { page }, self.render.tickets.latest()) {
            warn!(page, "thumbnail job rejected");
            queue.on_failed(page);
            return false;
        }
        // resumed by the completion
        self.render.thumbnails_resume_at = None;
        true
    }

    /// Size of the page view in pixels.
    pub fn viewer_px(&self) -> (f32, f32) {
        let layout = split_layout(self.area, self.state.thumbnails_visible);
        let cell_px = self.render.presenter.capabilities().cell_px;
        let (width, height) = cells_to_px(layout.viewer.width, layout.viewer.height, cell_px);
        (width as f32, height as f32)
    }
}
