mod document_flow;
mod terminal_surface;

use std::convert::Infallible;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::{Rect, Size};

use crate::app::App;
use crate::config::Config;
use crate::test_support::{build_pdf, unique_temp_path};

use super::terminal_session::TerminalSurface;

pub(super) struct TestTerminalSurface {
    terminal: Terminal<TestBackend>,
}

impl TestTerminalSurface {
    pub(super) fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = infallible_to_io(Terminal::new(TestBackend::new(width, height)))?;
        Ok(Self { terminal })
    }

    pub(super) fn text(&self) -> String {
        self.terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}

impl TerminalSurface for TestTerminalSurface {
    fn size(&self) -> io::Result<Size> {
        infallible_to_io(self.terminal.size())
    }

    fn clear(&mut self) -> io::Result<()> {
        infallible_to_io(self.terminal.clear())
    }

    fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        infallible_to_io(self.terminal.draw(render)).map(|_| ())
    }
}

fn infallible_to_io<T>(result: Result<T, Infallible>) -> io::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => match err {},
    }
}

pub(super) fn write_pdf(pages: &[&str]) -> PathBuf {
    let path = unique_temp_path("app.pdf");
    std::fs::write(&path, build_pdf(pages)).expect("write test pdf");
    path
}

pub(super) fn test_app(config: Config) -> App {
    let mut app = App::new(config);
    app.area = Rect::new(0, 0, 100, 40);
    app
}

/// Feeds worker results back until no page render is pending.
pub(super) fn settle_page(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while app.state.pending_page.is_some() {
        assert!(Instant::now() < deadline, "page render timed out");
        let outcome = app.render.worker.as_mut().and_then(|worker| worker.try_recv());
        match outcome {
            Some(outcome) => {
                app.handle_render_outcome(outcome);
            }
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
}

/// Drives background thumbnail population to completion.
pub(super) fn settle_thumbnails(app: &mut App) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        assert!(Instant::now() < deadline, "thumbnails timed out");
        // pauses are skipped by pretending time has passed
        app.pump_thumbnails(Instant::now() + Duration::from_secs(60));
        if app.render.thumbnails_resume_at.is_none()
            && app
                .render
                .worker
                .as_ref()
                .is_some_and(|worker| worker.in_flight_len() == 0)
        {
            return;
        }
        match app.render.worker.as_mut().and_then(|worker| worker.try_recv()) {
            Some(outcome) => {
                app.handle_render_outcome(outcome);
            }
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
}
