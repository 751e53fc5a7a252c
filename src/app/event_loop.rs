use std::future;
use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time;

use crate::command::Command;
use crate::error::AppResult;
use crate::render::{RenderOutcome, RenderWorker};

use super::core::App;
use super::event_bus::{EventBusRuntime, LoopEvent};
use super::terminal_session::{TerminalSession, TerminalSurface};

enum WaitEvent {
    Loop(LoopEvent),
    Render(RenderOutcome),
    Wake,
    Closed,
}

impl App {
    /// Runs the viewer until the user quits. Without `initial` the open
    /// prompt is shown first.
    pub async fn run(&mut self, initial: Option<PathBuf>) -> AppResult<()> {
        let mut session = TerminalSession::enter()?;
        self.render.presenter.initialize_terminal()?;
        let size = session.size()?;
        self.area = Rect::new(0, 0, size.width, size.height);

        match initial {
            Some(path) => {
                self.open_document(&path);
            }
            None => {
                self.execute(Command::OpenFilePrompt)?;
            }
        }

        let (mut loop_rx, mut bus) = EventBusRuntime::spawn();
        let result = self.drive(&mut session, &mut loop_rx).await;
        bus.shutdown();
        session.restore()?;
        result
    }

    async fn drive(
        &mut self,
        surface: &mut impl TerminalSurface,
        loop_rx: &mut UnboundedReceiver<LoopEvent>,
    ) -> AppResult<()> {
        let poll_timeout = self.config.render.input_poll_timeout();
        let mut needs_redraw = true;

        loop {
            let now = Instant::now();
            if self.apply_pending_resize(now) {
                // stale image cells survive a plain redraw
                surface.clear()?;
                needs_redraw = true;
            }
            self.pump_thumbnails(now);
            if needs_redraw {
                self.draw(surface)?;
                needs_redraw = false;
            }

            let waited = wait_next_event(
                loop_rx,
                self.render.worker.as_mut(),
                self.render.thumbnails_resume_at,
                self.resize_deadline,
                poll_timeout,
            )
            .await;
            match waited {
                WaitEvent::Loop(LoopEvent::Input(event)) => {
                    let outcome = self.handle_input_event(event, Instant::now())?;
                    if outcome.quit_requested {
                        break;
                    }
                    needs_redraw |= outcome.redraw;
                }
                WaitEvent::Loop(LoopEvent::InputError(message)) => {
                    self.state.status.message = format!("input error: {message}");
                    needs_redraw = true;
                }
                WaitEvent::Render(outcome) => {
                    needs_redraw |= self.handle_render_outcome(outcome);
                }
                WaitEvent::Wake => {}
                WaitEvent::Closed => break,
            }
        }
        Ok(())
    }
}

async fn wait_next_event(
    loop_rx: &mut UnboundedReceiver<LoopEvent>,
    worker: Option<&mut RenderWorker>,
    thumbnails_resume_at: Option<Instant>,
    resize_deadline: Option<Instant>,
    poll_timeout: std::time::Duration,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_rx.recv() => match maybe_loop {
            Some(event) => WaitEvent::Loop(event),
            None => WaitEvent::Closed,
        },
        outcome = next_outcome(worker) => WaitEvent::Render(outcome),
        _ = sleep_until(resize_deadline) => WaitEvent::Wake,
        _ = sleep_until(thumbnails_resume_at) => WaitEvent::Wake,
        _ = time::sleep(poll_timeout) => WaitEvent::Wake,
    }
}

async fn next_outcome(worker: Option<&mut RenderWorker>) -> RenderOutcome {
    if let Some(worker) = worker
        && let Some(outcome) = worker.recv().await
    {
        return outcome;
    }
    future::pending().await
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline.into()).await,
        None => future::pending().await,
    }
}
