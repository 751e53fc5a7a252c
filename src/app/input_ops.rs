use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind};

use crate::command::{Command, CommandEffect, CommandOutcome, dispatch};
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::input::{Prompt, PromptKeyResult};

use super::core::App;
use super::state::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct InputOutcome {
    pub redraw: bool,
    pub quit_requested: bool,
}

impl InputOutcome {
    fn redraw() -> Self {
        Self {
            redraw: true,
            quit_requested: false,
        }
    }
}

impl App {
    pub(crate) fn handle_input_event(&mut self, event: Event, now: Instant) -> AppResult<InputOutcome> {
        match event {
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.handle_key(key)
            }
            Event::Mouse(mouse) => {
                let strip = self.sidebar_strip();
                match self.keymap.map_mouse(mouse, self.state.mode, strip.as_ref()) {
                    Some(command) => self.execute(command),
                    None => Ok(InputOutcome::default()),
                }
            }
            Event::Resize(width, height) => {
                self.on_resize(width, height, now);
                Ok(InputOutcome::redraw())
            }
            _ => Ok(InputOutcome::default()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> AppResult<InputOutcome> {
        if let Some(prompt) = self.prompt.as_mut() {
            return match prompt.handle_key(key) {
                PromptKeyResult::Consumed => Ok(InputOutcome::redraw()),
                PromptKeyResult::Cancelled => self.execute(Command::Cancel),
                PromptKeyResult::Submitted(command) => {
                    self.close_prompt();
                    self.execute(command)
                }
                PromptKeyResult::Rejected(message) => {
                    self.state.status.message = message;
                    Ok(InputOutcome::redraw())
                }
            };
        }

        match self.keymap.map_key(key, self.state.mode) {
            Some(command) => self.execute(command),
            None => Ok(InputOutcome::default()),
        }
    }

    /// Runs `command` against the view and carries out its effects.
    pub(crate) fn execute(&mut self, command: Command) -> AppResult<InputOutcome> {
        let resizes_viewer = matches!(command, Command::ToggleThumbnails);
        let viewer_px = self.viewer_px();
        let result = dispatch(&mut self.state, &mut self.host, viewer_px, command)?;
        for event in &result.emitted_events {
            event.trace();
        }
        for effect in result.effects {
            match effect {
                CommandEffect::ShowPage { page } => self.show_page(page),
                CommandEffect::OpenDocument { path } => {
                    self.open_document(&path);
                }
            }
        }
        if resizes_viewer {
            // fit modes follow the new viewer width right away
            self.resize_deadline = Some(Instant::now());
        }
        self.sync_prompt();

        Ok(InputOutcome {
            redraw: true,
            quit_requested: result.outcome == CommandOutcome::QuitRequested,
        })
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        if self.state.mode != Mode::Normal {
            AppEvent::ModeChanged {
                from: self.state.mode,
                to: Mode::Normal,
            }
            .trace();
            self.state.mode = Mode::Normal;
        }
    }

    /// Opens or drops the prompt widget so it matches the mode.
    fn sync_prompt(&mut self) {
        let Mode::Prompt(kind) = self.state.mode else {
            self.prompt = None;
            return;
        };
        if self.prompt.as_ref().is_some_and(|prompt| prompt.kind() == kind) {
            return;
        }
        self.prompt = Some(Prompt::open(kind, &self.prompt_dir()));
    }

    /// Directory of the open document, else the working directory.
    fn prompt_dir(&self) -> PathBuf {
        self.host
            .session()
            .and_then(|session| session.file_path().parent())
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
