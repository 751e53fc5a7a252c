use crate::app::{AppState, Mode, PromptKind};
use crate::error::AppResult;
use crate::event::AppEvent;
use crate::session::SessionHost;

use super::core::{Applied, apply_scale, jump_page, scroll, step_page};
use super::types::{ActionId, Command, CommandEffect, CommandOutcome};

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub effects: Vec<CommandEffect>,
    pub emitted_events: Vec<AppEvent>,
}

/// Applies `cmd` to the view. `viewport_px` is the page area in pixels, used
/// by the fit commands.
pub fn dispatch(
    app: &mut AppState,
    host: &mut SessionHost,
    viewport_px: (f32, f32),
    cmd: Command,
) -> AppResult<CommandDispatchResult> {
    let prev_mode = app.mode;
    let prev_page = host.session().map(|session| session.view.current_page());
    let action_id = cmd.action_id();

    let applied = match (cmd, host.session_mut()) {
        (Command::Quit, _) => {
            app.status.last_action_id = Some(ActionId::Quit);
            app.status.message = "quit requested".to_string();
            Applied {
                outcome: CommandOutcome::QuitRequested,
                effect: None,
            }
        }
        (Command::Cancel, _) => {
            app.status.last_action_id = Some(ActionId::Cancel);
            app.mode = Mode::Normal;
            mode_only(app.mode != prev_mode)
        }
        (Command::OpenFile { path }, _) => {
            app.status.last_action_id = Some(ActionId::OpenFile);
            app.mode = Mode::Normal;
            Applied {
                outcome: CommandOutcome::Applied,
                effect: Some(CommandEffect::OpenDocument { path }),
            }
        }
        (Command::OpenFilePrompt, _) => enter_mode(app, Mode::Prompt(PromptKind::OpenFile), action_id),
        (Command::CommandPrompt, _) => enter_mode(app, Mode::Prompt(PromptKind::Command), action_id),
        (cmd, None) => {
            app.status.last_action_id = Some(cmd.action_id());
            app.status.message = "no document open".to_string();
            mode_only(false)
        }
        (Command::NextPage, Some(session)) => step_page(app, session, true)?,
        (Command::PrevPage, Some(session)) => step_page(app, session, false)?,
        (Command::FirstPage, Some(session)) => jump_page(app, session, 1, ActionId::FirstPage)?,
        (Command::LastPage, Some(session)) => {
            let last = session.page_count();
            jump_page(app, session, last, ActionId::LastPage)?
        }
        (Command::GotoPage { page }, Some(session)) => {
            app.mode = Mode::Normal;
            jump_page(app, session, page, ActionId::GotoPage)?
        }
        (Command::ZoomIn, Some(session)) => {
            apply_scale(app, session, ActionId::ZoomIn, |s| s.view.zoom_in())?
        }
        (Command::ZoomOut, Some(session)) => {
            apply_scale(app, session, ActionId::ZoomOut, |s| s.view.zoom_out())?
        }
        (Command::ResetZoom, Some(session)) => {
            apply_scale(app, session, ActionId::ResetZoom, |s| s.view.reset_zoom())?
        }
        (Command::SetScale { value }, Some(session)) => {
            apply_scale(app, session, ActionId::SetScale, |s| s.view.set_scale(value))?
        }
        (Command::FitWidth, Some(session)) => apply_scale(app, session, ActionId::FitWidth, |s| {
            s.fit_to_width(viewport_px.0)
        })?,
        (Command::FitPage, Some(session)) => apply_scale(app, session, ActionId::FitPage, |s| {
            s.fit_to_page(viewport_px.0, viewport_px.1)
        })?,
        (Command::Scroll { dx, dy }, Some(_)) => scroll(app, dx, dy)?,
        (Command::ToggleThumbnails, Some(_)) => {
            app.status.last_action_id = Some(ActionId::ToggleThumbnails);
            app.thumbnails_visible = !app.thumbnails_visible;
            app.status.message = if app.thumbnails_visible {
                "thumbnails shown".to_string()
            } else {
                "thumbnails hidden".to_string()
            };
            mode_only(true)
        }
        (Command::ShowDetails, Some(_)) => enter_mode(app, Mode::Details, action_id),
        (Command::GotoPrompt, Some(_)) => enter_mode(app, Mode::Prompt(PromptKind::GotoPage), action_id),
    };

    let mut emitted_events = Vec::new();
    let current_page = host.session().map(|session| session.view.current_page());
    if let (Some(from), Some(to)) = (prev_page, current_page)
        && from != to
    {
        emitted_events.push(AppEvent::PageChanged { from, to });
    }
    if app.mode != prev_mode {
        emitted_events.push(AppEvent::ModeChanged {
            from: prev_mode,
            to: app.mode,
        });
    }
    emitted_events.push(AppEvent::CommandExecuted {
        id: action_id,
        outcome: applied.outcome,
    });

    Ok(CommandDispatchResult {
        outcome: applied.outcome,
        effects: applied.effect.into_iter().collect(),
        emitted_events,
    })
}

fn enter_mode(app: &mut AppState, mode: Mode, id: ActionId) -> Applied {
    app.status.last_action_id = Some(id);
    let changed = app.mode != mode;
    app.mode = mode;
    mode_only(changed)
}

fn mode_only(changed: bool) -> Applied {
    Applied {
        outcome: if changed {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Noop
        },
        effect: None,
    }
}
