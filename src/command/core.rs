use crate::app::AppState;
use crate::error::AppResult;
use crate::session::DocumentSession;

use super::types::{ActionId, CommandEffect, CommandOutcome};

pub(crate) struct Applied {
    pub(crate) outcome: CommandOutcome,
    pub(crate) effect: Option<CommandEffect>,
}

impl Applied {
    fn show(page: usize) -> Self {
        Self {
            outcome: CommandOutcome::Applied,
            effect: Some(CommandEffect::ShowPage { page }),
        }
    }

    fn noop() -> Self {
        Self {
            outcome: CommandOutcome::Noop,
            effect: None,
        }
    }
}

/// Next/previous only peek; the page is committed when its render lands.
pub(crate) fn step_page(
    app: &mut AppState,
    session: &DocumentSession,
    forward: bool,
) -> AppResult<Applied> {
    let view = &session.view;
    let (target, id) = if forward {
        (view.peek_next(), ActionId::NextPage)
    } else {
        (view.peek_prev(), ActionId::PrevPage)
    };
    app.status.last_action_id = Some(id);

    if target == view.current_page() {
        app.status.message = if forward {
            format!("already at last page ({}/{})", target, view.page_count())
        } else {
            "already at first page (1)".to_string()
        };
        return Ok(Applied::noop());
    }
    Ok(Applied::show(target))
}

pub(crate) fn jump_page(
    app: &mut AppState,
    session: &mut DocumentSession,
    page: usize,
    id: ActionId,
) -> AppResult<Applied> {
    app.status.last_action_id = Some(id);
    let before = session.view.current_page();
    let after = session.view.goto_page(page);
    if after != page {
        // out of range: silently ignored
        return Ok(Applied::noop());
    }
    if after == before {
        return Ok(Applied::noop());
    }
    Ok(Applied::show(after))
}

pub(crate) fn apply_scale(
    app: &mut AppState,
    session: &mut DocumentSession,
    id: ActionId,
    change: impl FnOnce(&mut DocumentSession) -> f32,
) -> AppResult<Applied> {
    app.status.last_action_id = Some(id);
    let before = session.view.scale();
    let mode_before = session.view.fit_mode();
    let after = change(session);

    app.status.message = format!(
        "zoom {}% ({})",
        session.view.zoom_percent(),
        session.view.fit_mode().label()
    );
    if (after - before).abs() < f32::EPSILON && session.view.fit_mode() == mode_before {
        return Ok(Applied::noop());
    }
    app.reset_scroll();
    Ok(Applied::show(session.view.current_page()))
}

pub(crate) fn scroll(app: &mut AppState, dx: i32, dy: i32) -> AppResult<Applied> {
    app.status.last_action_id = Some(ActionId::Scroll);
    let x = app.scroll_x.saturating_add(dx).max(0);
    let y = app.scroll_y.saturating_add(dy).max(0);
    if x == app.scroll_x && y == app.scroll_y {
        return Ok(Applied::noop());
    }
    app.scroll_x = x;
    app.scroll_y = y;
    Ok(Applied {
        outcome: CommandOutcome::Applied,
        effect: None,
    })
}
