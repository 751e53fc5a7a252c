use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Columns given to the thumbnail sidebar when it is shown.
pub const SIDEBAR_WIDTH: u16 = 22;
/// Narrower terminals hide the sidebar regardless of the toggle.
const MIN_VIEWER_WIDTH: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub sidebar: Option<Rect>,
    pub viewer: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect, thumbnails_visible: bool) -> UiLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let body = rows[0];

    if !thumbnails_visible || body.width < SIDEBAR_WIDTH + MIN_VIEWER_WIDTH {
        return UiLayout {
            sidebar: None,
            viewer: body,
            status: rows[1],
        };
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(body);
    UiLayout {
        sidebar: Some(columns[0]),
        viewer: columns[1],
        status: rows[1],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
