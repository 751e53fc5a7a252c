use crossterm::terminal;
use ratatui::layout::Rect;
use ratatui_image::picker::{Capability, Picker, ProtocolType};

/// Queries the terminal for a graphics protocol. Falls back to halfblocks.
pub(crate) fn detect_picker() -> Picker {
    match Picker::from_query_stdio() {
        Ok(picker) => {
            let protocol = picker.protocol_type();
            with_measured_cell_size(picker, protocol)
        }
        Err(err) => {
            tracing::debug!(error = %err, "terminal graphics query failed, using halfblocks");
            Picker::halfblocks()
        }
    }
}

fn with_measured_cell_size(picker: Picker, protocol: ProtocolType) -> Picker {
    let reported = picker.font_size();
    let measured = cell_size_from_window_size()
        .or_else(|| cell_size_from_capabilities(&picker))
        .unwrap_or(reported);
    if measured == reported {
        return picker;
    }

    #[allow(deprecated)]
    let mut rebuilt = Picker::from_fontsize(measured);
    rebuilt.set_protocol_type(protocol);
    rebuilt
}

fn cell_size_from_capabilities(picker: &Picker) -> Option<(u16, u16)> {
    picker.capabilities().iter().find_map(|cap| match cap {
        Capability::CellSize(Some((width, height))) if *width > 0 && *height > 0 => {
            Some((*width, *height))
        }
        _ => None,
    })
}

fn cell_size_from_window_size() -> Option<(u16, u16)> {
    let window = terminal::window_size().ok()?;
    cell_size_from_window_metrics(window.width, window.height, window.columns, window.rows)
}

pub(crate) fn cell_size_from_window_metrics(
    width_px: u16,
    height_px: u16,
    columns: u16,
    rows: u16,
) -> Option<(u16, u16)> {
    if columns == 0 || rows == 0 {
        return None;
    }
    let cell = (width_px / columns, height_px / rows);
    (cell.0 > 0 && cell.1 > 0).then_some(cell)
}

pub(crate) fn protocol_label(protocol: ProtocolType) -> &'static str {
    match protocol {
        ProtocolType::Halfblocks => "halfblocks",
        ProtocolType::Sixel => "sixel",
        ProtocolType::Kitty => "kitty",
        ProtocolType::Iterm2 => "iterm2",
    }
}

pub fn cells_to_px(columns: u16, rows: u16, cell_px: (u16, u16)) -> (u32, u32) {
    (
        u32::from(columns) * u32::from(cell_px.0.max(1)),
        u32::from(rows) * u32::from(cell_px.1.max(1)),
    )
}

/// Cells needed to show `px` pixels, rounded up and capped at `max_cells`.
pub(crate) fn px_to_cells(px: u32, cell_px: u16, max_cells: u16) -> u16 {
    let cells = px.div_ceil(u32::from(cell_px.max(1)));
    cells.clamp(1, u32::from(max_cells.max(1))) as u16
}

pub(crate) fn center_rect_within(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
