use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::input::PromptView;

use super::layout::centered_rect;
use super::text::{truncate_start_to_width, truncate_to_width};

pub fn draw_loading_overlay(frame: &mut Frame<'_>, area: Rect, page: usize) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup = centered_rect(area, area.width.min(34), area.height.min(3));
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let message = Paragraph::new(format!("Loading page {page}…"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(message, inner);
}

/// Full-viewer notice: the welcome hint or a failed load.
pub fn draw_notice(frame: &mut Frame<'_>, area: Rect, title: &str, body: &str, error: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup = centered_rect(area, area.width.min(64), area.height.min(7));
    let color = if error { Color::Red } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    frame.render_widget(
        Paragraph::new(body.to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

pub fn draw_prompt_overlay(frame: &mut Frame<'_>, area: Rect, view: &PromptView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let list_rows = if view.items.is_empty() && view.hint.is_none() {
        0
    } else {
        20
    };
    let popup_height = (3 + list_rows + u16::from(list_rows > 0)).min(area.height);
    let popup = centered_rect(area, area.width.min(72), popup_height);
    frame.render_widget(Clear, popup);

    let inner_width = usize::from(popup.width.saturating_sub(2));
    let block = Block::default()
        .title(format!(
            " {} ",
            truncate_start_to_width(&view.title, inner_width.saturating_sub(2))
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let input_line = build_input_line(&view.input, view.cursor, usize::from(chunks[0].width));
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if chunks[2].height == 0 {
        return;
    }
    frame.render_widget(
        Paragraph::new("─".repeat(usize::from(inner.width)))
            .style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    let list_area = chunks[2];
    let mut lines = Vec::new();
    if let Some(hint) = &view.hint {
        lines.push(Line::from(Span::styled(
            format!("   {}", truncate_to_width(hint, inner_width.saturating_sub(3))),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let max_items = usize::from(list_area.height).saturating_sub(lines.len());
    if max_items > 0 && !view.items.is_empty() {
        let selected = view.selected_idx.min(view.items.len() - 1);
        // keep the selection inside the window
        let start = selected.saturating_sub(max_items.saturating_sub(1));
        for item in view.items.iter().skip(start).take(max_items) {
            lines.push(item_line(item, inner_width));
        }
    }
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn item_line(item: &crate::input::PromptItemView, width: usize) -> Line<'static> {
    let marker = if item.selected { " ┃ " } else { "   " };
    let label = truncate_to_width(&item.label, width.saturating_sub(3));
    let mut used = 3 + label.width();
    let mut spans = vec![Span::raw(marker), Span::raw(label)];

    if let Some(detail) = &item.detail {
        let room = width.saturating_sub(used + 2);
        if room > 0 {
            let detail = truncate_to_width(detail, room);
            used += 2 + detail.width();
            spans.push(Span::raw("  "));
            spans.push(Span::styled(detail, Style::default().fg(Color::DarkGray)));
        }
    }
    spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));

    let style = if item.selected {
        Style::default().bg(Color::Rgb(45, 45, 50))
    } else {
        Style::default()
    };
    Line::from(spans).style(style)
}

/// Input text with a software caret; `cursor` is a char index.
fn build_input_line(input: &str, cursor: usize, width: usize) -> Line<'static> {
    let mut spans = vec![Span::raw(" "), Span::styled("> ", Style::default().fg(Color::White))];
    let text_width = width.saturating_sub(3).max(1);

    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let start = cursor.saturating_sub(text_width - 1);
    let end = (start + text_width).min(chars.len());

    let mut visible: Vec<char> = chars[start..end].to_vec();
    if visible.len() < text_width {
        visible.extend(std::iter::repeat_n(' ', text_width - visible.len()));
    }
    let caret = cursor - start;
    for (index, ch) in visible.into_iter().enumerate() {
        if index == caret {
            spans.push(Span::styled(ch.to_string(), Style::default().reversed()));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    Line::from(spans)
}

/// Modal listing label/value rows; closed by the keymap on Esc, Enter, or q.
pub fn draw_details_modal(frame: &mut Frame<'_>, area: Rect, rows: &[(&'static str, String)]) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let height = u16::try_from(rows.len() + 3).unwrap_or(u16::MAX);
    let popup = centered_rect(area, area.width.min(76), height.min(area.height));
    let block = Block::default()
        .title(" Document details ")
        .title_bottom(" Esc / Enter / q to close ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let label_width = rows
        .iter()
        .map(|(label, _)| label.width())
        .max()
        .unwrap_or(0)
        + 2;
    let value_width = usize::from(inner.width).saturating_sub(label_width + 1);
    let lines: Vec<Line<'static>> = rows
        .iter()
        .map(|(label, value)| {
            let padded = format!(" {label:<width$}", width = label_width - 1);
            Line::from(vec![
                Span::styled(padded, Style::default().fg(Color::Gray)),
                Span::raw(truncate_to_width(value, value_width)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
