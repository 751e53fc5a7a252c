use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, Mode};
use crate::session::FitMode;

use super::text::truncate_to_width;

/// What the status bar shows about the open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStatus {
    pub file_name: String,
    pub current_page: usize,
    pub page_count: usize,
    pub zoom_percent: u32,
    pub fit_mode: FitMode,
}

pub fn draw_status_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &AppState,
    document: Option<&DocumentStatus>,
) {
    let line = status_line(app, document, usize::from(area.width));
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::Rgb(30, 30, 35))),
        area,
    );
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => "NORMAL",
        Mode::Prompt(_) => "PROMPT",
        Mode::Details => "DETAILS",
    }
}

pub(crate) fn status_line(
    app: &AppState,
    document: Option<&DocumentStatus>,
    width: usize,
) -> Line<'static> {
    let mode = format!(" {} ", mode_label(app.mode));
    let position = match document {
        Some(doc) => {
            let loading = match app.pending_page {
                Some(page) => format!(" → {page}"),
                None => String::new(),
            };
            format!(
                " page {} / {}{} | {}% ({}) ",
                doc.current_page,
                doc.page_count,
                loading,
                doc.zoom_percent,
                doc.fit_mode.label()
            )
        }
        None => " no document ".to_string(),
    };

    // the file name and message share what the fixed parts leave over
    let spare = width.saturating_sub(mode.width() + position.width());
    let name = document.map(|doc| doc.file_name.as_str()).unwrap_or("");
    let name = truncate_to_width(name, spare.min(spare / 2 + 8));
    let message_room = spare.saturating_sub(name.width() + 3);
    let message = truncate_to_width(&app.status.message, message_room);

    let mut spans = vec![
        Span::styled(mode, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(name, Style::default().fg(Color::White)),
        Span::styled(position, Style::default().fg(Color::Gray)),
    ];
    if !message.is_empty() {
        spans.push(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}
