use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::error::AppResult;
use crate::presenter::ImagePresenter;
use crate::session::{DocumentSession, ThumbnailLookup};

/// Rows per sidebar entry, border included.
const SLOT_HEIGHT: u16 = 10;

/// Which pages the sidebar shows and where. The window follows the current
/// page so it is always visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailStrip {
    area: Rect,
    first_page: usize,
    page_count: usize,
}

impl ThumbnailStrip {
    pub fn new(area: Rect, current_page: usize, page_count: usize) -> Self {
        let slots = usize::from((area.height / SLOT_HEIGHT).max(1));
        let last_first = page_count.saturating_sub(slots).saturating_add(1).max(1);
        let first_page = current_page
            .saturating_sub(slots / 2)
            .clamp(1, last_first);
        Self {
            area,
            first_page,
            page_count,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn slot_height(&self) -> u16 {
        SLOT_HEIGHT
    }

    pub fn first_page(&self) -> usize {
        self.first_page
    }

    /// Visible pages with their slot rectangles.
    pub fn slots(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        let rows = self.area.height / SLOT_HEIGHT;
        (0..rows)
            .map(move |index| {
                let page = self.first_page + usize::from(index);
                let slot = Rect::new(
                    self.area.x,
                    self.area.y + index * SLOT_HEIGHT,
                    self.area.width,
                    SLOT_HEIGHT,
                );
                (page, slot)
            })
            .take_while(|(page, _)| *page <= self.page_count)
    }

    pub fn page_at(&self, column: u16, row: u16) -> Option<usize> {
        self.slots()
            .find(|(_, slot)| {
                column >= slot.x
                    && column < slot.x + slot.width
                    && row >= slot.y
                    && row < slot.y + slot.height
            })
            .map(|(page, _)| page)
    }
}

/// Draws the sidebar. Pages without a thumbnail yet are requested from the
/// cache, which moves them to the front of the background queue.
pub fn draw_thumbnail_sidebar(
    frame: &mut Frame<'_>,
    strip: &ThumbnailStrip,
    session: &mut DocumentSession,
    presenter: &mut dyn ImagePresenter,
) -> AppResult<()> {
    let current = session.view.current_page();
    let session_id = session.session_id();

    for (page, slot) in strip.slots() {
        let active = page == current;
        let border = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title_bottom(format!(" {page} "))
            .title_alignment(Alignment::Center);
        let inner = block.inner(slot);
        frame.render_widget(block, slot);
        if inner.width == 0 || inner.height == 0 {
            continue;
        }

        match session.thumbnails.get(page) {
            ThumbnailLookup::Ready(thumbnail) => {
                presenter.draw_thumbnail(frame, inner, session_id, page, &thumbnail)?;
            }
            ThumbnailLookup::Pending => {
                let placeholder = Paragraph::new("…")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                frame.render_widget(placeholder, inner);
            }
        }
    }
    Ok(())
}
