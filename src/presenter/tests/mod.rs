use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::backend::RgbaFrame;
use crate::render::PageFrameKey;

use super::ratatui::RatatuiImagePresenter;
use super::traits::{ImagePresenter, PanOffset, PresenterKind};
use super::create_presenter;

fn solid_frame(width: u32, height: u32) -> RgbaFrame {
    RgbaFrame {
        width,
        height,
        pixels: vec![200; width as usize * height as usize * 4].into(),
    }
}

#[test]
fn select_ratatui_presenter() {
    let presenter = create_presenter(PresenterKind::RatatuiImage);
    let caps = presenter.capabilities();
    assert_eq!(caps.backend_name, "ratatui-image");
    assert_eq!(caps.graphics_protocol, "halfblocks");
    assert!(caps.cell_px.0 > 0 && caps.cell_px.1 > 0);
}

#[test]
fn show_page_clamps_pan_to_page_bounds() {
    let mut presenter = RatatuiImagePresenter::new();
    let (cell_w, cell_h) = presenter.capabilities().cell_px;
    // page is exactly one cell wider and taller than the 4x4 viewport
    let frame = solid_frame(u32::from(cell_w) * 5, u32::from(cell_h) * 5);

    let pan = presenter
        .show_page(
            PageFrameKey::new(1, 1, 1.0),
            &frame,
            Rect::new(0, 0, 4, 4),
            PanOffset {
                cells_x: 9,
                cells_y: -2,
            },
        )
        .expect("page should be prepared");
    assert_eq!(
        pan,
        PanOffset {
            cells_x: 1,
            cells_y: 0
        }
    );
    assert!(presenter.has_page());
}

#[test]
fn draw_page_without_frame_reports_nothing_drawn() {
    let mut presenter = RatatuiImagePresenter::new();
    let mut terminal = Terminal::new(TestBackend::new(20, 10)).expect("test terminal");
    let mut drawn = None;
    terminal
        .draw(|frame| {
            drawn = Some(presenter.draw_page(frame, Rect::new(0, 0, 20, 10)));
        })
        .expect("draw should pass");
    assert!(!drawn.expect("closure ran").expect("draw should succeed"));
}

#[test]
fn draw_page_renders_prepared_frame() {
    let mut presenter = RatatuiImagePresenter::new();
    presenter
        .show_page(
            PageFrameKey::new(1, 1, 1.0),
            &solid_frame(16, 16),
            Rect::new(0, 0, 20, 10),
            PanOffset::default(),
        )
        .expect("page should be prepared");

    let mut terminal = Terminal::new(TestBackend::new(20, 10)).expect("test terminal");
    let mut drawn = None;
    terminal
        .draw(|frame| {
            drawn = Some(presenter.draw_page(frame, Rect::new(0, 0, 20, 10)));
        })
        .expect("draw should pass");
    assert!(drawn.expect("closure ran").expect("draw should succeed"));
}

#[test]
fn thumbnails_are_dropped_when_session_changes() {
    let mut presenter = RatatuiImagePresenter::new();
    let thumb = solid_frame(30, 40);
    let mut terminal = Terminal::new(TestBackend::new(20, 20)).expect("test terminal");

    terminal
        .draw(|frame| {
            for page in 1..=3 {
                let area = Rect::new(0, (page as u16 - 1) * 5, 10, 4);
                presenter
                    .draw_thumbnail(frame, area, 1, page, &thumb)
                    .expect("thumbnail should draw");
            }
        })
        .expect("draw should pass");
    assert_eq!(presenter.thumbnail_count(), 3);

    terminal
        .draw(|frame| {
            presenter
                .draw_thumbnail(frame, Rect::new(0, 0, 10, 4), 2, 1, &thumb)
                .expect("thumbnail should draw");
        })
        .expect("draw should pass");
    assert_eq!(presenter.thumbnail_count(), 1);

    presenter.reset();
    assert_eq!(presenter.thumbnail_count(), 0);
    assert!(!presenter.has_page());
}
