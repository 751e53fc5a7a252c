use ratatui::layout::{Rect, Size};
use ratatui::widgets::Paragraph;

use super::super::terminal_session::TerminalSurface;
use super::TestTerminalSurface;

#[test]
fn terminal_surface_supports_size_clear_and_draw() {
    let mut session = TestTerminalSurface::new(80, 24).expect("test terminal should initialize");
    let size = session.size().expect("size should resolve");
    assert_eq!(size, Size::new(80, 24));

    session.clear().expect("clear should succeed");
    session
        .draw(|frame| {
            frame.render_widget(Paragraph::new("ok"), Rect::new(0, 0, 2, 1));
        })
        .expect("draw should succeed");
}

#[test]
fn empty_viewer_shows_open_hint() {
    let mut app = super::test_app(crate::config::Config::default());
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal");
    app.draw(&mut surface).expect("draw");
    let text = surface.text();
    assert!(text.contains("press o to open a PDF"));
    assert!(text.contains("no document"));
}

#[test]
fn status_bar_shows_page_after_open() {
    let path = super::write_pdf(&["one", "two", "three"]);
    let mut app = super::test_app(crate::config::Config::default());
    app.open_document(&path);
    super::settle_page(&mut app);

    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal");
    app.draw(&mut surface).expect("draw");
    assert!(surface.text().contains("page 1 / 3"));
    let _ = std::fs::remove_file(path);
}
