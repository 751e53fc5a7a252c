use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Mode, PromptKind};
use crate::backend::RgbaFrame;
use crate::command::Command;
use crate::config::Config;
use crate::error::AppError;
use crate::render::{PageFrameKey, RenderJob, RenderOutcome};
use crate::session::FitMode;
use crate::test_support::unique_temp_path;

use super::{settle_page, settle_thumbnails, test_app, write_pdf};

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn current_page(app: &crate::app::App) -> usize {
    app.host
        .session()
        .map(|session| session.view.current_page())
        .expect("document should be open")
}

#[test]
fn opening_a_document_renders_the_first_page() {
    let path = write_pdf(&["one", "two", "three"]);
    let mut app = test_app(Config::default());

    assert!(app.open_document(&path));
    assert_eq!(app.state.pending_page, Some(1));
    assert!(app.state.status.message.contains("3 pages"));

    settle_page(&mut app);
    let (key, _) = app.render.current_frame.as_ref().expect("frame committed");
    assert_eq!(key.page, 1);
    assert_eq!(current_page(&app), 1);
    let _ = std::fs::remove_file(path);
}

#[test]
fn next_page_commits_only_after_its_render_lands() {
    let path = write_pdf(&["one", "two", "three"]);
    let mut app = test_app(Config::default());
    app.open_document(&path);
    settle_page(&mut app);

    app.execute(Command::NextPage).expect("next page");
    assert_eq!(current_page(&app), 1);
    assert_eq!(app.state.pending_page, Some(2));

    settle_page(&mut app);
    assert_eq!(current_page(&app), 2);
    let _ = std::fs::remove_file(path);
}

#[test]
fn newer_page_request_supersedes_an_older_one() {
    let path = write_pdf(&["one", "two", "three", "four", "five"]);
    let mut app = test_app(Config::default());
    app.open_document(&path);
    settle_page(&mut app);

    app.execute(Command::NextPage).expect("next page");
    app.execute(Command::LastPage).expect("last page");
    assert_eq!(app.state.pending_page, Some(5));

    let mut saw_page_two = false;
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let idle = app
            .render
            .worker
            .as_ref()
            .is_some_and(|worker| worker.in_flight_len() == 0);
        if app.state.pending_page.is_none() && idle {
            break;
        }
        assert!(Instant::now() < deadline, "renders timed out");
        let Some(outcome) = app.render.worker.as_mut().and_then(|worker| worker.try_recv())
        else {
            std::thread::sleep(Duration::from_millis(5));
            continue;
        };
        let is_page_two = matches!(outcome.job, RenderJob::Page { page: 2, .. });
        let redraw = app.handle_render_outcome(outcome);
        if is_page_two {
            saw_page_two = true;
            assert!(!redraw, "superseded render must not redraw");
            assert_ne!(current_page(&app), 2);
            let (shown, _) = app.render.current_frame.as_ref().expect("a frame is shown");
            assert_ne!(shown.page, 2);
        }
    }

    assert!(saw_page_two, "page 2 render should still finish");
    assert_eq!(current_page(&app), 5);
    let (shown, _) = app.render.current_frame.as_ref().expect("frame committed");
    assert_eq!(shown.page, 5);

    let session = app.host.session().expect("document should be open");
    let stale = PageFrameKey::new(session.session_id(), 2, session.view.scale());
    assert!(app.render.cache.contains(&stale));
    let _ = std::fs::remove_file(path);
}

#[test]
fn cached_pages_are_shown_without_a_render() {
    let path = write_pdf(&["one", "two"]);
    let mut app = test_app(Config::default());
    app.open_document(&path);
    settle_page(&mut app);
    app.execute(Command::NextPage).expect("next page");
    settle_page(&mut app);

    app.execute(Command::PrevPage).expect("prev page");
    assert_eq!(app.state.pending_page, None);
    assert_eq!(current_page(&app), 1);
    let _ = std::fs::remove_file(path);
}

#[test]
fn goto_prompt_submission_jumps_to_page() {
    let path = write_pdf(&["one", "two", "three"]);
    let mut app = test_app(Config::default());
    app.open_document(&path);
    settle_page(&mut app);

    app.execute(Command::GotoPrompt).expect("open prompt");
    assert_eq!(app.state.mode, Mode::Prompt(PromptKind::GotoPage));
    assert!(app.prompt.is_some());

    let now = Instant::now();
    app.handle_input_event(key(KeyCode::Char('3')), now)
        .expect("type digit");
    app.handle_input_event(key(KeyCode::Enter), now)
        .expect("submit");
    assert_eq!(app.state.mode, Mode::Normal);
    assert!(app.prompt.is_none());

    settle_page(&mut app);
    assert_eq!(current_page(&app), 3);
    let _ = std::fs::remove_file(path);
}

#[test]
fn escape_closes_the_prompt() {
    let mut app = test_app(Config::default());
    app.execute(Command::OpenFilePrompt).expect("open prompt");
    assert!(app.prompt.is_some());

    app.handle_input_event(key(KeyCode::Esc), Instant::now())
        .expect("cancel");
    assert_eq!(app.state.mode, Mode::Normal);
    assert!(app.prompt.is_none());
}

#[test]
fn quit_key_requests_exit() {
    let mut app = test_app(Config::default());
    let outcome = app
        .handle_input_event(key(KeyCode::Char('q')), Instant::now())
        .expect("quit");
    assert!(outcome.quit_requested);
}

#[test]
fn thumbnails_fill_in_the_background() {
    let path = write_pdf(&["one", "two", "three", "four", "five"]);
    let mut config = Config::default();
    config.thumbnails.eager_pages = 1;
    let mut app = test_app(config);
    app.open_document(&path);
    assert_eq!(
        app.host.session().map(|session| session.thumbnails.len()),
        Some(1)
    );

    settle_page(&mut app);
    settle_thumbnails(&mut app);
    assert_eq!(
        app.host.session().map(|session| session.thumbnails.len()),
        Some(5)
    );
    let _ = std::fs::remove_file(path);
}

#[test]
fn failed_open_keeps_error_and_no_session() {
    let path = unique_temp_path("broken.pdf");
    std::fs::write(&path, b"not a pdf").expect("write junk");
    let mut app = test_app(Config::default());

    assert!(!app.open_document(&path));
    assert!(app.host.session().is_none());
    assert!(app.state.load_error.is_some());
    assert!(app.state.status.message.starts_with("open failed"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn failed_open_leaves_current_document_in_place() {
    let good = write_pdf(&["one"]);
    let missing = unique_temp_path("missing.pdf");
    let mut app = test_app(Config::default());
    app.open_document(&good);
    let session_id = app.host.current_id();

    assert!(!app.open_document(&missing));
    assert_eq!(app.host.current_id(), session_id);
    let _ = std::fs::remove_file(good);
}

#[test]
fn renders_for_a_replaced_document_are_ignored() {
    let first = write_pdf(&["one"]);
    let second = write_pdf(&["two"]);
    let mut app = test_app(Config::default());
    app.open_document(&first);
    let old_id = app.host.current_id().expect("first session");
    app.open_document(&second);

    let stale = RenderOutcome {
        session_id: old_id,
        ticket: app.render.tickets.latest(),
        job: RenderJob::Page {
            page: 1,
            scale: 1.5,
        },
        result: Ok(RgbaFrame {
            width: 1,
            height: 1,
            pixels: vec![0; 4].into(),
        }),
        elapsed: Duration::ZERO,
    };
    assert!(!app.handle_render_outcome(stale));
    assert_eq!(app.state.pending_page, Some(1));
    let _ = std::fs::remove_file(first);
    let _ = std::fs::remove_file(second);
}

#[test]
fn render_failure_reports_and_keeps_page() {
    let path = write_pdf(&["one", "two"]);
    let mut app = test_app(Config::default());
    app.open_document(&path);
    let session_id = app.host.current_id().expect("session");
    let scale = app
        .host
        .session()
        .map(|session| session.view.scale())
        .expect("scale");

    let failed = RenderOutcome {
        session_id,
        ticket: app.render.tickets.latest(),
        job: RenderJob::Page { page: 1, scale },
        result: Err(AppError::invalid_argument("boom")),
        elapsed: Duration::ZERO,
    };
    assert!(app.handle_render_outcome(failed));
    assert_eq!(app.state.pending_page, None);
    assert!(
        app.state
            .status
            .message
            .starts_with("render failed for page 1")
    );
    assert_eq!(current_page(&app), 1);
    let _ = std::fs::remove_file(path);
}

#[test]
fn resize_refits_width_after_debounce() {
    let path = write_pdf(&["one"]);
    let mut app = test_app(Config::default());
    app.open_document(&path);
    settle_page(&mut app);

    app.execute(Command::FitWidth).expect("fit width");
    settle_page(&mut app);
    let wide = app.host.session().map(|session| session.view.scale());
    assert_eq!(
        app.host.session().map(|session| session.view.fit_mode()),
        Some(FitMode::FitWidth)
    );

    let now = Instant::now();
    app.on_resize(60, 40, now);
    assert!(!app.apply_pending_resize(now));
    assert!(app.apply_pending_resize(now + Duration::from_secs(1)));
    let narrow = app.host.session().map(|session| session.view.scale());
    assert!(narrow < wide);
    let _ = std::fs::remove_file(path);
}
