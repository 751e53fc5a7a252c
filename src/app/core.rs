use std::time::Instant;

use ratatui::layout::Rect;

use crate::backend::RgbaFrame;
use crate::config::Config;
use crate::input::{Keymap, Prompt};
use crate::presenter::{ImagePresenter, PresenterKind, create_presenter};
use crate::render::{PageFrameCache, PageFrameKey, RenderTickets, RenderWorker};
use crate::session::{SessionHost, ThumbnailQueue};

use super::state::AppState;

/// Page render the view is waiting for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingRender {
    pub ticket: u64,
    pub page: usize,
    pub scale: f32,
}

pub struct RenderSubsystem {
    pub presenter: Box<dyn ImagePresenter>,
    pub cache: PageFrameCache,
    pub tickets: RenderTickets,
    pub worker: Option<RenderWorker>,
    pub thumbnail_queue: Option<ThumbnailQueue>,
    /// Earliest time the next background thumbnail may be dispatched.
    pub thumbnails_resume_at: Option<Instant>,
    pub current_frame: Option<(PageFrameKey, RgbaFrame)>,
    pub(crate) pending: Option<PendingRender>,
}

impl RenderSubsystem {
    fn new(presenter: Box<dyn ImagePresenter>, config: &Config) -> Self {
        Self {
            presenter,
            cache: PageFrameCache::new(
                config.render.page_cache_entries,
                config.render.page_cache_memory_bytes(),
            ),
            tickets: RenderTickets::default(),
            worker: None,
            thumbnail_queue: None,
            thumbnails_resume_at: None,
            current_frame: None,
            pending: None,
        }
    }
}

pub struct App {
    pub state: AppState,
    pub host: SessionHost,
    pub render: RenderSubsystem,
    pub prompt: Option<Prompt>,
    pub keymap: Keymap,
    pub config: Config,
    /// Last known terminal area.
    pub area: Rect,
    pub(crate) resize_deadline: Option<Instant>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_presenter(config, create_presenter(PresenterKind::RatatuiImage))
    }

    pub fn with_presenter(config: Config, presenter: Box<dyn ImagePresenter>) -> Self {
        Self {
            state: AppState::default(),
            host: SessionHost::new(),
            render: RenderSubsystem::new(presenter, &config),
            prompt: None,
            keymap: Keymap::from_config(&config),
            config,
            area: Rect::default(),
            resize_deadline: None,
        }
    }
}
