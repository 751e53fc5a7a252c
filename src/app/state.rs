use crate::command::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenFile,
    GotoPage,
    Command,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::OpenFile => "Open PDF",
            Self::GotoPage => "Go to page",
            Self::Command => "Command",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Prompt(PromptKind),
    Details,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: String,
    pub last_action_id: Option<ActionId>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub mode: Mode,
    pub thumbnails_visible: bool,
    /// Pan offset of the page view, in terminal cells.
    pub scroll_x: i32,
    pub scroll_y: i32,
    /// Page whose render was requested but has not landed yet.
    pub pending_page: Option<usize>,
    pub load_error: Option<String>,
    pub status: StatusState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            thumbnails_visible: true,
            scroll_x: 0,
            scroll_y: 0,
            pending_page: None,
            load_error: None,
            status: StatusState::default(),
        }
    }
}

impl AppState {
    pub fn reset_scroll(&mut self) {
        self.scroll_x = 0;
        self.scroll_y = 0;
    }
}
