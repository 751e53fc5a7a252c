use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    GotoPage { page: usize },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetScale { value: f32 },
    FitWidth,
    FitPage,
    Scroll { dx: i32, dy: i32 },
    ToggleThumbnails,
    ShowDetails,
    OpenFile { path: PathBuf },
    OpenFilePrompt,
    GotoPrompt,
    CommandPrompt,
    Cancel,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    GotoPage,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    SetScale,
    FitWidth,
    FitPage,
    Scroll,
    ToggleThumbnails,
    ShowDetails,
    OpenFile,
    OpenFilePrompt,
    GotoPrompt,
    CommandPrompt,
    Cancel,
    Quit,
    RenderPage,
    Resize,
}

impl ActionId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NextPage => "next-page",
            Self::PrevPage => "prev-page",
            Self::FirstPage => "first-page",
            Self::LastPage => "last-page",
            Self::GotoPage => "goto-page",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::ResetZoom => "reset-zoom",
            Self::SetScale => "set-scale",
            Self::FitWidth => "fit-width",
            Self::FitPage => "fit-page",
            Self::Scroll => "scroll",
            Self::ToggleThumbnails => "toggle-thumbnails",
            Self::ShowDetails => "details",
            Self::OpenFile => "open",
            Self::OpenFilePrompt => "open-prompt",
            Self::GotoPrompt => "goto-prompt",
            Self::CommandPrompt => "command-prompt",
            Self::Cancel => "cancel",
            Self::Quit => "quit",
            Self::RenderPage => "render-page",
            Self::Resize => "resize",
        }
    }
}

impl Command {
    pub fn action_id(&self) -> ActionId {
        match self {
            Self::NextPage => ActionId::NextPage,
            Self::PrevPage => ActionId::PrevPage,
            Self::FirstPage => ActionId::FirstPage,
            Self::LastPage => ActionId::LastPage,
            Self::GotoPage { .. } => ActionId::GotoPage,
            Self::ZoomIn => ActionId::ZoomIn,
            Self::ZoomOut => ActionId::ZoomOut,
            Self::ResetZoom => ActionId::ResetZoom,
            Self::SetScale { .. } => ActionId::SetScale,
            Self::FitWidth => ActionId::FitWidth,
            Self::FitPage => ActionId::FitPage,
            Self::Scroll { .. } => ActionId::Scroll,
            Self::ToggleThumbnails => ActionId::ToggleThumbnails,
            Self::ShowDetails => ActionId::ShowDetails,
            Self::OpenFile { .. } => ActionId::OpenFile,
            Self::OpenFilePrompt => ActionId::OpenFilePrompt,
            Self::GotoPrompt => ActionId::GotoPrompt,
            Self::CommandPrompt => ActionId::CommandPrompt,
            Self::Cancel => ActionId::Cancel,
            Self::Quit => ActionId::Quit,
        }
    }

    /// Commands that only make sense with a document open.
    pub fn needs_document(&self) -> bool {
        !matches!(
            self,
            Self::OpenFile { .. }
                | Self::OpenFilePrompt
                | Self::CommandPrompt
                | Self::Cancel
                | Self::Quit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    F32,
    I32,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub args: &'static [ArgSpec],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Noop,
    QuitRequested,
}

/// Work the shell must carry out after a command changed the view.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    /// Render `page` at the current scale; the page becomes current once drawn.
    ShowPage { page: usize },
    OpenDocument { path: PathBuf },
}
