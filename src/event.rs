use crate::app::Mode;
use crate::command::{ActionId, CommandOutcome};
use crate::session::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CommandExecuted {
        id: ActionId,
        outcome: CommandOutcome,
    },
    PageChanged {
        from: usize,
        to: usize,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    DocumentOpened {
        session_id: SessionId,
        pages: usize,
    },
}

impl AppEvent {
    /// Emits the event to the log at debug level.
    pub fn trace(&self) {
        match self {
            Self::CommandExecuted { id, outcome } => {
                tracing::debug!(action = id.as_str(), ?outcome, "command executed")
            }
            Self::PageChanged { from, to } => tracing::debug!(from, to, "page changed"),
            Self::ModeChanged { from, to } => tracing::debug!(?from, ?to, "mode changed"),
            Self::DocumentOpened { session_id, pages } => {
                tracing::debug!(session_id, pages, "document opened")
            }
        }
    }
}
