mod image_ops;
mod ratatui;
mod terminal_cell;
mod traits;

#[cfg(test)]
mod tests;

pub use ratatui::RatatuiImagePresenter;
pub use terminal_cell::cells_to_px;
pub use traits::{ImagePresenter, PanOffset, PresenterCaps, PresenterKind};

pub fn create_presenter(kind: PresenterKind) -> Box<dyn ImagePresenter> {
    match kind {
        PresenterKind::RatatuiImage => Box::new(RatatuiImagePresenter::new()),
    }
}
