mod chrome;
mod layout;
mod overlay;
mod text;
mod thumbnails;

pub use chrome::{DocumentStatus, draw_status_bar};
pub use layout::{SIDEBAR_WIDTH, UiLayout, split_layout};
pub use overlay::{draw_details_modal, draw_loading_overlay, draw_notice, draw_prompt_overlay};
pub use text::{truncate_start_to_width, truncate_to_width};
pub use thumbnails::{ThumbnailStrip, draw_thumbnail_sidebar};
