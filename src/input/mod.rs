pub mod files;
pub mod keymap;
pub mod prompt;

pub use files::{is_pdf_path, list_pdf_files};
pub use keymap::{Keymap, KeymapPreset};
pub use prompt::{Prompt, PromptItemView, PromptKeyResult, PromptView};
