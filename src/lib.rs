//! Terminal PDF viewer: document sessions with view state, thumbnails and
//! metadata, a background render pool, and a ratatui shell around them.

pub mod app;
pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod presenter;
pub mod render;
pub mod session;
pub mod ui;

#[cfg(test)]
mod test_support;
