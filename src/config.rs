use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub thumbnails: ThumbnailConfig,
    pub view: ViewConfig,
    pub keymap: KeymapConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub worker_threads: usize,
    pub input_poll_timeout_ms: u64,
    pub page_cache_entries: usize,
    pub page_cache_memory_mb: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            input_poll_timeout_ms: 16,
            page_cache_entries: 32,
            page_cache_memory_mb: 256,
        }
    }
}

impl RenderConfig {
    const MEBIBYTE: usize = 1024 * 1024;

    pub fn page_cache_memory_bytes(&self) -> usize {
        self.page_cache_memory_mb
            .saturating_mul(Self::MEBIBYTE)
            .max(1)
    }

    pub fn input_poll_timeout(&self) -> Duration {
        Duration::from_millis(self.input_poll_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Thumbnails rendered synchronously right after a document opens.
    pub eager_pages: usize,
    pub start_delay_ms: u64,
    /// Background population pauses after every page number divisible by this.
    pub yield_every: usize,
    pub yield_pause_ms: u64,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            eager_pages: 3,
            start_delay_ms: 100,
            yield_every: 2,
            yield_pause_ms: 10,
        }
    }
}

impl ThumbnailConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn yield_pause(&self) -> Duration {
        Duration::from_millis(self.yield_pause_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    pub resize_debounce_ms: u64,
    pub scroll_step_cells: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 100,
            scroll_step_cells: 4,
        }
    }
}

impl ViewConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// No file means logging stays off; the terminal belongs to the UI.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.render.worker_threads = self.render.worker_threads.max(1);
        self.render.input_poll_timeout_ms = self.render.input_poll_timeout_ms.max(1);
        self.render.page_cache_entries = self.render.page_cache_entries.max(1);
        self.render.page_cache_memory_mb = self.render.page_cache_memory_mb.max(1);
        self.thumbnails.yield_every = self.thumbnails.yield_every.max(1);
        self.view.scroll_step_cells = self.view.scroll_step_cells.max(1);
        if self.log.level.trim().is_empty() {
            self.log.level = LogConfig::default().level;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("PDFV_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("pdfv").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("pdfv")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("pdfv").join("config.toml"));
    }
    None
}
