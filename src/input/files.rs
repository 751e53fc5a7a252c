use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Regular `*.pdf` files directly inside `dir`, sorted by name.
pub fn list_pdf_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| {
        AppError::io_with_context(source, format!("cannot list {}", dir.display()))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_pdf_path(path))
        .collect();
    files.sort_by_key(|path| path.file_name().map(|name| name.to_ascii_lowercase()));
    Ok(files)
}
