use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::backend::{DeclaredPermissions, DocumentInfo, PdfBackend};
use crate::error::{AppError, AppResult};

pub const UNKNOWN: &str = "unknown";
pub const FORMAT_ERROR: &str = "format error";
pub const NO_RESTRICTION_INFO: &str = "no restriction info";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filesystem facts captured when the document was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStats {
    pub size: u64,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

impl FileStats {
    pub fn read(path: &Path) -> AppResult<Self> {
        let meta = std::fs::metadata(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to stat {}", path.display()))
        })?;
        Ok(Self {
            size: meta.len(),
            created: meta.created().ok(),
            modified: meta.modified().ok(),
        })
    }
}

/// Flat, display-ready view of a document's declared information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
    pub version: String,
    pub linearized: bool,
    pub encrypted: bool,
    pub permissions: Vec<String>,
}

impl MetadataRecord {
    /// Placeholder values shown when the document info could not be read.
    pub fn unavailable() -> Self {
        build_record(&DocumentInfo::default())
    }
}

/// Everything the details view shows: file facts, position, and metadata.
/// Filesystem dates live here so they survive a failed metadata read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentDetails {
    pub file_name: String,
    pub file_size: String,
    pub file_path: String,
    pub total_pages: usize,
    pub current_page: usize,
    pub file_created: String,
    pub file_modified: String,
    #[serde(flatten)]
    pub metadata: Option<MetadataRecord>,
}

impl DocumentDetails {
    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("File name", self.file_name.clone()),
            ("File size", self.file_size.clone()),
            ("Path", self.file_path.clone()),
            ("Pages", self.total_pages.to_string()),
            ("Current page", self.current_page.to_string()),
            ("Created (file)", self.file_created.clone()),
            ("Modified (file)", self.file_modified.clone()),
        ];
        let fallback;
        let meta = match &self.metadata {
            Some(meta) => meta,
            None => {
                fallback = MetadataRecord::unavailable();
                &fallback
            }
        };
        rows.extend([
            ("Title", meta.title.clone()),
            ("Author", meta.author.clone()),
            ("Subject", meta.subject.clone()),
            ("Keywords", meta.keywords.clone()),
            ("Creator", meta.creator.clone()),
            ("Producer", meta.producer.clone()),
            ("Created (PDF)", meta.creation_date.clone()),
            ("Modified (PDF)", meta.modification_date.clone()),
            ("PDF version", meta.version.clone()),
            ("Linearized", yes_no(meta.linearized).to_string()),
            ("Encrypted", yes_no(meta.encrypted).to_string()),
            ("Permissions", meta.permissions.join(", ")),
        ]);
        rows
    }
}

/// Extracts the metadata record; failures are logged and yield `None`.
pub fn extract(doc: &dyn PdfBackend) -> Option<MetadataRecord> {
    match doc.metadata() {
        Ok(info) => Some(build_record(&info)),
        Err(err) => {
            warn!(error = %err, path = %doc.path().display(), "metadata extraction failed");
            None
        }
    }
}

pub fn build_record(info: &DocumentInfo) -> MetadataRecord {
    let text = |value: &Option<String>, placeholder: &str| {
        value
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(placeholder)
            .to_string()
    };

    MetadataRecord {
        title: text(&info.title, "no title"),
        author: text(&info.author, "no author"),
        subject: text(&info.subject, "no subject"),
        keywords: text(&info.keywords, "no keywords"),
        creator: text(&info.creator, "no creator"),
        producer: text(&info.producer, "no producer"),
        creation_date: format_pdf_date(info.creation_date.as_deref()),
        modification_date: format_pdf_date(info.mod_date.as_deref()),
        version: text(&info.version, UNKNOWN),
        linearized: info.linearized,
        encrypted: info.encrypted,
        permissions: permissions_list(&info.permissions),
    }
}

/// Formats a `D:YYYYMMDDHHmmSS` date. The offset suffix is ignored and the
/// wall-clock time is shown as declared. Omitted trailing fields take their
/// PDF defaults (month and day 01, time 00).
pub fn format_pdf_date(raw: Option<&str>) -> String {
    let Some(body) = raw.and_then(|raw| raw.strip_prefix("D:")) else {
        return UNKNOWN.to_string();
    };
    parse_pdf_date(body).unwrap_or_else(|| FORMAT_ERROR.to_string())
}

fn parse_pdf_date(body: &str) -> Option<String> {
    let digits: String = body.chars().take_while(char::is_ascii_digit).take(14).collect();
    if digits.len() < 4 || digits.len() % 2 != 0 {
        return None;
    }

    let field = |start: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + 2) {
            Some(value) => value.parse().ok(),
            None => Some(default),
        }
    };
    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = field(4, 1)?;
    let day = field(6, 1)?;
    let hour = field(8, 0)?;
    let minute = field(10, 0)?;
    let second = field(12, 0)?;

    let moment = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    Some(moment.format(DISPLAY_FORMAT).to_string())
}

pub fn format_system_time(time: Option<SystemTime>) -> String {
    match time {
        Some(time) => DateTime::<Local>::from(time)
            .format(DISPLAY_FORMAT)
            .to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Human-readable size with base 1024 and at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Names of granted permissions; anything not explicitly denied is granted.
pub fn permissions_list(declared: &DeclaredPermissions) -> Vec<String> {
    let entries = [
        ("Printing", declared.printing),
        ("ModifyContents", declared.modify_contents),
        ("CopyContents", declared.copy_contents),
        ("ModifyAnnotations", declared.modify_annotations),
        ("FillIn", declared.fill_in),
        ("ExtractForAccessibility", declared.extract_for_accessibility),
        ("Assemble", declared.assemble),
        ("PrintHighQuality", declared.print_high_quality),
    ];
    let granted: Vec<String> = entries
        .iter()
        .filter(|(_, value)| value.unwrap_or(true))
        .map(|(name, _)| name.to_string())
        .collect();

    if granted.is_empty() {
        vec![NO_RESTRICTION_INFO.to_string()]
    } else {
        granted
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
