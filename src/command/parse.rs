use std::path::PathBuf;

use crate::error::{AppError, AppResult};

use super::spec::{find_spec, usage};
use super::types::Command;

pub fn parse_command_text(input: &str) -> AppResult<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_argument("command must not be empty"));
    }

    let (id, args_text) = match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    };

    let Some(spec) = find_spec(id) else {
        return Err(AppError::invalid_argument(format!("unknown command: {id}")));
    };

    match id {
        "next-page" => parse_no_args(id, args_text, Command::NextPage),
        "prev-page" => parse_no_args(id, args_text, Command::PrevPage),
        "first-page" => parse_no_args(id, args_text, Command::FirstPage),
        "last-page" => parse_no_args(id, args_text, Command::LastPage),
        "goto-page" => parse_page_number(args_text).map(|page| Command::GotoPage { page }),
        "zoom-in" => parse_no_args(id, args_text, Command::ZoomIn),
        "zoom-out" => parse_no_args(id, args_text, Command::ZoomOut),
        "reset-zoom" => parse_no_args(id, args_text, Command::ResetZoom),
        "set-scale" => parse_set_scale(args_text),
        "fit-width" => parse_no_args(id, args_text, Command::FitWidth),
        "fit-page" => parse_no_args(id, args_text, Command::FitPage),
        "scroll" => parse_scroll(args_text),
        "thumbnails" => parse_no_args(id, args_text, Command::ToggleThumbnails),
        "details" => parse_no_args(id, args_text, Command::ShowDetails),
        "open" => parse_open(args_text),
        "cancel" => parse_no_args(id, args_text, Command::Cancel),
        "quit" => parse_no_args(id, args_text, Command::Quit),
        _ => Err(AppError::unsupported(format!(
            "command parser is out of sync with registry: {}",
            usage(spec)
        ))),
    }
}

/// Parses the text of the page jump prompt. Rejects anything but a positive integer.
pub fn parse_page_number(text: &str) -> AppResult<usize> {
    let mut parts = text.split_whitespace();
    let Some(page_text) = parts.next() else {
        return Err(AppError::invalid_argument("a page number is required"));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument("expected exactly one page number"));
    }

    let page = page_text
        .parse::<i64>()
        .map_err(|_| AppError::invalid_argument("page must be an integer"))?;
    if page < 1 {
        return Err(AppError::invalid_argument("page number must be >= 1"));
    }
    usize::try_from(page).map_err(|_| AppError::invalid_argument("page number is too large"))
}

fn parse_no_args(id: &str, args_text: &str, cmd: Command) -> AppResult<Command> {
    if args_text.is_empty() {
        return Ok(cmd);
    }
    Err(AppError::invalid_argument(format!(
        "{id} does not accept arguments"
    )))
}

fn parse_set_scale(args_text: &str) -> AppResult<Command> {
    let mut parts = args_text.split_whitespace();
    let Some(value_text) = parts.next() else {
        return Err(AppError::invalid_argument(
            "set-scale requires 1 argument: scale",
        ));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument(
            "set-scale accepts exactly 1 argument",
        ));
    }

    // "150%" is accepted as a convenience for 1.5.
    let value = match value_text.strip_suffix('%') {
        Some(percent) => percent.parse::<f32>().map(|value| value / 100.0),
        None => value_text.parse::<f32>(),
    }
    .map_err(|_| AppError::invalid_argument("set-scale value must be a number"))?;
    if !value.is_finite() {
        return Err(AppError::invalid_argument("set-scale value must be finite"));
    }

    Ok(Command::SetScale { value })
}

fn parse_scroll(args_text: &str) -> AppResult<Command> {
    let mut parts = args_text.split_whitespace();
    let (Some(dx_text), Some(dy_text)) = (parts.next(), parts.next()) else {
        return Err(AppError::invalid_argument(
            "scroll requires 2 arguments: dx dy",
        ));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument(
            "scroll accepts exactly 2 arguments",
        ));
    }

    let dx = dx_text
        .parse::<i32>()
        .map_err(|_| AppError::invalid_argument("scroll dx must be i32"))?;
    let dy = dy_text
        .parse::<i32>()
        .map_err(|_| AppError::invalid_argument("scroll dy must be i32"))?;

    Ok(Command::Scroll { dx, dy })
}

fn parse_open(args_text: &str) -> AppResult<Command> {
    let path = args_text.trim();
    if path.is_empty() {
        return Err(AppError::invalid_argument("open requires 1 argument: path"));
    }
    Ok(Command::OpenFile {
        path: expand_home(path),
    })
}

/// Expands a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}
