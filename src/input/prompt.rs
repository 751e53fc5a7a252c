use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::app::PromptKind;
use crate::command::{
    Command, command_registry, expand_home, parse_command_text, parse_page_number, usage,
};

use super::files::list_pdf_files;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PromptCandidate {
    label: String,
    detail: Option<String>,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptItemView {
    pub label: String,
    pub detail: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub title: String,
    pub input: String,
    pub cursor: usize,
    pub hint: Option<String>,
    pub items: Vec<PromptItemView>,
    pub selected_idx: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromptKeyResult {
    Consumed,
    Cancelled,
    Submitted(Command),
    /// Submission was refused; the prompt stays open.
    Rejected(String),
}

/// Single-line input with an optional filtered candidate list. Serves the
/// open-file picker, the page jump box, and the `:` command line.
#[derive(Debug)]
pub struct Prompt {
    kind: PromptKind,
    input: Input,
    dir: PathBuf,
    candidates: Vec<PromptCandidate>,
    visible: Vec<usize>,
    selected: usize,
    hint: Option<String>,
}

impl Prompt {
    /// `dir` is where the open-file prompt starts listing PDFs.
    pub fn open(kind: PromptKind, dir: &Path) -> Self {
        let mut prompt = Self {
            kind,
            input: Input::default(),
            dir: dir.to_path_buf(),
            candidates: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            hint: None,
        };
        prompt.load_candidates();
        prompt.refilter();
        prompt
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptKeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return PromptKeyResult::Cancelled,
            KeyCode::Char('g') if ctrl => return PromptKeyResult::Cancelled,
            KeyCode::Up => self.select_prev(),
            KeyCode::Char('p') if ctrl => self.select_prev(),
            KeyCode::Down => self.select_next(),
            KeyCode::Char('n') if ctrl => self.select_next(),
            KeyCode::Tab => self.complete(),
            KeyCode::Enter => return self.submit(),
            _ => {
                self.input.handle_event(&Event::Key(key));
                self.refilter();
            }
        }
        PromptKeyResult::Consumed
    }

    pub fn view(&self) -> PromptView {
        let items = self
            .visible
            .iter()
            .enumerate()
            .filter_map(|(idx, candidate_idx)| {
                self.candidates
                    .get(*candidate_idx)
                    .map(|candidate| PromptItemView {
                        label: candidate.label.clone(),
                        detail: candidate.detail.clone(),
                        selected: idx == self.selected,
                    })
            })
            .collect();

        let title = match self.kind {
            PromptKind::OpenFile => format!("{} ({})", self.kind.title(), self.dir.display()),
            _ => self.kind.title().to_string(),
        };
        PromptView {
            title,
            input: self.input.value().to_string(),
            cursor: self.input.cursor(),
            hint: self.hint.clone(),
            items,
            selected_idx: self.selected,
        }
    }

    fn load_candidates(&mut self) {
        self.hint = None;
        self.candidates = match self.kind {
            PromptKind::OpenFile => match list_pdf_files(&self.dir) {
                Ok(files) => {
                    if files.is_empty() {
                        self.hint = Some("no PDF files here; type a path".to_string());
                    }
                    files
                        .into_iter()
                        .map(|path| PromptCandidate {
                            label: path
                                .file_name()
                                .map(|name| name.to_string_lossy().into_owned())
                                .unwrap_or_default(),
                            detail: None,
                            value: path.display().to_string(),
                        })
                        .collect()
                }
                Err(err) => {
                    self.hint = Some(err.to_string());
                    Vec::new()
                }
            },
            PromptKind::GotoPage => Vec::new(),
            PromptKind::Command => command_registry()
                .iter()
                .map(|spec| PromptCandidate {
                    label: usage(spec),
                    detail: Some(spec.title.to_string()),
                    value: spec.id.to_string(),
                })
                .collect(),
        };
    }

    fn refilter(&mut self) {
        let query = match self.kind {
            // only the command name filters; arguments follow it
            PromptKind::Command => self.input.value().split_whitespace().next().unwrap_or(""),
            _ => self.input.value(),
        };
        self.visible = select_matches(query, &self.candidates);
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
    }

    fn selected_candidate(&self) -> Option<&PromptCandidate> {
        self.visible
            .get(self.selected)
            .and_then(|idx| self.candidates.get(*idx))
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    fn complete(&mut self) {
        let Some(candidate) = self.selected_candidate() else {
            return;
        };
        let value = match self.kind {
            PromptKind::Command => format!("{} ", candidate.value),
            _ => candidate.value.clone(),
        };
        self.input = Input::new(value);
        self.refilter();
    }

    fn submit(&mut self) -> PromptKeyResult {
        let text = self.input.value().trim().to_string();
        match self.kind {
            PromptKind::GotoPage => match parse_page_number(&text) {
                Ok(page) => PromptKeyResult::Submitted(Command::GotoPage { page }),
                Err(err) => PromptKeyResult::Rejected(err.to_string()),
            },
            PromptKind::Command => {
                let line = if text.is_empty() {
                    self.selected_candidate()
                        .map(|candidate| candidate.value.clone())
                        .unwrap_or_default()
                } else {
                    text
                };
                match parse_command_text(&line) {
                    Ok(command) => PromptKeyResult::Submitted(command),
                    Err(err) => PromptKeyResult::Rejected(err.to_string()),
                }
            }
            PromptKind::OpenFile => self.submit_path(&text),
        }
    }

    fn submit_path(&mut self, text: &str) -> PromptKeyResult {
        if !text.is_empty() {
            let typed = expand_home(text);
            let path = if typed.is_absolute() {
                typed
            } else {
                self.dir.join(typed)
            };
            if path.is_dir() {
                self.dir = path;
                self.input = Input::default();
                self.selected = 0;
                self.load_candidates();
                self.refilter();
                return PromptKeyResult::Consumed;
            }
            if path.is_file() {
                return PromptKeyResult::Submitted(Command::OpenFile { path });
            }
        }

        match self.selected_candidate() {
            Some(candidate) => PromptKeyResult::Submitted(Command::OpenFile {
                path: PathBuf::from(&candidate.value),
            }),
            None => PromptKeyResult::Rejected("no PDF selected".to_string()),
        }
    }
}

/// Prefix hits first, then substring hits, both case-insensitive.
fn select_matches(input: &str, candidates: &[PromptCandidate]) -> Vec<usize> {
    let query = input.trim().to_lowercase();
    if query.is_empty() {
        return (0..candidates.len()).collect();
    }

    let (mut prefix, mut contains) = (Vec::new(), Vec::new());
    for (idx, candidate) in candidates.iter().enumerate() {
        let label = candidate.label.to_lowercase();
        if label.starts_with(&query) {
            prefix.push(idx);
        } else if label.contains(&query) {
            contains.push(idx);
        }
    }
    prefix.extend(contains);
    prefix
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::PromptKind;
    use crate::command::Command;
    use crate::test_support::unique_temp_path;

    use super::{Prompt, PromptKeyResult};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(prompt: &mut Prompt, text: &str) {
        for ch in text.chars() {
            assert_eq!(prompt.handle_key(key(KeyCode::Char(ch))), PromptKeyResult::Consumed);
        }
    }

    #[test]
    fn goto_prompt_submits_valid_page() {
        let mut prompt = Prompt::open(PromptKind::GotoPage, Path::new("."));
        type_text(&mut prompt, "12");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptKeyResult::Submitted(Command::GotoPage { page: 12 })
        );
    }

    #[test]
    fn goto_prompt_rejects_non_numbers() {
        let mut prompt = Prompt::open(PromptKind::GotoPage, Path::new("."));
        type_text(&mut prompt, "abc");
        assert!(matches!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptKeyResult::Rejected(_)
        ));
        assert_eq!(prompt.handle_key(key(KeyCode::Esc)), PromptKeyResult::Cancelled);
    }

    #[test]
    fn command_prompt_filters_and_completes() {
        let mut prompt = Prompt::open(PromptKind::Command, Path::new("."));
        type_text(&mut prompt, "zoom");
        let view = prompt.view();
        // prefix hits come before reset-zoom
        assert_eq!(view.items.len(), 3);
        assert!(view.items[0].label.starts_with("zoom-"));
        assert_eq!(view.items[2].label, "reset-zoom");

        prompt.handle_key(key(KeyCode::Down));
        prompt.handle_key(key(KeyCode::Tab));
        assert_eq!(prompt.value(), "zoom-out ");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptKeyResult::Submitted(Command::ZoomOut)
        );
    }

    #[test]
    fn command_prompt_parses_arguments() {
        let mut prompt = Prompt::open(PromptKind::Command, Path::new("."));
        type_text(&mut prompt, "goto-page 4");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptKeyResult::Submitted(Command::GotoPage { page: 4 })
        );
    }

    #[test]
    fn open_prompt_lists_directory_and_picks_selection() {
        let dir = unique_temp_path("open_prompt");
        fs::create_dir_all(&dir).expect("dir should be created");
        for name in ["alpha.pdf", "beta.pdf", "gamma.txt"] {
            fs::write(dir.join(name), b"%PDF-1.4").expect("file should be written");
        }

        let mut prompt = Prompt::open(PromptKind::OpenFile, &dir);
        assert_eq!(prompt.view().items.len(), 2);

        type_text(&mut prompt, "bet");
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptKeyResult::Submitted(Command::OpenFile {
                path: dir.join("beta.pdf")
            })
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_prompt_descends_into_typed_directory() {
        let dir = unique_temp_path("open_prompt_nested");
        let nested = dir.join("inner");
        fs::create_dir_all(&nested).expect("dir should be created");
        fs::write(nested.join("deep.pdf"), b"%PDF-1.4").expect("file should be written");

        let mut prompt = Prompt::open(PromptKind::OpenFile, &dir);
        assert!(prompt.view().items.is_empty());
        assert!(prompt.view().hint.is_some());

        type_text(&mut prompt, "inner");
        assert_eq!(prompt.handle_key(key(KeyCode::Enter)), PromptKeyResult::Consumed);
        assert_eq!(prompt.view().items.len(), 1);
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            PromptKeyResult::Submitted(Command::OpenFile {
                path: nested.join("deep.pdf")
            })
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
