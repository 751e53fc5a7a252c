use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::Mode;
use crate::command::Command;
use crate::config::Config;
use crate::ui::ThumbnailStrip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapPreset {
    Default,
    Emacs,
}

impl KeymapPreset {
    pub fn parse(value: &str) -> Self {
        match value {
            "emacs" => Self::Emacs,
            _ => Self::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    preset: KeymapPreset,
    scroll_step: i32,
}

impl Keymap {
    pub fn new(preset: KeymapPreset, scroll_step: u16) -> Self {
        Self {
            preset,
            scroll_step: i32::from(scroll_step.max(1)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            KeymapPreset::parse(&config.keymap.preset),
            config.view.scroll_step_cells,
        )
    }

    pub fn preset(&self) -> KeymapPreset {
        self.preset
    }

    /// Prompt keys are not mapped here; the prompt consumes them itself.
    pub fn map_key(&self, key: KeyEvent, mode: Mode) -> Option<Command> {
        match mode {
            Mode::Normal => match self.preset {
                KeymapPreset::Default => self.normal_default(key),
                KeymapPreset::Emacs => self.normal_emacs(key),
            },
            Mode::Details => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Command::Cancel),
                KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Command::Cancel)
                }
                _ => None,
            },
            Mode::Prompt(_) => None,
        }
    }

    /// Ctrl + wheel zooms, the plain wheel pans, and a left click on the
    /// sidebar jumps to the thumbnail under the pointer.
    pub fn map_mouse(
        &self,
        mouse: MouseEvent,
        mode: Mode,
        sidebar: Option<&ThumbnailStrip>,
    ) -> Option<Command> {
        if mode != Mode::Normal {
            return None;
        }
        let zoom = mouse.modifiers.contains(KeyModifiers::CONTROL);
        match mouse.kind {
            MouseEventKind::ScrollUp if zoom => Some(Command::ZoomIn),
            MouseEventKind::ScrollDown if zoom => Some(Command::ZoomOut),
            MouseEventKind::ScrollUp => Some(Command::Scroll {
                dx: 0,
                dy: -self.scroll_step,
            }),
            MouseEventKind::ScrollDown => Some(Command::Scroll {
                dx: 0,
                dy: self.scroll_step,
            }),
            MouseEventKind::Down(MouseButton::Left) => sidebar
                .and_then(|strip| strip.page_at(mouse.column, mouse.row))
                .map(|page| Command::GotoPage { page }),
            _ => None,
        }
    }

    fn scroll(&self, dx: i32, dy: i32) -> Command {
        Command::Scroll {
            dx: dx * self.scroll_step,
            dy: dy * self.scroll_step,
        }
    }

    fn normal_default(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('o') => Some(Command::OpenFilePrompt),
                KeyCode::Char('d') => Some(self.scroll(0, 4)),
                KeyCode::Char('u') => Some(self.scroll(0, -4)),
                KeyCode::Char('c') => Some(Command::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(':') => Some(Command::CommandPrompt),
            KeyCode::Char('j') | KeyCode::Char(' ') | KeyCode::PageDown | KeyCode::Right => {
                Some(Command::NextPage)
            }
            KeyCode::Char('k') | KeyCode::Backspace | KeyCode::PageUp | KeyCode::Left => {
                Some(Command::PrevPage)
            }
            KeyCode::Char('g') | KeyCode::Home => Some(Command::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Command::LastPage),
            KeyCode::Char('p') => Some(Command::GotoPrompt),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::ZoomIn),
            KeyCode::Char('-') => Some(Command::ZoomOut),
            KeyCode::Char('0') => Some(Command::ResetZoom),
            KeyCode::Char('w') => Some(Command::FitWidth),
            KeyCode::Char('f') => Some(Command::FitPage),
            KeyCode::Char('h') => Some(self.scroll(-1, 0)),
            KeyCode::Char('l') => Some(self.scroll(1, 0)),
            KeyCode::Up => Some(self.scroll(0, -1)),
            KeyCode::Down => Some(self.scroll(0, 1)),
            KeyCode::Char('t') => Some(Command::ToggleThumbnails),
            KeyCode::Char('i') => Some(Command::ShowDetails),
            KeyCode::Char('o') => Some(Command::OpenFilePrompt),
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Esc => Some(Command::Cancel),
            _ => None,
        }
    }

    fn normal_emacs(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::ALT) {
            return match key.code {
                KeyCode::Char('x') => Some(Command::CommandPrompt),
                KeyCode::Char('v') => Some(Command::PrevPage),
                KeyCode::Char('g') => Some(Command::GotoPrompt),
                KeyCode::Char('<') => Some(Command::FirstPage),
                KeyCode::Char('>') => Some(Command::LastPage),
                _ => None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('n') => Some(self.scroll(0, 1)),
                KeyCode::Char('p') => Some(self.scroll(0, -1)),
                KeyCode::Char('f') => Some(self.scroll(1, 0)),
                KeyCode::Char('b') => Some(self.scroll(-1, 0)),
                KeyCode::Char('v') => Some(Command::NextPage),
                KeyCode::Char('g') => Some(Command::Cancel),
                KeyCode::Char('o') => Some(Command::OpenFilePrompt),
                KeyCode::Char('q') => Some(Command::Quit),
                _ => None,
            };
        }

        self.normal_default(key)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::layout::Rect;

    use crate::app::{Mode, PromptKind};
    use crate::command::Command;
    use crate::ui::ThumbnailStrip;

    use super::{Keymap, KeymapPreset};

    fn mouse(kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }
    }

    #[test]
    fn keymap_preset_parse_defaults_on_unknown_values() {
        assert_eq!(KeymapPreset::parse("default"), KeymapPreset::Default);
        assert_eq!(KeymapPreset::parse("emacs"), KeymapPreset::Emacs);
        assert_eq!(KeymapPreset::parse("vi"), KeymapPreset::Default);
    }

    #[test]
    fn default_preset_maps_paging_zoom_and_fit() {
        let keymap = Keymap::new(KeymapPreset::Default, 4);
        let press = |code| keymap.map_key(KeyEvent::new(code, KeyModifiers::NONE), Mode::Normal);

        assert_eq!(press(KeyCode::Char('j')), Some(Command::NextPage));
        assert_eq!(press(KeyCode::PageUp), Some(Command::PrevPage));
        assert_eq!(press(KeyCode::Char('+')), Some(Command::ZoomIn));
        assert_eq!(press(KeyCode::Char('w')), Some(Command::FitWidth));
        assert_eq!(press(KeyCode::Char('p')), Some(Command::GotoPrompt));
        assert_eq!(
            press(KeyCode::Down),
            Some(Command::Scroll { dx: 0, dy: 4 })
        );
    }

    #[test]
    fn emacs_preset_maps_ctrl_v_and_alt_x() {
        let keymap = Keymap::new(KeymapPreset::Emacs, 2);
        assert_eq!(
            keymap.map_key(
                KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL),
                Mode::Normal
            ),
            Some(Command::NextPage)
        );
        assert_eq!(
            keymap.map_key(
                KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT),
                Mode::Normal
            ),
            Some(Command::CommandPrompt)
        );
        // falls back to the default bindings
        assert_eq!(
            keymap.map_key(
                KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
                Mode::Normal
            ),
            Some(Command::Quit)
        );
    }

    #[test]
    fn details_modal_closes_on_esc_enter_and_q() {
        let keymap = Keymap::new(KeymapPreset::Default, 4);
        for code in [KeyCode::Esc, KeyCode::Enter, KeyCode::Char('q')] {
            assert_eq!(
                keymap.map_key(KeyEvent::new(code, KeyModifiers::NONE), Mode::Details),
                Some(Command::Cancel)
            );
        }
        assert_eq!(
            keymap.map_key(
                KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE),
                Mode::Prompt(PromptKind::GotoPage)
            ),
            None
        );
    }

    #[test]
    fn ctrl_wheel_zooms_and_plain_wheel_scrolls() {
        let keymap = Keymap::new(KeymapPreset::Default, 3);
        assert_eq!(
            keymap.map_mouse(
                mouse(MouseEventKind::ScrollUp, 50, 5, KeyModifiers::CONTROL),
                Mode::Normal,
                None
            ),
            Some(Command::ZoomIn)
        );
        assert_eq!(
            keymap.map_mouse(
                mouse(MouseEventKind::ScrollDown, 50, 5, KeyModifiers::CONTROL),
                Mode::Normal,
                None
            ),
            Some(Command::ZoomOut)
        );
        assert_eq!(
            keymap.map_mouse(
                mouse(MouseEventKind::ScrollDown, 50, 5, KeyModifiers::NONE),
                Mode::Normal,
                None
            ),
            Some(Command::Scroll { dx: 0, dy: 3 })
        );
    }

    #[test]
    fn sidebar_click_jumps_to_thumbnail_page() {
        let keymap = Keymap::new(KeymapPreset::Default, 4);
        let strip = ThumbnailStrip::new(Rect::new(0, 0, 22, 40), 1, 10);
        let slot_height = strip.slot_height();

        let command = keymap.map_mouse(
            mouse(
                MouseEventKind::Down(MouseButton::Left),
                5,
                slot_height + 1,
                KeyModifiers::NONE,
            ),
            Mode::Normal,
            Some(&strip),
        );
        assert_eq!(command, Some(Command::GotoPage { page: 2 }));

        let outside = keymap.map_mouse(
            mouse(
                MouseEventKind::Down(MouseButton::Left),
                60,
                1,
                KeyModifiers::NONE,
            ),
            Mode::Normal,
            Some(&strip),
        );
        assert_eq!(outside, None);
    }
}
