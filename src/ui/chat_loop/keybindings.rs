//! Key → action mapping for the studio.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::page::Mode;

const PAGE_SCROLL: u16 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    SelectMode(Mode),
    NextMode,
    PreviousMode,
    Submit,
    AttachImage,
    ToggleLogging,
    NextField,
    PreviousField,
    ScrollUp(u16),
    ScrollDown(u16),
    /// Hand the key to the focused text field.
    Edit(KeyEvent),
}

/// Where the key lands.
#[derive(Debug, Clone, Copy)]
pub struct KeyContext {
    pub mode: Mode,
    /// Enter inserts a newline in the focused field.
    pub multiline: bool,
}

pub fn map_key(key: KeyEvent, context: KeyContext) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => KeyAction::Quit,
        KeyCode::Char('g') if ctrl => KeyAction::Submit,
        KeyCode::Char('l') if ctrl => KeyAction::ToggleLogging,
        KeyCode::Char('o') if ctrl && context.mode == Mode::VisionGenerate => {
            KeyAction::AttachImage
        }
        KeyCode::F(n @ 1..=3) => KeyAction::SelectMode(Mode::ALL[usize::from(n) - 1]),
        KeyCode::Right if ctrl => KeyAction::NextMode,
        KeyCode::Left if ctrl => KeyAction::PreviousMode,
        KeyCode::Tab if context.mode == Mode::VisionGenerate => KeyAction::NextField,
        KeyCode::BackTab if context.mode == Mode::VisionGenerate => KeyAction::PreviousField,
        KeyCode::Enter if !context.multiline => KeyAction::Submit,
        KeyCode::PageUp => KeyAction::ScrollUp(PAGE_SCROLL),
        KeyCode::PageDown => KeyAction::ScrollDown(PAGE_SCROLL),
        KeyCode::Up if ctrl => KeyAction::ScrollUp(1),
        KeyCode::Down if ctrl => KeyAction::ScrollDown(1),
        _ => KeyAction::Edit(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    const SINGLE: KeyContext = KeyContext {
        mode: Mode::Generate,
        multiline: false,
    };
    const VISION_PROMPT: KeyContext = KeyContext {
        mode: Mode::VisionGenerate,
        multiline: true,
    };

    #[test]
    fn enter_submits_single_line_fields() {
        assert_eq!(map_key(key(KeyCode::Enter), SINGLE), KeyAction::Submit);
    }

    #[test]
    fn enter_edits_multiline_prompt_but_ctrl_g_submits() {
        assert!(matches!(
            map_key(key(KeyCode::Enter), VISION_PROMPT),
            KeyAction::Edit(_)
        ));
        assert_eq!(
            map_key(ctrl(KeyCode::Char('g')), VISION_PROMPT),
            KeyAction::Submit
        );
    }

    #[test]
    fn function_keys_pick_pages() {
        assert_eq!(
            map_key(key(KeyCode::F(2)), SINGLE),
            KeyAction::SelectMode(Mode::Chat)
        );
        assert_eq!(
            map_key(key(KeyCode::F(3)), SINGLE),
            KeyAction::SelectMode(Mode::VisionGenerate)
        );
        assert!(matches!(
            map_key(key(KeyCode::F(4)), SINGLE),
            KeyAction::Edit(_)
        ));
    }

    #[test]
    fn tab_cycles_fields_only_on_vision_page() {
        assert_eq!(
            map_key(key(KeyCode::Tab), VISION_PROMPT),
            KeyAction::NextField
        );
        assert!(matches!(map_key(key(KeyCode::Tab), SINGLE), KeyAction::Edit(_)));
        assert!(matches!(
            map_key(ctrl(KeyCode::Char('o')), SINGLE),
            KeyAction::Edit(_)
        ));
    }

    #[test]
    fn control_keys() {
        assert_eq!(map_key(ctrl(KeyCode::Char('c')), SINGLE), KeyAction::Quit);
        assert_eq!(
            map_key(ctrl(KeyCode::Char('l')), SINGLE),
            KeyAction::ToggleLogging
        );
        assert_eq!(map_key(ctrl(KeyCode::Right), SINGLE), KeyAction::NextMode);
        assert_eq!(
            map_key(key(KeyCode::PageUp), SINGLE),
            KeyAction::ScrollUp(PAGE_SCROLL)
        );
        assert!(matches!(
            map_key(key(KeyCode::Char('c')), SINGLE),
            KeyAction::Edit(_)
        ));
    }
}
