use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::KeyMode;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    Select,
    Back,
    NextTab,
    Reload,
    New,
    Edit,
    AddChapter,
    Delete,
    ToggleAdsense,
    OpenInBrowser,
    ShowHelp,
    HideHelp,
    // Form and editor actions
    Cycle,
    Save,
    AddVocabulary,
    AddExample,
    AddKeyPoint,
    AddQuestion,
    RemoveQuestion,
    ImportanceUp,
    ImportanceDown,
    GenerateDraft,
    // Confirmation overlay
    ConfirmYes,
    ConfirmNo,
    // Input line
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
}

pub fn handle_key_event(key: KeyEvent, mode: KeyMode) -> Option<AppAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(AppAction::Quit);
    }

    match mode {
        // Any key closes help
        KeyMode::Help => Some(AppAction::HideHelp),

        KeyMode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(AppAction::ConfirmYes),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(AppAction::ConfirmNo),
            _ => None,
        },

        KeyMode::Input => match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Esc => Some(AppAction::InputCancel),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        },

        KeyMode::Browse => match key.code {
            KeyCode::Char('q') => Some(AppAction::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Enter => Some(AppAction::Select),
            KeyCode::Tab | KeyCode::Char('1') | KeyCode::Char('2') => Some(AppAction::NextTab),
            KeyCode::Char('r') => Some(AppAction::Reload),
            KeyCode::Char('n') => Some(AppAction::New),
            KeyCode::Char('e') => Some(AppAction::Edit),
            KeyCode::Char('c') => Some(AppAction::AddChapter),
            KeyCode::Char('d') => Some(AppAction::Delete),
            KeyCode::Char('t') => Some(AppAction::ToggleAdsense),
            KeyCode::Char('o') => Some(AppAction::OpenInBrowser),
            KeyCode::Char('?') => Some(AppAction::ShowHelp),
            _ => None,
        },

        KeyMode::Form => match key.code {
            KeyCode::Esc => Some(AppAction::Back),
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Enter => Some(AppAction::Select),
            KeyCode::Char(' ') | KeyCode::Tab => Some(AppAction::Cycle),
            KeyCode::Char('s') => Some(AppAction::Save),
            KeyCode::Char('?') => Some(AppAction::ShowHelp),
            _ => None,
        },

        KeyMode::Editor => match key.code {
            KeyCode::Esc => Some(AppAction::Back),
            KeyCode::Char('j') | KeyCode::Down => Some(AppAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(AppAction::MoveUp),
            KeyCode::Enter => Some(AppAction::Select),
            // Space marks the correct option on an option row
            KeyCode::Char(' ') | KeyCode::Tab => Some(AppAction::Cycle),
            KeyCode::Char('s') => Some(AppAction::Save),
            KeyCode::Char('V') => Some(AppAction::AddVocabulary),
            KeyCode::Char('E') => Some(AppAction::AddExample),
            KeyCode::Char('K') => Some(AppAction::AddKeyPoint),
            KeyCode::Char('Q') => Some(AppAction::AddQuestion),
            KeyCode::Char('D') => Some(AppAction::RemoveQuestion),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(AppAction::ImportanceUp),
            KeyCode::Char('-') => Some(AppAction::ImportanceDown),
            KeyCode::Char('g') => Some(AppAction::GenerateDraft),
            KeyCode::Char('o') => Some(AppAction::OpenInBrowser),
            KeyCode::Char('?') => Some(AppAction::ShowHelp),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn input_mode_captures_letters() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), KeyMode::Input),
            Some(AppAction::InputChar('q'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), KeyMode::Browse),
            Some(AppAction::Quit)
        );
    }

    #[test]
    fn confirm_mode_only_answers_yes_or_no() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('y')), KeyMode::Confirm),
            Some(AppAction::ConfirmYes)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), KeyMode::Confirm),
            Some(AppAction::ConfirmNo)
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('d')), KeyMode::Confirm), None);
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, KeyMode::Input), Some(AppAction::Quit));
        assert_eq!(handle_key_event(ctrl_c, KeyMode::Editor), Some(AppAction::Quit));
    }
}
