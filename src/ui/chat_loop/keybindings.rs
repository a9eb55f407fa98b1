//! Key handling for the chat screen.
//!
//! Keys that change application state resolve to an [`AppAction`]; anything
//! else is forwarded to the input box.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction};

pub enum KeyResult {
    Action(AppAction),
    Handled,
    Ignored,
}

pub fn handle_key(app: &mut App, key: KeyEvent, page_lines: u16) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let action = match key.code {
        KeyCode::Char('c') if ctrl => AppAction::Quit,
        KeyCode::Char('s') if ctrl => AppAction::ExportTranscript { filename: None },
        KeyCode::Enter if alt => {
            app.ui.textarea.insert_newline();
            return KeyResult::Handled;
        }
        KeyCode::Enter => AppAction::SubmitInput,
        KeyCode::F(2) => AppAction::CycleModel,
        KeyCode::F(3) => AppAction::StepTemperature { steps: -1 },
        KeyCode::F(4) => AppAction::StepTemperature { steps: 1 },
        KeyCode::F(5) => AppAction::StepMaxTokens { steps: -1 },
        KeyCode::F(6) => AppAction::StepMaxTokens { steps: 1 },
        KeyCode::F(7) => AppAction::CyclePersona,
        KeyCode::F(8) => AppAction::ResetSession,
        KeyCode::PageUp => AppAction::ScrollUp { lines: page_lines },
        KeyCode::PageDown => AppAction::ScrollDown { lines: page_lines },
        KeyCode::F(_) | KeyCode::Esc => return KeyResult::Ignored,
        _ => {
            if app.ui.textarea.input(TAInput::from(key)) {
                return KeyResult::Handled;
            }
            return KeyResult::Ignored;
        }
    };

    KeyResult::Action(action)
}
