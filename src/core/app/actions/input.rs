use super::{streaming, App, AppAction, AppCommand};
use crate::commands::{process_input, CommandResult};
use crate::core::session::SessionError;

pub(super) fn handle_input_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SubmitInput => submit_input(app),
        AppAction::ProcessCommand { input } => handle_process_command(app, input),
        AppAction::SetStatus { message } => {
            app.ui.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.ui.clear_status();
            None
        }
        AppAction::ScrollUp { lines } => {
            app.ui.scroll_up(lines);
            None
        }
        AppAction::ScrollDown { lines } => {
            app.ui.scroll_down(lines);
            None
        }
        AppAction::ScrollToBottom => {
            app.ui.scroll_to_bottom();
            None
        }
        AppAction::Quit => {
            app.ui.exit_requested = true;
            None
        }
        _ => unreachable!("non-input action routed to input handler"),
    }
}

fn submit_input(app: &mut App) -> Option<AppCommand> {
    if app.is_streaming() {
        app.ui.set_status(SessionError::TurnInProgress.to_string());
        return None;
    }
    if app.ui.input_text().trim().is_empty() {
        return None;
    }
    let input = app.ui.take_input();
    handle_process_command(app, input)
}

fn handle_process_command(app: &mut App, input: String) -> Option<AppCommand> {
    match process_input(app, &input) {
        CommandResult::Continue => None,
        CommandResult::ProcessAsMessage(message) => {
            streaming::spawn_stream_for_message(app, message)
        }
    }
}
