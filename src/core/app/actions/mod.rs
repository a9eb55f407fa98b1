mod input;
mod selection;
mod streaming;

use super::App;
use crate::core::chat_stream::{StreamError, StreamParams};
use crate::core::persona::Persona;
use crate::core::settings::ModelChoice;

pub enum AppAction {
    AppendResponseChunk { content: String },
    StreamErrored { error: StreamError },
    StreamCompleted,
    SubmitInput,
    SubmitMessage { message: String },
    ProcessCommand { input: String },
    SetStatus { message: String },
    ClearStatus,
    SelectPersona { persona: Persona },
    CyclePersona,
    SelectModel { model: ModelChoice },
    CycleModel,
    StepTemperature { steps: i32 },
    StepMaxTokens { steps: i32 },
    ResetSession,
    ExportTranscript { filename: Option<String> },
    ScrollUp { lines: u16 },
    ScrollDown { lines: u16 },
    ScrollToBottom,
    Quit,
}

pub enum AppCommand {
    SpawnStream(StreamParams),
}

pub fn apply_actions(
    app: &mut App,
    actions: impl IntoIterator<Item = AppAction>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::AppendResponseChunk { .. }
        | AppAction::StreamErrored { .. }
        | AppAction::StreamCompleted
        | AppAction::SubmitMessage { .. } => streaming::handle_streaming_action(app, action),

        AppAction::SubmitInput
        | AppAction::ProcessCommand { .. }
        | AppAction::SetStatus { .. }
        | AppAction::ClearStatus
        | AppAction::ScrollUp { .. }
        | AppAction::ScrollDown { .. }
        | AppAction::ScrollToBottom
        | AppAction::Quit => input::handle_input_action(app, action),

        AppAction::SelectPersona { .. }
        | AppAction::CyclePersona
        | AppAction::SelectModel { .. }
        | AppAction::CycleModel
        | AppAction::StepTemperature { .. }
        | AppAction::StepMaxTokens { .. }
        | AppAction::ResetSession
        | AppAction::ExportTranscript { .. } => selection::handle_selection_action(app, action),
    }
}

#[cfg(test)]
mod tests;
