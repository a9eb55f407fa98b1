use tracing::{debug, warn};

use super::{App, AppAction, AppCommand};
use crate::core::app::ui_state::{FailedTurn, PendingReply};
use crate::core::chat_stream::StreamError;
use crate::core::session::SessionError;

pub(super) fn handle_streaming_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::AppendResponseChunk { content } => {
            append_response_chunk(app, &content);
            None
        }
        AppAction::StreamErrored { error } => {
            handle_stream_error(app, error);
            None
        }
        AppAction::StreamCompleted => {
            finalize_stream(app);
            None
        }
        AppAction::SubmitMessage { message } => spawn_stream_for_message(app, message),
        _ => unreachable!("non-streaming action routed to streaming handler"),
    }
}

pub(super) fn spawn_stream_for_message(app: &mut App, message: String) -> Option<AppCommand> {
    if app.is_streaming() {
        app.ui.set_status(SessionError::TurnInProgress.to_string());
        return None;
    }

    let messages = match app.session.begin_turn(&message) {
        Ok(messages) => messages,
        Err(SessionError::EmptyMessage) => return None,
        Err(err) => {
            app.ui.set_status(err.to_string());
            return None;
        }
    };

    app.ui.clear_transient();
    app.ui.pending = Some(PendingReply::new());
    app.ui.auto_scroll = true;
    debug!(
        persona = app.session.persona().id(),
        window = messages.len() - 1,
        "submitting turn"
    );
    Some(AppCommand::SpawnStream(app.build_stream_params(&messages)))
}

fn append_response_chunk(app: &mut App, chunk: &str) {
    if chunk.is_empty() {
        return;
    }
    if let Some(pending) = app.ui.pending.as_mut() {
        pending.text.push_str(chunk);
    }
}

fn handle_stream_error(app: &mut App, error: StreamError) {
    let partial = app
        .ui
        .pending
        .take()
        .map(|pending| pending.text)
        .unwrap_or_default();
    let prompt = match app.session.abandon_turn() {
        Ok(prompt) => prompt,
        Err(err) => {
            warn!("stream error without a pending turn: {err}");
            String::new()
        }
    };

    if !prompt.is_empty() && app.ui.input_text().trim().is_empty() {
        app.ui.set_input(&prompt);
    }
    app.ui
        .set_status("Response failed; your message is back in the input box");
    app.ui.failed_turn = Some(FailedTurn {
        prompt,
        partial,
        error,
    });
    app.ui.auto_scroll = true;
}

fn finalize_stream(app: &mut App) {
    let Some(pending) = app.ui.pending.take() else {
        return;
    };
    let elapsed = pending.started_at.elapsed();
    match app.session.complete_turn(pending.text) {
        Ok(()) => debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            history = app.session.history().len(),
            "turn completed"
        ),
        Err(err) => warn!("discarding reply: {err}"),
    }
}
