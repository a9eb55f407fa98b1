use crate::core::app::AppAction;
use crate::core::chat_stream::{CompletionStream, StreamMessage};

/// Drain whatever the active stream has buffered into actions.
///
/// Consecutive fragments are merged into one append so a burst costs a
/// single redraw. The stream is dropped once it reports a terminal item.
pub fn drain_stream(active: &mut Option<CompletionStream>, actions: &mut Vec<AppAction>) -> bool {
    let Some(stream) = active.as_mut() else {
        return false;
    };

    let mut received_any = false;
    let mut pending_text = String::new();

    while let Some(message) = stream.try_next() {
        received_any = true;
        match message {
            StreamMessage::Chunk(text) => pending_text.push_str(&text),
            StreamMessage::End => {
                flush_text(&mut pending_text, actions);
                actions.push(AppAction::StreamCompleted);
            }
            StreamMessage::Error(error) => {
                flush_text(&mut pending_text, actions);
                actions.push(AppAction::StreamErrored { error });
            }
        }
    }
    flush_text(&mut pending_text, actions);

    if stream.is_finished() {
        *active = None;
    }
    received_any
}

fn flush_text(pending_text: &mut String, actions: &mut Vec<AppAction>) {
    if !pending_text.is_empty() {
        actions.push(AppAction::AppendResponseChunk {
            content: std::mem::take(pending_text),
        });
    }
}
