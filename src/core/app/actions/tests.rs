use super::*;
use crate::core::chat_stream::StreamErrorKind;
use crate::core::message::Role;
use crate::core::session::HISTORY_WINDOW;
use crate::core::settings::ModelChoice;
use crate::utils::test_utils::{complete_test_turn, create_test_app};
use tempfile::TempDir;

fn submit(app: &mut App, message: &str) -> Option<StreamParams> {
    match apply_action(
        app,
        AppAction::SubmitMessage {
            message: message.to_string(),
        },
    ) {
        Some(AppCommand::SpawnStream(params)) => Some(params),
        None => None,
    }
}

fn network_error() -> StreamError {
    StreamError::new(StreamErrorKind::Network, "connection reset")
}

#[test]
fn submit_builds_request_from_persona_and_settings() {
    let mut app = create_test_app();
    app.settings.set_model(ModelChoice::Gpt4o);
    app.settings.step_temperature(2);
    app.settings.step_max_tokens(-1);

    let params = submit(&mut app, "Hello").expect("stream should start");

    assert_eq!(params.base_url, "https://api.test.com");
    assert_eq!(params.api_key, "test-key");
    assert_eq!(params.request.model, "gpt-4o");
    assert!(params.request.stream);
    assert!((params.request.temperature - 0.9).abs() < 1e-6);
    assert_eq!(params.request.max_tokens, 960);

    let messages = &params.request.messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(
        messages[0].content,
        app.session.persona().instructions().to_string()
    );
    assert_eq!(messages[1].role, "user");
    assert_eq!(messages[1].content, "Hello");
    assert!(app.is_streaming());
}

#[test]
fn completed_stream_commits_accumulated_reply() {
    let mut app = create_test_app();
    submit(&mut app, "Hello").expect("stream should start");

    for piece in ["Hi", " there", "!"] {
        apply_action(
            &mut app,
            AppAction::AppendResponseChunk {
                content: piece.to_string(),
            },
        );
    }
    assert_eq!(
        app.ui.pending.as_ref().map(|p| p.text.as_str()),
        Some("Hi there!")
    );

    apply_action(&mut app, AppAction::StreamCompleted);

    assert!(!app.is_streaming());
    let history = app.session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role(), Role::Assistant);
    assert_eq!(history[1].content(), "Hi there!");
}

#[test]
fn stream_error_rolls_back_turn_and_restores_prompt() {
    let mut app = create_test_app();
    complete_test_turn(&mut app, "first", "reply");

    submit(&mut app, "second").expect("stream should start");
    apply_action(
        &mut app,
        AppAction::AppendResponseChunk {
            content: "half an ans".to_string(),
        },
    );
    apply_action(
        &mut app,
        AppAction::StreamErrored {
            error: network_error(),
        },
    );

    assert_eq!(app.session.history().len(), 2);
    assert!(!app.is_streaming());
    assert!(!app.session.turn_in_progress());
    assert_eq!(app.ui.input_text(), "second");

    let failed = app.ui.failed_turn.as_ref().expect("failure is shown");
    assert_eq!(failed.prompt, "second");
    assert_eq!(failed.partial, "half an ans");
    assert_eq!(failed.error.kind, StreamErrorKind::Network);
}

#[test]
fn next_submission_clears_previous_failure() {
    let mut app = create_test_app();
    submit(&mut app, "Hello").expect("stream should start");
    apply_action(
        &mut app,
        AppAction::StreamErrored {
            error: network_error(),
        },
    );
    assert!(app.ui.failed_turn.is_some());

    app.ui.clear_input();
    complete_test_turn(&mut app, "Hello again", "Hi");
    assert!(app.ui.failed_turn.is_none());
    assert_eq!(app.session.history().len(), 2);
}

#[test]
fn only_one_turn_runs_at_a_time() {
    let mut app = create_test_app();
    submit(&mut app, "one").expect("stream should start");
    assert!(submit(&mut app, "two").is_none());
    assert_eq!(app.session.history().len(), 1);
    assert_eq!(
        app.ui.status.as_deref(),
        Some("Wait for the current response to finish")
    );
}

#[test]
fn submit_input_keeps_text_while_streaming() {
    let mut app = create_test_app();
    submit(&mut app, "one").expect("stream should start");
    app.ui.set_input("queued");

    assert!(apply_action(&mut app, AppAction::SubmitInput).is_none());
    assert_eq!(app.ui.input_text(), "queued");
}

#[test]
fn blank_input_is_ignored() {
    let mut app = create_test_app();
    app.ui.set_input("   \n  ");
    assert!(apply_action(&mut app, AppAction::SubmitInput).is_none());
    assert!(app.session.is_empty());
    assert!(submit(&mut app, "").is_none());
    assert!(!app.is_streaming());
}

#[test]
fn submit_input_sends_text_and_clears_box() {
    let mut app = create_test_app();
    app.ui.set_input("What is Rust?");
    let command = apply_action(&mut app, AppAction::SubmitInput);
    assert!(matches!(command, Some(AppCommand::SpawnStream(_))));
    assert_eq!(app.ui.input_text(), "");
    assert_eq!(app.session.history()[0].content(), "What is Rust?");
}

#[test]
fn slash_command_input_does_not_start_a_turn() {
    let mut app = create_test_app();
    app.ui.set_input("/temperature 1.2");
    assert!(apply_action(&mut app, AppAction::SubmitInput).is_none());
    assert!(app.session.is_empty());
    assert!((app.settings.temperature() - 1.2).abs() < 1e-6);
}

#[test]
fn request_window_is_capped_after_many_turns() {
    let mut app = create_test_app();
    for i in 0..15 {
        complete_test_turn(&mut app, &format!("q{i}"), &format!("a{i}"));
    }
    let params = submit(&mut app, "last").expect("stream should start");
    assert_eq!(params.request.messages.len(), HISTORY_WINDOW + 1);
    assert_eq!(params.request.messages[0].role, "system");
    assert_eq!(
        params.request.messages.last().map(|m| m.content.as_str()),
        Some("last")
    );
}

#[test]
fn persona_switch_clears_history() {
    let mut app = create_test_app();
    complete_test_turn(&mut app, "Hello", "Hi");

    apply_action(&mut app, AppAction::CyclePersona);

    assert_eq!(app.session.persona(), Persona::NinetiesPal);
    assert!(app.session.is_empty());

    let params = submit(&mut app, "Hi").expect("stream should start");
    assert_eq!(
        params.request.messages[0].content,
        Persona::NinetiesPal.instructions().to_string()
    );
    assert_eq!(params.request.messages.len(), 2);
}

#[test]
fn persona_switch_is_refused_while_streaming() {
    let mut app = create_test_app();
    submit(&mut app, "Hello").expect("stream should start");

    apply_action(
        &mut app,
        AppAction::SelectPersona {
            persona: Persona::CalmLibrarian,
        },
    );

    assert_eq!(app.session.persona(), Persona::FriendlyMentor);
    assert_eq!(app.session.history().len(), 1);
    assert!(app.is_streaming());
}

#[test]
fn reset_restores_default_persona_and_keeps_settings() {
    let mut app = create_test_app();
    apply_action(
        &mut app,
        AppAction::SelectPersona {
            persona: Persona::CalmLibrarian,
        },
    );
    apply_action(&mut app, AppAction::CycleModel);
    complete_test_turn(&mut app, "Hello", "Hi");

    apply_action(&mut app, AppAction::ResetSession);

    assert!(app.session.is_empty());
    assert_eq!(app.session.persona(), Persona::FriendlyMentor);
    assert_eq!(app.settings.model(), ModelChoice::Gpt4o);
}

#[test]
fn settings_steps_saturate() {
    let mut app = create_test_app();
    apply_action(&mut app, AppAction::StepTemperature { steps: 100 });
    apply_action(&mut app, AppAction::StepMaxTokens { steps: -100 });
    assert!((app.settings.temperature() - 1.5).abs() < 1e-6);
    assert_eq!(app.settings.max_tokens(), 64);
    assert_eq!(app.ui.status.as_deref(), Some("Max tokens: 64"));
}

#[test]
fn export_of_empty_history_reports_and_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out.md");
    let mut app = create_test_app();

    apply_action(
        &mut app,
        AppAction::ExportTranscript {
            filename: Some(path.display().to_string()),
        },
    );

    assert!(!path.exists());
    let status = app.ui.status.clone().unwrap_or_default();
    assert!(status.contains("empty"), "status was {status:?}");
}

#[test]
fn export_writes_history_to_requested_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out.md");
    let mut app = create_test_app();
    complete_test_turn(&mut app, "Hello", "Hi there!");

    apply_action(
        &mut app,
        AppAction::ExportTranscript {
            filename: Some(path.display().to_string()),
        },
    );

    let written = std::fs::read_to_string(&path).expect("export file");
    assert_eq!(written, "**user**: Hello\n\n**assistant**: Hi there!");
    assert!(app
        .ui
        .status
        .as_deref()
        .is_some_and(|s| s.starts_with("Saved 2 messages")));
}

#[test]
fn export_is_refused_while_a_reply_streams() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out.md");
    let mut app = create_test_app();
    complete_test_turn(&mut app, "Hello", "Hi");
    submit(&mut app, "pending question").expect("turn should start");

    apply_action(
        &mut app,
        AppAction::ExportTranscript {
            filename: Some(path.display().to_string()),
        },
    );

    assert!(!path.exists());
    assert_eq!(
        app.ui.status.as_deref(),
        Some("Wait for the current response to finish before exporting")
    );

    apply_action(
        &mut app,
        AppAction::StreamErrored {
            error: network_error(),
        },
    );
    apply_action(
        &mut app,
        AppAction::ExportTranscript {
            filename: Some(path.display().to_string()),
        },
    );

    let written = std::fs::read_to_string(&path).expect("export file");
    assert_eq!(written, "**user**: Hello\n\n**assistant**: Hi");
    assert_eq!(app.session.history().len(), 2);
}

#[test]
fn quit_sets_exit_flag() {
    let mut app = create_test_app();
    let commands = apply_actions(&mut app, [AppAction::ScrollUp { lines: 3 }, AppAction::Quit]);
    assert!(commands.is_empty());
    assert!(app.ui.exit_requested);
    assert!(!app.ui.auto_scroll);
}
