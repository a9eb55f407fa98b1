use std::path::PathBuf;

use tracing::info;

use super::{App, AppAction, AppCommand};
use crate::core::persona::Persona;
use crate::core::transcript::{export_transcript, DEFAULT_EXPORT_FILENAME};

pub(super) fn handle_selection_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SelectPersona { persona } => {
            select_persona(app, persona);
            None
        }
        AppAction::CyclePersona => {
            let next = app.session.persona().next();
            select_persona(app, next);
            None
        }
        AppAction::SelectModel { model } => {
            app.settings.set_model(model);
            app.ui.set_status(format!("Model: {model}"));
            None
        }
        AppAction::CycleModel => {
            let model = app.settings.cycle_model();
            app.ui.set_status(format!("Model: {model}"));
            None
        }
        AppAction::StepTemperature { steps } => {
            let value = app.settings.step_temperature(steps);
            app.ui.set_status(format!("Temperature: {value:.1}"));
            None
        }
        AppAction::StepMaxTokens { steps } => {
            let value = app.settings.step_max_tokens(steps);
            app.ui.set_status(format!("Max tokens: {value}"));
            None
        }
        AppAction::ResetSession => {
            reset_session(app);
            None
        }
        AppAction::ExportTranscript { filename } => {
            export_history(app, filename);
            None
        }
        _ => unreachable!("non-selection action routed to selection handler"),
    }
}

fn select_persona(app: &mut App, persona: Persona) {
    if app.is_streaming() {
        app.ui
            .set_status("Wait for the current response to finish before switching persona");
        return;
    }
    app.session.select_persona(persona);
    app.ui.clear_transient();
    app.ui.scroll_to_bottom();
    app.ui
        .set_status(format!("Persona: {} (history cleared)", persona.display_name()));
    info!(persona = persona.id(), "persona selected");
}

fn reset_session(app: &mut App) {
    if app.is_streaming() {
        app.ui
            .set_status("Wait for the current response to finish before resetting");
        return;
    }
    app.session.reset();
    app.ui.clear_transient();
    app.ui.scroll_to_bottom();
    app.ui.set_status(format!(
        "Conversation reset to {}",
        app.session.persona().display_name()
    ));
    info!("session reset");
}

fn export_history(app: &mut App, filename: Option<String>) {
    if app.is_streaming() {
        app.ui
            .set_status("Wait for the current response to finish before exporting");
        return;
    }
    let path = PathBuf::from(
        filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_EXPORT_FILENAME),
    );
    match export_transcript(app.session.history(), &path) {
        Ok(()) => app.ui.set_status(format!(
            "Saved {} messages to {}",
            app.session.history().len(),
            path.display()
        )),
        Err(err) => app.ui.set_status(err.to_string()),
    }
}
