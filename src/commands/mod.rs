mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::app::{apply_action, App, AppAction, NoticeKind};
use crate::core::persona::Persona;
use crate::core::settings::{parse_max_tokens, parse_temperature, ModelChoice};

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        (command.handler)(app, CommandInvocation { args })
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

fn run(app: &mut App, action: AppAction) -> CommandResult {
    // Selection actions never start a stream.
    let _ = apply_action(app, action);
    CommandResult::Continue
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Commands\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<24} {}\n", command.usage, command.help));
    }
    help.push_str("\nKeys\n");
    for (keys, description) in crate::ui::help::KEY_BINDINGS {
        help.push_str(&format!("  {keys:<24} {description}\n"));
    }
    app.ui.show_notice(NoticeKind::Info, help.trim_end());
    CommandResult::Continue
}

pub(super) fn handle_persona(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some(arg) = invocation.arg() else {
        let current = app.session.persona();
        let listing: Vec<String> = Persona::ALL
            .iter()
            .map(|persona| {
                let marker = if *persona == current { "*" } else { " " };
                format!("{marker} {:<16} {}", persona.id(), persona.display_name())
            })
            .collect();
        app.ui
            .show_notice(NoticeKind::Info, format!("Personas\n{}", listing.join("\n")));
        return CommandResult::Continue;
    };

    match arg.parse::<Persona>() {
        Ok(persona) => run(app, AppAction::SelectPersona { persona }),
        Err(message) => {
            app.ui.set_status(message);
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_model(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some(arg) = invocation.arg() else {
        let current = app.settings.model();
        let listing: Vec<String> = ModelChoice::ALL
            .iter()
            .map(|model| {
                let marker = if *model == current { "*" } else { " " };
                format!("{marker} {}", model.id())
            })
            .collect();
        app.ui
            .show_notice(NoticeKind::Info, format!("Models\n{}", listing.join("\n")));
        return CommandResult::Continue;
    };

    match arg.parse::<ModelChoice>() {
        Ok(model) => run(app, AppAction::SelectModel { model }),
        Err(err) => {
            app.ui.set_status(err.to_string());
            CommandResult::Continue
        }
    }
}

pub(super) fn handle_temperature(
    app: &mut App,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let Some(arg) = invocation.arg() else {
        let value = app.settings.temperature();
        app.ui.set_status(format!("Temperature: {value:.1}"));
        return CommandResult::Continue;
    };

    let result = parse_temperature(arg).and_then(|value| app.settings.set_temperature(value));
    match result {
        Ok(()) => {
            let value = app.settings.temperature();
            app.ui.set_status(format!("Temperature: {value:.1}"));
        }
        Err(err) => app.ui.set_status(err.to_string()),
    }
    CommandResult::Continue
}

pub(super) fn handle_max_tokens(
    app: &mut App,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let Some(arg) = invocation.arg() else {
        app.ui
            .set_status(format!("Max tokens: {}", app.settings.max_tokens()));
        return CommandResult::Continue;
    };

    let result = parse_max_tokens(arg).and_then(|value| app.settings.set_max_tokens(value));
    match result {
        Ok(()) => app
            .ui
            .set_status(format!("Max tokens: {}", app.settings.max_tokens())),
        Err(err) => app.ui.set_status(err.to_string()),
    }
    CommandResult::Continue
}

pub(super) fn handle_reset(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    run(app, AppAction::ResetSession)
}

pub(super) fn handle_export(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let filename = invocation.arg().map(str::to_string);
    run(app, AppAction::ExportTranscript { filename })
}
