use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl CommandInvocation<'_> {
    pub fn arg(&self) -> Option<&str> {
        let args = self.args.trim();
        (!args.is_empty()).then_some(args)
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show commands and key bindings.",
        handler: super::handle_help,
    },
    Command {
        name: "persona",
        usage: "/persona [id]",
        help: "List personas or switch to one. Switching clears the history.",
        handler: super::handle_persona,
    },
    Command {
        name: "model",
        usage: "/model [id]",
        help: "List models or switch the model used for the next reply.",
        handler: super::handle_model,
    },
    Command {
        name: "temperature",
        usage: "/temperature [0.0-1.5]",
        help: "Show or set the sampling temperature.",
        handler: super::handle_temperature,
    },
    Command {
        name: "max-tokens",
        usage: "/max-tokens [64-4096]",
        help: "Show or set the reply length limit.",
        handler: super::handle_max_tokens,
    },
    Command {
        name: "reset",
        usage: "/reset",
        help: "Clear the history and return to the default persona.",
        handler: super::handle_reset,
    },
    Command {
        name: "export",
        usage: "/export [filename]",
        help: "Save the conversation as markdown (default chat_history.md).",
        handler: super::handle_export,
    },
];
