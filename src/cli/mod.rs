//! Command-line interface parsing and handling
//!
//! This module parses arguments, resolves the startup settings and dispatches
//! to the chat UI or one of the one-shot commands.

pub mod config;
pub mod listing;
pub mod say;
pub mod version;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::config::{set_config_value, show_config, unset_config_value};
use crate::cli::listing::{list_models, list_personas};
use crate::cli::say::run_say;
use crate::cli::version::print_version;
use crate::core::app::AppInitConfig;
use crate::core::config::{ApiCredentials, Config};
use crate::core::persona::Persona;
use crate::core::settings::{parse_max_tokens, parse_temperature, GenerationSettings, ModelChoice};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_file_logging, init_stderr_logging};

#[derive(Parser)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "A small terminal chat front-end for OpenAI-compatible APIs")]
#[command(
    long_about = "Parley is a terminal chat interface with a fixed set of personas. \
Replies stream in as they are generated; the last 20 messages are sent as context. \
Switching persona starts a fresh conversation.\n\n\
Environment Variables (a .env file in the working directory is loaded first):\n\
  OPENAI_API_KEY    Your OpenAI API key (required)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  F2                Cycle model\n\
  F3 / F4           Lower / raise temperature\n\
  F5 / F6           Lower / raise max tokens\n\
  F7 / F8           Cycle persona / reset conversation\n\
  Ctrl+S            Export the conversation to chat_history.md\n\
  PageUp/PageDown   Scroll through chat history\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show commands and key bindings"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use (gpt-4o-mini, gpt-4o, gpt-4.1-mini)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Persona to start with (see `parley personas`)
    #[arg(long, global = true, value_name = "ID")]
    pub persona: Option<String>,

    /// Sampling temperature, 0.0 to 1.5
    #[arg(short = 't', long, global = true, value_name = "TEMP")]
    pub temperature: Option<String>,

    /// Reply length limit, 64 to 4096
    #[arg(long = "max-tokens", global = true, value_name = "N")]
    pub max_tokens: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the streamed reply without the UI
    Say {
        /// The message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List available personas
    Personas,
    /// List available models
    Models,
    /// Set configuration values
    Set {
        /// Configuration key (default-model, default-persona, temperature, max-tokens)
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
    /// Show build information
    Version,
}

/// Startup persona and settings: built-in defaults, overridden by the config
/// file, overridden by command-line flags.
pub fn resolve_startup(
    args: &Args,
    config: &Config,
) -> Result<(Persona, GenerationSettings), Box<dyn Error>> {
    let mut persona = config.persona()?;
    let mut settings = config.generation_settings()?;

    if let Some(id) = args.persona.as_deref() {
        persona = id.parse::<Persona>()?;
    }
    if let Some(model) = args.model.as_deref() {
        settings.set_model(model.parse::<ModelChoice>()?);
    }
    if let Some(raw) = args.temperature.as_deref() {
        settings.set_temperature(parse_temperature(raw)?)?;
    }
    if let Some(raw) = args.max_tokens.as_deref() {
        settings.set_max_tokens(parse_max_tokens(raw)?)?;
    }

    Ok((persona, settings))
}

fn load_credentials_or_exit() -> ApiCredentials {
    match ApiCredentials::from_env() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let is_chat = matches!(args.command, None | Some(Commands::Chat));
    match args.log_file.as_deref() {
        Some(path) => init_file_logging(path)?,
        None if !is_chat => init_stderr_logging(),
        None => {}
    }

    match &args.command {
        None | Some(Commands::Chat) => {
            let config = Config::load()?;
            let (persona, settings) = resolve_startup(&args, &config)?;
            let credentials = load_credentials_or_exit();
            run_chat(AppInitConfig {
                credentials,
                settings,
                persona,
            })
            .await
        }
        Some(Commands::Say { prompt }) => {
            let config = Config::load()?;
            let (persona, settings) = resolve_startup(&args, &config)?;
            let credentials = load_credentials_or_exit();
            run_say(prompt.clone(), persona, settings, credentials).await
        }
        Some(Commands::Personas) => {
            let config = Config::load()?;
            list_personas(config.persona()?);
            Ok(())
        }
        Some(Commands::Models) => {
            let config = Config::load()?;
            list_models(config.generation_settings()?.model());
            Ok(())
        }
        Some(Commands::Set { key, value }) => set_config_value(key, value),
        Some(Commands::Unset { key }) => unset_config_value(key),
        Some(Commands::Config) => show_config(),
        Some(Commands::Version) => {
            print_version();
            Ok(())
        }
    }
}
