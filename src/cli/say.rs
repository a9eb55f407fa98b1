//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::core::app::{apply_action, App, AppAction, AppCommand, AppInitConfig};
use crate::core::chat_stream::{ChatStreamService, CompletionStream, StreamError, StreamMessage};
use crate::core::config::ApiCredentials;
use crate::core::persona::Persona;
use crate::core::settings::GenerationSettings;

pub async fn run_say(
    prompt: Vec<String>,
    persona: Persona,
    settings: GenerationSettings,
    credentials: ApiCredentials,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: parley say <prompt>");
        std::process::exit(1);
    }

    let mut app = App::new(AppInitConfig {
        credentials,
        settings,
        persona,
    });

    let Some(AppCommand::SpawnStream(params)) =
        apply_action(&mut app, AppAction::SubmitMessage { message: prompt })
    else {
        return Err("Could not start the request".into());
    };

    let mut stream = ChatStreamService::new().spawn_stream(params);
    let mut stdout = io::stdout();
    match print_stream(&mut stream, &mut stdout).await? {
        Ok(_) => Ok(()),
        Err(error) => {
            eprintln!("❌ {error}");
            std::process::exit(1);
        }
    }
}

/// Copy fragments to `out` as they arrive, returning the full reply or the
/// error that ended the stream.
pub async fn print_stream<W: Write>(
    stream: &mut CompletionStream,
    out: &mut W,
) -> io::Result<Result<String, StreamError>> {
    let mut reply = String::new();
    while let Some(message) = stream.next().await {
        match message {
            StreamMessage::Chunk(text) => {
                out.write_all(text.as_bytes())?;
                out.flush()?;
                reply.push_str(&text);
            }
            StreamMessage::End => {
                writeln!(out)?;
                return Ok(Ok(reply));
            }
            StreamMessage::Error(error) => {
                if !reply.is_empty() {
                    writeln!(out)?;
                }
                return Ok(Err(error));
            }
        }
    }
    Ok(Ok(reply))
}
