//! Main chat event loop.
//!
//! Terminal input is read on a background task and forwarded over a channel.
//! The loop turns keys and stream items into [`AppAction`]s, applies them to
//! the [`App`], starts requested streams and redraws when anything changed.

mod keybindings;
mod lifecycle;
mod stream;

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use self::keybindings::{handle_key, KeyResult};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use self::stream::drain_stream;
use crate::core::app::{apply_actions, App, AppAction, AppCommand, AppInitConfig};
use crate::core::chat_stream::{ChatStreamService, CompletionStream};
use crate::ui::renderer::ui;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(init: AppInitConfig) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(init);
    info!(
        persona = app.session.persona().id(),
        model = %app.settings.model(),
        base_url = %app.api.credentials.base_url,
        "starting chat session"
    );

    let mut terminal = setup_terminal()?;
    let (event_tx, event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = event_loop(&mut app, &mut terminal, event_rx).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    info!(messages = app.session.history().len(), "chat session ended");

    result
}

async fn event_loop(
    app: &mut App,
    terminal: &mut ChatTerminal,
    mut event_rx: mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    let stream_service = ChatStreamService::new();
    let mut active_stream: Option<CompletionStream> = None;
    let mut request_redraw = true;

    loop {
        if app.ui.exit_requested {
            return Ok(());
        }

        if request_redraw {
            terminal.draw(|f| ui(f, app))?;
            request_redraw = false;
        }

        let page_lines = (terminal.size()?.height / 2).max(1);
        let mut actions: Vec<AppAction> = Vec::new();
        let mut events_processed = false;

        while let Ok(UiEvent::Crossterm(ev)) = event_rx.try_recv() {
            events_processed = true;
            match ev {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let KeyResult::Action(action) = handle_key(app, key, page_lines) {
                        actions.push(action);
                    }
                }
                Event::Paste(text) => {
                    app.ui
                        .textarea
                        .insert_str(text.replace("\r\n", "\n").replace('\r', "\n"));
                }
                _ => {}
            }
        }

        let received_any = drain_stream(&mut active_stream, &mut actions);
        let actions_applied = !actions.is_empty();

        for cmd in apply_actions(app, actions) {
            match cmd {
                AppCommand::SpawnStream(params) => {
                    debug!("spawning completion stream");
                    active_stream = Some(stream_service.spawn_stream(params));
                }
            }
        }

        if events_processed || received_any || actions_applied {
            request_redraw = true;
        } else {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }
}
