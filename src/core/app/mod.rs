//! Application state for one interactive chat session.
//!
//! [`App`] ties together the conversation [`Session`], the generation
//! settings chosen in the sidebar, the API handle and transient UI state.
//! Every handler receives the `App` explicitly; there is no global state.

use crate::api::ChatRequest;
use crate::core::chat_stream::StreamParams;
use crate::core::config::ApiCredentials;
use crate::core::message::Message;
use crate::core::persona::Persona;
use crate::core::session::Session;
use crate::core::settings::GenerationSettings;

pub mod actions;
pub mod ui_state;

pub use actions::{apply_action, apply_actions, AppAction, AppCommand};
pub use ui_state::{FailedTurn, Notice, NoticeKind, PendingReply, UiState};

/// Connection details shared by every request of the session.
pub struct ApiContext {
    pub client: reqwest::Client,
    pub credentials: ApiCredentials,
}

/// Startup values resolved from the CLI, config file and environment.
pub struct AppInitConfig {
    pub credentials: ApiCredentials,
    pub settings: GenerationSettings,
    pub persona: Persona,
}

pub struct App {
    pub session: Session,
    pub settings: GenerationSettings,
    pub api: ApiContext,
    pub ui: UiState,
}

impl App {
    pub fn new(init: AppInitConfig) -> Self {
        Self {
            session: Session::new(init.persona),
            settings: init.settings,
            api: ApiContext {
                client: reqwest::Client::new(),
                credentials: init.credentials,
            },
            ui: UiState::new(),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.ui.pending.is_some()
    }

    pub fn build_stream_params(&self, messages: &[Message]) -> StreamParams {
        StreamParams {
            client: self.api.client.clone(),
            base_url: self.api.credentials.base_url.clone(),
            api_key: self.api.credentials.api_key.clone(),
            request: ChatRequest {
                model: self.settings.model().id().to_string(),
                messages: messages.iter().map(Message::to_api).collect(),
                stream: true,
                temperature: self.settings.temperature(),
                max_tokens: self.settings.max_tokens(),
            },
        }
    }
}
