use crate::core::app::{App, AppInitConfig};
use crate::core::config::ApiCredentials;
use crate::core::persona::Persona;
use crate::core::settings::GenerationSettings;

pub fn test_credentials() -> ApiCredentials {
    ApiCredentials {
        api_key: "test-key".to_string(),
        base_url: "https://api.test.com".to_string(),
    }
}

pub fn create_test_app() -> App {
    App::new(AppInitConfig {
        credentials: test_credentials(),
        settings: GenerationSettings::default(),
        persona: Persona::default(),
    })
}

/// Run one full turn against the reducer without touching the network.
pub fn complete_test_turn(app: &mut App, prompt: &str, reply: &str) {
    use crate::core::app::{apply_action, AppAction};

    let command = apply_action(
        app,
        AppAction::SubmitMessage {
            message: prompt.to_string(),
        },
    );
    assert!(command.is_some(), "turn should start a stream");
    apply_action(
        app,
        AppAction::AppendResponseChunk {
            content: reply.to_string(),
        },
    );
    apply_action(app, AppAction::StreamCompleted);
}
