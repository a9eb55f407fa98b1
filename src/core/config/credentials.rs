//! API credentials from the process environment.

use std::fmt;

use tracing::debug;

use crate::api::DEFAULT_BASE_URL;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    MissingApiKey,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::MissingApiKey => write!(
                f,
                "{API_KEY_VAR} is not set.\n\n\
                 Create a .env file in the directory you run parley from containing:\n\
                 {API_KEY_VAR}=sk-...\n\n\
                 or export it in your shell:\n\
                 export {API_KEY_VAR}=\"your-api-key-here\"\n\n\
                 Optionally, point at a compatible endpoint with:\n\
                 export {BASE_URL_VAR}=\"{DEFAULT_BASE_URL}\""
            ),
        }
    }
}

impl std::error::Error for CredentialsError {}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiCredentials {
    /// Read credentials from the environment after loading `.env`, if present.
    pub fn from_env() -> Result<Self, CredentialsError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => debug!("ignoring unreadable .env: {err}"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(CredentialsError::MissingApiKey)?;
        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self { api_key, base_url })
    }
}
