use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::persona::Persona;
use crate::core::settings::{parse_max_tokens, parse_temperature, GenerationSettings, ModelChoice};

/// Values read from `config.toml`. Every field is optional; unset fields fall
/// back to the built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub default_model: Option<String>,
    pub default_persona: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Keys accepted by `parley set` and `parley unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DefaultModel,
    DefaultPersona,
    Temperature,
    MaxTokens,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::DefaultModel,
        ConfigKey::DefaultPersona,
        ConfigKey::Temperature,
        ConfigKey::MaxTokens,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::DefaultModel => "default-model",
            ConfigKey::DefaultPersona => "default-persona",
            ConfigKey::Temperature => "temperature",
            ConfigKey::MaxTokens => "max-tokens",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.name()).collect();
                format!("Unknown config key: {s}. Known keys: {}", names.join(", "))
            })
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn persona(&self) -> Result<Persona, Box<dyn Error>> {
        match self.default_persona.as_deref() {
            Some(id) => Ok(id.parse::<Persona>()?),
            None => Ok(Persona::default()),
        }
    }

    /// Build generation settings from the stored values. A value that no
    /// longer validates is an error rather than being silently ignored.
    pub fn generation_settings(&self) -> Result<GenerationSettings, Box<dyn Error>> {
        let mut settings = GenerationSettings::default();
        if let Some(model) = self.default_model.as_deref() {
            settings.set_model(model.parse::<ModelChoice>()?);
        }
        if let Some(temperature) = self.temperature {
            settings.set_temperature(temperature as f32)?;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.set_max_tokens(max_tokens)?;
        }
        Ok(settings)
    }

    /// Validate and store a value, returning the normalized form that was
    /// written.
    pub fn set_value(&mut self, key: ConfigKey, raw: &str) -> Result<String, Box<dyn Error>> {
        let mut candidate = GenerationSettings::default();
        let stored = match key {
            ConfigKey::DefaultModel => {
                let model = raw.parse::<ModelChoice>()?;
                self.default_model = Some(model.id().to_string());
                model.id().to_string()
            }
            ConfigKey::DefaultPersona => {
                let persona = raw.parse::<Persona>()?;
                self.default_persona = Some(persona.id().to_string());
                persona.id().to_string()
            }
            ConfigKey::Temperature => {
                candidate.set_temperature(parse_temperature(raw)?)?;
                self.temperature = Some((f64::from(candidate.temperature()) * 10.0).round() / 10.0);
                format!("{:.1}", candidate.temperature())
            }
            ConfigKey::MaxTokens => {
                candidate.set_max_tokens(parse_max_tokens(raw)?)?;
                self.max_tokens = Some(candidate.max_tokens());
                candidate.max_tokens().to_string()
            }
        };
        Ok(stored)
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::DefaultModel => self.default_model = None,
            ConfigKey::DefaultPersona => self.default_persona = None,
            ConfigKey::Temperature => self.temperature = None,
            ConfigKey::MaxTokens => self.max_tokens = None,
        }
    }
}
