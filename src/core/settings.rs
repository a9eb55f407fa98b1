//! Generation parameters chosen in the sidebar: model, temperature and
//! maximum reply length.

use std::fmt;
use std::str::FromStr;

pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 1.5;
pub const TEMPERATURE_STEP: f32 = 0.1;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const MAX_TOKENS_MIN: u32 = 64;
pub const MAX_TOKENS_MAX: u32 = 4096;
pub const MAX_TOKENS_STEP: u32 = 64;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

// Temperature is kept in tenths so repeated stepping never drifts.
const TEMPERATURE_TENTHS_MAX: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelChoice {
    #[default]
    Gpt4oMini,
    Gpt4o,
    Gpt41Mini,
}

impl ModelChoice {
    pub const ALL: [ModelChoice; 3] = [
        ModelChoice::Gpt4oMini,
        ModelChoice::Gpt4o,
        ModelChoice::Gpt41Mini,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ModelChoice::Gpt4oMini => "gpt-4o-mini",
            ModelChoice::Gpt4o => "gpt-4o",
            ModelChoice::Gpt41Mini => "gpt-4.1-mini",
        }
    }

    pub fn next(self) -> ModelChoice {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelChoice {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|model| model.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SettingsError::UnknownModel(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    UnknownModel(String),
    TemperatureOutOfRange(f32),
    MaxTokensOutOfRange(u32),
    InvalidNumber(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownModel(model) => {
                let available: Vec<&str> = ModelChoice::ALL.iter().map(|m| m.id()).collect();
                write!(
                    f,
                    "Model '{}' is not available. Choose one of: {}",
                    model,
                    available.join(", ")
                )
            }
            SettingsError::TemperatureOutOfRange(value) => write!(
                f,
                "Temperature {value} is out of range ({TEMPERATURE_MIN:.1} to {TEMPERATURE_MAX:.1})"
            ),
            SettingsError::MaxTokensOutOfRange(value) => write!(
                f,
                "Max tokens {value} is out of range ({MAX_TOKENS_MIN} to {MAX_TOKENS_MAX})"
            ),
            SettingsError::InvalidNumber(raw) => write!(f, "'{raw}' is not a valid number"),
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    model: ModelChoice,
    temperature_tenths: u8,
    max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: ModelChoice::default(),
            temperature_tenths: (DEFAULT_TEMPERATURE * 10.0).round() as u8,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl GenerationSettings {
    pub fn model(&self) -> ModelChoice {
        self.model
    }

    pub fn temperature(&self) -> f32 {
        f32::from(self.temperature_tenths) / 10.0
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn set_model(&mut self, model: ModelChoice) {
        self.model = model;
    }

    pub fn cycle_model(&mut self) -> ModelChoice {
        self.model = self.model.next();
        self.model
    }

    /// Set the temperature, snapping to the nearest 0.1 step.
    pub fn set_temperature(&mut self, value: f32) -> Result<(), SettingsError> {
        if !value.is_finite() || !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&value) {
            return Err(SettingsError::TemperatureOutOfRange(value));
        }
        self.temperature_tenths = ((value * 10.0).round() as u8).min(TEMPERATURE_TENTHS_MAX);
        Ok(())
    }

    /// Set the reply length limit, snapping to the nearest multiple of 64.
    pub fn set_max_tokens(&mut self, value: u32) -> Result<(), SettingsError> {
        if !(MAX_TOKENS_MIN..=MAX_TOKENS_MAX).contains(&value) {
            return Err(SettingsError::MaxTokensOutOfRange(value));
        }
        let steps = (value + MAX_TOKENS_STEP / 2) / MAX_TOKENS_STEP;
        self.max_tokens = (steps * MAX_TOKENS_STEP).clamp(MAX_TOKENS_MIN, MAX_TOKENS_MAX);
        Ok(())
    }

    /// Move the temperature by whole steps, saturating at the range ends.
    pub fn step_temperature(&mut self, steps: i32) -> f32 {
        let tenths = i32::from(self.temperature_tenths) + steps;
        self.temperature_tenths = tenths.clamp(0, i32::from(TEMPERATURE_TENTHS_MAX)) as u8;
        self.temperature()
    }

    /// Move the reply length limit by whole steps, saturating at the range ends.
    pub fn step_max_tokens(&mut self, steps: i32) -> u32 {
        let value = i64::from(self.max_tokens) + i64::from(steps) * i64::from(MAX_TOKENS_STEP);
        self.max_tokens =
            value.clamp(i64::from(MAX_TOKENS_MIN), i64::from(MAX_TOKENS_MAX)) as u32;
        self.max_tokens
    }
}

pub fn parse_temperature(raw: &str) -> Result<f32, SettingsError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| SettingsError::InvalidNumber(raw.trim().to_string()))
}

pub fn parse_max_tokens(raw: &str) -> Result<u32, SettingsError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| SettingsError::InvalidNumber(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sidebar_initial_values() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.model(), ModelChoice::Gpt4oMini);
        assert!((settings.temperature() - 0.7).abs() < f32::EPSILON);
        assert_eq!(settings.max_tokens(), 1024);
    }

    #[test]
    fn model_ids_parse_and_cycle() {
        assert_eq!("GPT-4o".parse::<ModelChoice>(), Ok(ModelChoice::Gpt4o));
        assert!(matches!(
            "gpt-3.5-turbo".parse::<ModelChoice>(),
            Err(SettingsError::UnknownModel(_))
        ));

        let mut settings = GenerationSettings::default();
        assert_eq!(settings.cycle_model(), ModelChoice::Gpt4o);
        assert_eq!(settings.cycle_model(), ModelChoice::Gpt41Mini);
        assert_eq!(settings.cycle_model(), ModelChoice::Gpt4oMini);
    }

    #[test]
    fn temperature_steps_saturate_without_drift() {
        let mut settings = GenerationSettings::default();
        for _ in 0..20 {
            settings.step_temperature(1);
        }
        assert_eq!(settings.temperature(), 1.5);
        for _ in 0..30 {
            settings.step_temperature(-1);
        }
        assert_eq!(settings.temperature(), 0.0);
        settings.step_temperature(3);
        assert!((settings.temperature() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn temperature_outside_range_is_rejected() {
        let mut settings = GenerationSettings::default();
        assert!(settings.set_temperature(1.6).is_err());
        assert!(settings.set_temperature(-0.1).is_err());
        assert!(settings.set_temperature(f32::NAN).is_err());
        settings.set_temperature(1.24).expect("in range");
        assert!((settings.temperature() - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn max_tokens_snap_to_step_and_saturate() {
        let mut settings = GenerationSettings::default();
        settings.set_max_tokens(100).expect("in range");
        assert_eq!(settings.max_tokens(), 128);
        settings.set_max_tokens(64).expect("in range");
        assert_eq!(settings.max_tokens(), 64);
        assert_eq!(settings.step_max_tokens(-1), 64);
        assert_eq!(settings.step_max_tokens(100), 4096);
        assert!(settings.set_max_tokens(8192).is_err());
        assert!(settings.set_max_tokens(10).is_err());
    }

    #[test]
    fn number_parsing_reports_raw_text() {
        assert_eq!(parse_temperature(" 0.4 "), Ok(0.4));
        assert_eq!(parse_max_tokens("512"), Ok(512));
        assert_eq!(
            parse_max_tokens("lots"),
            Err(SettingsError::InvalidNumber("lots".to_string()))
        );
    }
}
