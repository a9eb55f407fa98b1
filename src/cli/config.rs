//! `parley set`, `parley unset` and `parley config`.

use std::error::Error;
use std::path::Path;

use crate::core::config::{path_display, Config, ConfigKey};

/// Validate and persist one value, returning the normalized form stored.
pub fn set_value_at(path: &Path, key: &str, value: &str) -> Result<String, Box<dyn Error>> {
    let key = key.parse::<ConfigKey>()?;
    if value.trim().is_empty() {
        return Err(format!("A value is required for {key}").into());
    }
    let mut config = Config::load_from_path(path)?;
    let stored = config.set_value(key, value)?;
    config.save_to_path(path)?;
    Ok(stored)
}

pub fn unset_value_at(path: &Path, key: &str) -> Result<ConfigKey, Box<dyn Error>> {
    let key = key.parse::<ConfigKey>()?;
    let mut config = Config::load_from_path(path)?;
    config.unset_value(key);
    config.save_to_path(path)?;
    Ok(key)
}

pub fn set_config_value(key: &str, value: &[String]) -> Result<(), Box<dyn Error>> {
    let path = Config::get_config_path()?;
    let stored = set_value_at(&path, key, &value.join(" "))?;
    println!("✅ Set {} to: {stored}", key.trim().to_ascii_lowercase());
    Ok(())
}

pub fn unset_config_value(key: &str) -> Result<(), Box<dyn Error>> {
    let path = Config::get_config_path()?;
    let key = unset_value_at(&path, key)?;
    println!("✅ Unset {key}");
    Ok(())
}

pub fn show_config() -> Result<(), Box<dyn Error>> {
    let path = Config::get_config_path()?;
    let config = Config::load_from_path(&path)?;
    println!("Config file: {}", path_display(&path));
    config.print_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_then_unset_round_trips_through_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let stored = set_value_at(&path, "default-persona", "Nineties-Pal").expect("set");
        assert_eq!(stored, "nineties-pal");
        let stored = set_value_at(&path, "temperature", "1.04").expect("set");
        assert_eq!(stored, "1.0");

        let config = Config::load_from_path(&path).expect("load");
        assert_eq!(config.default_persona.as_deref(), Some("nineties-pal"));
        assert_eq!(config.temperature, Some(1.0));

        let key = unset_value_at(&path, "temperature").expect("unset");
        assert_eq!(key, ConfigKey::Temperature);
        let config = Config::load_from_path(&path).expect("load");
        assert_eq!(config.temperature, None);
        assert_eq!(config.default_persona.as_deref(), Some("nineties-pal"));
    }

    #[test]
    fn invalid_values_leave_file_untouched() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");

        assert!(set_value_at(&path, "max-tokens", "10").is_err());
        assert!(set_value_at(&path, "default-model", "gpt-2").is_err());
        assert!(set_value_at(&path, "colour", "blue").is_err());
        assert!(set_value_at(&path, "temperature", "  ").is_err());
        assert!(!path.exists());
    }
}
