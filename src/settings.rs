use anyhow::{anyhow, Result};
use log::info;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::PathBuf;

use crate::auth::session::DEFAULT_UNIVERSITY;

/// Lowest minimum-compatibility preference that can be set, anything below clears it
pub const MIN_COMPATIBILITY_FLOOR: u8 = 50;
pub const COMPATIBILITY_STEP: u8 = 5;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct MatchPreferences {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_compatibility: Option<u8>,
}

impl MatchPreferences {
    /// Raise the threshold by one step, starting from the floor when unset.
    pub fn raise(&mut self) {
        self.min_compatibility = Some(match self.min_compatibility {
            None => MIN_COMPATIBILITY_FLOOR,
            Some(v) => v.saturating_add(COMPATIBILITY_STEP).min(100),
        });
    }

    /// Lower the threshold by one step; going below the floor clears it.
    pub fn lower(&mut self) {
        self.min_compatibility = match self.min_compatibility {
            Some(v) if v >= MIN_COMPATIBILITY_FLOOR + COMPATIBILITY_STEP => Some(v - COMPATIBILITY_STEP),
            _ => None,
        };
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccountSettings {
    pub name: String,
    pub email: String,
    #[serde(default = "default_university")]
    pub university: String,
    #[serde(default)]
    pub match_preferences: MatchPreferences,
}

fn default_university() -> String {
    DEFAULT_UNIVERSITY.to_string()
}

impl AccountSettings {
    pub fn new(name: &str, email: &str) -> Self {
        AccountSettings {
            name: name.to_string(),
            email: email.to_string(),
            university: default_university(),
            match_preferences: MatchPreferences::default(),
        }
    }

    /// Name shown in the UI: the saved name, or the local part of the email.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return self.name.trim();
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

static CONFIG_DIR_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Point settings at a different directory. Only the first call takes effect.
pub fn set_config_dir_override(dir: PathBuf) -> bool {
    CONFIG_DIR_OVERRIDE.set(dir).is_ok()
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match CONFIG_DIR_OVERRIDE.get() {
        Some(dir) => dir.clone(),
        None => dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join("friendbridge"),
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn get_settings_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("settings.json"))
}

pub fn save_settings(settings: &AccountSettings) -> Result<()> {
    save_settings_to(&get_settings_path()?, settings)
}

pub fn load_settings() -> Result<Option<AccountSettings>> {
    load_settings_from(&get_settings_path()?)
}

pub fn save_settings_to(path: &std::path::Path, settings: &AccountSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, settings)?;

    info!("Settings saved for {} to {}", settings.email, path.display());
    Ok(())
}

pub fn load_settings_from(path: &std::path::Path) -> Result<Option<AccountSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let settings: AccountSettings = serde_json::from_str(&contents)?;
    info!("Loaded settings for {} from {}", settings.email, path.display());

    Ok(Some(settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_and_lower_preference() {
        let mut prefs = MatchPreferences::default();
        prefs.lower();
        assert_eq!(prefs.min_compatibility, None);

        prefs.raise();
        assert_eq!(prefs.min_compatibility, Some(50));
        prefs.raise();
        assert_eq!(prefs.min_compatibility, Some(55));

        prefs.lower();
        prefs.lower();
        assert_eq!(prefs.min_compatibility, None);
    }

    #[test]
    fn test_preference_capped_at_100() {
        let mut prefs = MatchPreferences { min_compatibility: Some(98) };
        prefs.raise();
        assert_eq!(prefs.min_compatibility, Some(100));
        prefs.raise();
        assert_eq!(prefs.min_compatibility, Some(100));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut settings = AccountSettings::new("", "testudo.9@osu.edu");
        assert_eq!(settings.display_name(), "testudo.9");
        settings.name = "Testudo".to_string();
        assert_eq!(settings.display_name(), "Testudo");
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let settings: AccountSettings =
            serde_json::from_str(r#"{"name":"Brutus","email":"brutus.1@osu.edu"}"#).unwrap();
        assert_eq!(settings.university, DEFAULT_UNIVERSITY);
        assert_eq!(settings.match_preferences.min_compatibility, None);
    }
}
