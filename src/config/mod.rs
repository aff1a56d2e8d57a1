use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::{
    paths,
    persistence::{read_json_optional, write_json_atomic},
};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown config key `{0}`")]
    UnknownKey(String),
    #[error("Invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Persistent user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency_symbol: String,
    pub ui_color_enabled: bool,
    /// Address exposed by the configured wallet provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// Email used for the most recent sign-in; offered as the prompt default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency_symbol: "₹".into(),
            ui_color_enabled: true,
            wallet_address: None,
            last_email: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] = [
        "locale",
        "currency_symbol",
        "ui_color_enabled",
        "wallet_address",
        "last_email",
    ];

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
        vec![
            ("locale", self.locale.clone()),
            ("currency_symbol", self.currency_symbol.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("wallet_address", optional(&self.wallet_address)),
            ("last_email", optional(&self.last_email)),
        ]
    }

    /// Updates one key from its textual form. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        let optional = || (!trimmed.is_empty()).then(|| trimmed.to_string());
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "locale" if !trimmed.is_empty() => self.locale = trimmed.to_string(),
            "currency_symbol" if !trimmed.is_empty() => {
                self.currency_symbol = trimmed.to_string()
            }
            "locale" | "currency_symbol" => return Err(invalid()),
            "ui_color_enabled" => {
                self.ui_color_enabled = match trimmed.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            "wallet_address" => self.wallet_address = optional(),
            "last_email" => self.last_email = optional(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// strftime pattern for calendar dates in the configured locale.
    pub fn date_format(&self) -> &'static str {
        match self.locale.as_str() {
            "en-US" => "%m/%d/%Y",
            "en-IN" | "en-GB" | "fr-FR" | "de-DE" | "es-ES" | "pt-PT" => "%d/%m/%Y",
            _ => "%Y-%m-%d",
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_root = base.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
        })
    }

    /// Returns defaults when no file has been written yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        Ok(read_json_optional::<Config, ConfigError>(&self.path)?.unwrap_or_default())
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        write_json_atomic::<_, ConfigError>(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
