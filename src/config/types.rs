//! Core configuration types.

use super::defaults::{default_bot_name, default_log_filter, default_true};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity.
    pub bot: BotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Plugin selection and per-plugin tables.
    #[serde(default)]
    pub plugins: PluginsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Application id the command catalog belongs to.
    #[serde(default)]
    pub application_id: String,
    /// Sync commands to this guild only instead of globally.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Upload the command catalog on startup.
    #[serde(default = "default_true")]
    pub sync_commands: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            application_id: String::new(),
            guild_id: None,
            sync_commands: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// `[plugins]` section.
///
/// Every `[plugins.<name>]` table is collected into `settings` and handed to
/// that plugin when it initializes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginsConfig {
    /// Names of plugins to skip.
    #[serde(default)]
    pub disabled: Vec<String>,
    #[serde(flatten)]
    pub settings: HashMap<String, toml::Table>,
}

impl PluginsConfig {
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|disabled| disabled == name)
    }

    /// Config table for `name`, empty when absent.
    pub fn table(&self, name: &str) -> toml::Table {
        self.settings.get(name).cloned().unwrap_or_default()
    }
}
