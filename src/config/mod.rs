//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, BotConfig, LoggingConfig, PluginsConfig)
//! - [`validation`]: Startup checks that report every problem at once
//! - [`defaults`]: serde default functions

pub mod defaults;
mod types;
mod validation;

pub use types::{BotConfig, Config, ConfigError, LoggingConfig, PluginsConfig};
pub use validation::{ValidationError, validate};
