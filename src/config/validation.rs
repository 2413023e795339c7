//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.name is required")]
    MissingBotName,
    #[error("bot.application_id is required when bot.sync_commands is enabled")]
    MissingApplicationId,
    #[error("bot.application_id must be a numeric id, got '{0}'")]
    InvalidApplicationId(String),
    #[error("bot.guild_id must be a numeric id, got '{0}'")]
    InvalidGuildId(String),
    #[error("logging.filter is invalid: {0}")]
    InvalidLogFilter(String),
    #[error("plugins.disabled contains an empty name")]
    EmptyDisabledPlugin,
}

fn is_snowflake(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bot.name.trim().is_empty() {
        errors.push(ValidationError::MissingBotName);
    }

    // Catalog sync needs somewhere to upload to
    let application_id = &config.bot.application_id;
    if application_id.is_empty() {
        if config.bot.sync_commands {
            errors.push(ValidationError::MissingApplicationId);
        }
    } else if !is_snowflake(application_id) {
        errors.push(ValidationError::InvalidApplicationId(application_id.clone()));
    }

    if let Some(ref guild_id) = config.bot.guild_id
        && !is_snowflake(guild_id)
    {
        errors.push(ValidationError::InvalidGuildId(guild_id.clone()));
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.filter) {
        errors.push(ValidationError::InvalidLogFilter(e.to_string()));
    }

    if config.plugins.disabled.iter().any(|name| name.trim().is_empty()) {
        errors.push(ValidationError::EmptyDisabledPlugin);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.bot.application_id = "1234".into();
        config
    }

    #[test]
    fn test_default_with_application_id_is_valid() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = valid();
        config.bot.name = " ".into();
        config.bot.application_id = "abc".into();
        config.bot.guild_id = Some("".into());
        config.plugins.disabled.push(String::new());

        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::MissingBotName));
        assert!(matches!(errors[1], ValidationError::InvalidApplicationId(_)));
        assert!(matches!(errors[2], ValidationError::InvalidGuildId(_)));
        assert!(matches!(errors[3], ValidationError::EmptyDisabledPlugin));
    }

    #[test]
    fn test_application_id_needed_only_for_sync() {
        let mut config = Config::default();
        assert!(matches!(
            validate(&config).unwrap_err()[0],
            ValidationError::MissingApplicationId
        ));

        config.bot.sync_commands = false;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_log_filter() {
        let mut config = valid();
        config.logging.filter = "warden=notalevel".into();
        assert!(matches!(
            validate(&config).unwrap_err()[0],
            ValidationError::InvalidLogFilter(_)
        ));
    }
}
