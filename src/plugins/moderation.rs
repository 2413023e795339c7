//! The `moderation` plugin: ban, unban, kick, mute, unmute and warn.

use super::traits::{CommandProvider, Initializable, Plugin, PluginContext};
use crate::commands::core::Command;
use crate::commands::{
    Ban, Kick, MAX_DELETE_DAYS, ModerationSettings, Mute, SharedSettings, Unban, Unmute, Warn,
    parse_duration,
};
use anyhow::{Context as _, bail};
use async_trait::async_trait;
use chrono::TimeDelta;
use std::sync::Arc;
use tracing::{debug, info};

/// The platform refuses timeouts longer than this many days.
const PLATFORM_MAX_TIMEOUT_DAYS: i64 = 28;

pub struct ModerationPlugin {
    settings: SharedSettings,
}

impl ModerationPlugin {
    pub const NAME: &'static str = "moderation";

    pub fn new() -> Self {
        Self {
            settings: SharedSettings::default(),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> ModerationSettings {
        self.settings.read().clone()
    }
}

impl Default for ModerationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ModerationPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Ban, kick, mute and warn members"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn as_command_provider(&self) -> Option<&dyn CommandProvider> {
        Some(self)
    }

    fn as_initializable(&self) -> Option<&dyn Initializable> {
        Some(self)
    }
}

impl CommandProvider for ModerationPlugin {
    fn commands(&self) -> Vec<Arc<dyn Command>> {
        vec![
            Arc::new(Ban::new(Arc::clone(&self.settings))),
            Arc::new(Unban::new()),
            Arc::new(Kick::new()),
            Arc::new(Mute::new(Arc::clone(&self.settings))),
            Arc::new(Unmute::new()),
            Arc::new(Warn::new(Arc::clone(&self.settings))),
        ]
    }
}

#[async_trait]
impl Initializable for ModerationPlugin {
    async fn init(&self, ctx: PluginContext) -> anyhow::Result<()> {
        let settings: ModerationSettings = ctx
            .settings()
            .context("invalid [plugins.moderation] settings")?;

        let max_mute = parse_duration(&settings.max_mute)
            .with_context(|| format!("invalid max_mute {:?}", settings.max_mute))?;
        if max_mute <= TimeDelta::zero() || max_mute > TimeDelta::days(PLATFORM_MAX_TIMEOUT_DAYS) {
            bail!("max_mute must be between 1s and {PLATFORM_MAX_TIMEOUT_DAYS}d");
        }
        if i64::from(settings.default_delete_days) > MAX_DELETE_DAYS {
            bail!("default_delete_days must be at most {MAX_DELETE_DAYS}");
        }

        debug!(?settings, "Moderation settings");
        info!(
            max_mute = %settings.max_mute,
            dm_on_warn = settings.dm_on_warn,
            "Moderation plugin ready"
        );
        *self.settings.write() = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Span;

    fn context(config: &str) -> PluginContext {
        PluginContext {
            span: Span::none(),
            session: None,
            config: toml::from_str(config).unwrap(),
        }
    }

    #[test]
    fn test_provides_six_commands() {
        let names: Vec<_> = ModerationPlugin::new()
            .commands()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["ban", "unban", "kick", "mute", "unmute", "warn"]);
    }

    #[tokio::test]
    async fn test_init_applies_settings() {
        let plugin = ModerationPlugin::new();
        plugin
            .init(context("max_mute = \"7d\"\ndm_on_warn = false"))
            .await
            .unwrap();

        let settings = plugin.settings();
        assert_eq!(settings.max_mute, "7d");
        assert!(!settings.dm_on_warn);
    }

    #[tokio::test]
    async fn test_init_rejects_bad_settings() {
        let plugin = ModerationPlugin::new();
        assert!(plugin.init(context("max_mute = \"forever\"")).await.is_err());
        assert!(plugin.init(context("max_mute = \"30d\"")).await.is_err());
        assert!(plugin.init(context("default_delete_days = 9")).await.is_err());
        assert!(plugin.init(context("unknown_key = 1")).await.is_err());
        assert_eq!(plugin.settings(), ModerationSettings::default());
    }
}
