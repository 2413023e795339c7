//! Plugin contract and capability traits.
//!
//! A plugin advertises each capability it has through one of the `as_*`
//! methods on [`Plugin`]. Capabilities are independent traits, so a plugin
//! can mix any subset of them.

use crate::commands::core::{Command, Middleware};
use crate::session::Session;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::Span;
use warden_proto::GatewayEvent;

/// A self-describing bundle of commands, middleware and event handlers.
pub trait Plugin: Send + Sync {
    /// Unique name; also the key of the plugin's `[plugins.<name>]` table.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Semantic version, e.g. `1.2.0`.
    fn version(&self) -> &str;

    fn as_command_provider(&self) -> Option<&dyn CommandProvider> {
        None
    }

    fn as_middleware_provider(&self) -> Option<&dyn MiddlewareProvider> {
        None
    }

    fn as_event_handler_provider(&self) -> Option<&dyn EventHandlerProvider> {
        None
    }

    fn as_initializable(&self) -> Option<&dyn Initializable> {
        None
    }

    fn as_shutdownable(&self) -> Option<&dyn Shutdownable> {
        None
    }
}

/// Contributes slash commands.
pub trait CommandProvider: Send + Sync {
    fn commands(&self) -> Vec<Arc<dyn Command>>;
}

/// Contributes middleware, innermost last.
pub trait MiddlewareProvider: Send + Sync {
    fn middleware(&self) -> Vec<Middleware>;
}

/// Contributes gateway event handlers.
pub trait EventHandlerProvider: Send + Sync {
    fn event_handlers(&self) -> Vec<Arc<dyn EventHandler>>;
}

/// Runs once when the plugin is loaded.
#[async_trait]
pub trait Initializable: Send + Sync {
    async fn init(&self, ctx: PluginContext) -> anyhow::Result<()>;
}

/// Runs once when the bot shuts down.
#[async_trait]
pub trait Shutdownable: Send + Sync {
    async fn shutdown(&self) -> anyhow::Result<()>;
}

/// Callback over gateway events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this handler wants `event`. Defaults to every event.
    fn handles(&self, _event: &GatewayEvent) -> bool {
        true
    }

    async fn handle(
        &self,
        session: Option<&Arc<dyn Session>>,
        event: &GatewayEvent,
    ) -> anyhow::Result<()>;
}

/// What a plugin receives at initialization.
pub struct PluginContext {
    /// Span named after the plugin.
    pub span: Span,
    pub session: Option<Arc<dyn Session>>,
    /// The plugin's `[plugins.<name>]` table.
    pub config: toml::Table,
}

impl PluginContext {
    /// Deserialize the plugin's config table.
    pub fn settings<T: DeserializeOwned>(&self) -> Result<T, toml::de::Error> {
        toml::Value::Table(self.config.clone()).try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Settings {
        limit: u32,
        #[serde(default)]
        verbose: bool,
    }

    fn context(config: &str) -> PluginContext {
        PluginContext {
            span: Span::none(),
            session: None,
            config: toml::from_str(config).unwrap(),
        }
    }

    #[test]
    fn test_settings_deserialize_table() {
        let settings: Settings = context("limit = 5").settings().unwrap();
        assert_eq!(settings, Settings { limit: 5, verbose: false });
    }

    #[test]
    fn test_settings_report_bad_types() {
        assert!(context("limit = \"many\"").settings::<Settings>().is_err());
    }
}
