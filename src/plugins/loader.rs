//! Plugin loading, capability aggregation and shutdown.

use super::registry::PluginRegistry;
use super::traits::{EventHandler, Plugin, PluginContext};
use crate::commands::core::{Command, Middleware};
use crate::error::PluginError;
use crate::session::Session;
use crate::telemetry::spans;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{Instrument, error, info};

/// Loads plugins into a [`PluginRegistry`] and collects what they provide.
pub struct PluginLoader {
    registry: Arc<PluginRegistry>,
    session: Option<Arc<dyn Session>>,
    configs: HashMap<String, toml::Table>,
}

impl PluginLoader {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            session: None,
            configs: HashMap::new(),
        }
    }

    /// Session handed to plugins at init.
    pub fn with_session(mut self, session: Option<Arc<dyn Session>>) -> Self {
        self.session = session;
        self
    }

    /// Per-plugin config tables, keyed by plugin name.
    pub fn with_configs(mut self, configs: HashMap<String, toml::Table>) -> Self {
        self.configs = configs;
        self
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Register a plugin and run its init hook.
    ///
    /// A failed init unregisters the plugin again.
    pub async fn load(&self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let name = plugin.name().to_string();
        self.registry.register(Arc::clone(&plugin))?;

        if let Some(initializable) = plugin.as_initializable() {
            let span = spans::plugin(&name, plugin.version());
            let ctx = PluginContext {
                span: span.clone(),
                session: self.session.clone(),
                config: self.configs.get(&name).cloned().unwrap_or_default(),
            };
            if let Err(source) = initializable.init(ctx).instrument(span).await {
                self.registry.unregister(&name);
                error!(plugin = %name, error = %format!("{source:#}"), "Plugin failed to initialize");
                return Err(PluginError::Init { name, source });
            }
        }

        info!(plugin = %name, version = %plugin.version(), "Plugin loaded");
        Ok(())
    }

    /// Load plugins in order, stopping at the first failure.
    ///
    /// Plugins loaded before the failure stay loaded.
    pub async fn load_all(
        &self,
        plugins: impl IntoIterator<Item = Arc<dyn Plugin>>,
    ) -> Result<(), PluginError> {
        for plugin in plugins {
            self.load(plugin).await?;
        }
        Ok(())
    }

    /// Every plugin's commands, in registration order.
    pub fn commands(&self) -> Vec<Arc<dyn Command>> {
        self.registry
            .all()
            .iter()
            .filter_map(|p| p.as_command_provider().map(|c| c.commands()))
            .flatten()
            .collect()
    }

    /// Every plugin's middleware, in registration order.
    pub fn middleware(&self) -> Vec<Middleware> {
        self.registry
            .all()
            .iter()
            .filter_map(|p| p.as_middleware_provider().map(|m| m.middleware()))
            .flatten()
            .collect()
    }

    /// Every plugin's event handlers, in registration order.
    pub fn event_handlers(&self) -> Vec<Arc<dyn EventHandler>> {
        self.registry
            .all()
            .iter()
            .filter_map(|p| p.as_event_handler_provider().map(|e| e.event_handlers()))
            .flatten()
            .collect()
    }

    /// Run every shutdown hook in registration order.
    ///
    /// Failures are logged and do not stop the remaining hooks.
    pub async fn shutdown_all(&self) {
        for plugin in self.registry.all() {
            let Some(shutdownable) = plugin.as_shutdownable() else {
                continue;
            };
            let span = spans::plugin(plugin.name(), plugin.version());
            match shutdownable.shutdown().instrument(span).await {
                Ok(()) => info!(plugin = %plugin.name(), "Plugin shut down"),
                Err(e) => error!(
                    plugin = %plugin.name(),
                    error = %format!("{e:#}"),
                    "Plugin shutdown failed"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::traits::Initializable;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct Configured {
        seen: Mutex<Option<toml::Table>>,
    }

    impl Plugin for Configured {
        fn name(&self) -> &str {
            "configured"
        }

        fn description(&self) -> &str {
            "records its config"
        }

        fn version(&self) -> &str {
            "1.0.0"
        }

        fn as_initializable(&self) -> Option<&dyn Initializable> {
            Some(self)
        }
    }

    #[async_trait]
    impl Initializable for Configured {
        async fn init(&self, ctx: PluginContext) -> anyhow::Result<()> {
            *self.seen.lock() = Some(ctx.config);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_init_receives_own_table() {
        let mut configs = HashMap::new();
        configs.insert("configured".to_string(), toml::from_str("answer = 42").unwrap());
        configs.insert("other".to_string(), toml::from_str("answer = 0").unwrap());
        let loader = PluginLoader::new(Arc::new(PluginRegistry::new())).with_configs(configs);

        let plugin = Arc::new(Configured { seen: Mutex::new(None) });
        loader.load(plugin.clone()).await.unwrap();

        let seen = plugin.seen.lock().clone().unwrap();
        assert_eq!(seen["answer"].as_integer(), Some(42));
        assert_eq!(loader.registry().names(), ["configured"]);
    }

    #[tokio::test]
    async fn test_missing_table_is_empty() {
        let loader = PluginLoader::new(Arc::new(PluginRegistry::new()));
        let plugin = Arc::new(Configured { seen: Mutex::new(None) });
        loader.load(plugin.clone()).await.unwrap();
        assert!(plugin.seen.lock().as_ref().unwrap().is_empty());
    }
}
