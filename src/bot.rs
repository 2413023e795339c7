//! Bot runtime.
//!
//! Wires configuration, plugins, the command registry, the stock middleware
//! and the dispatcher together, and routes gateway events through them.

use crate::commands::core::{
    Command, CommandRegistry, DispatchOutcome, Dispatcher, chain, logging, recovery,
};
use crate::config::Config;
use crate::error::BotError;
use crate::plugins::{EventHandler, Plugin, PluginLoader, PluginRegistry};
use crate::session::Session;
use crate::telemetry::spans;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info};
use warden_proto::GatewayEvent;

/// Collects everything a [`Bot`] is built from.
pub struct BotBuilder {
    config: Config,
    session: Option<Arc<dyn Session>>,
    plugins: Vec<Arc<dyn Plugin>>,
    commands: Vec<Arc<dyn Command>>,
}

impl BotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: None,
            plugins: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(mut self, plugins: impl IntoIterator<Item = Arc<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Register a command outside any plugin.
    pub fn command(mut self, command: Arc<dyn Command>) -> Self {
        self.commands.push(command);
        self
    }

    /// Load plugins, register commands and assemble the middleware chain.
    ///
    /// Plugins disabled in config are skipped. The chain is recovery, then
    /// logging, then plugin middleware in registration order.
    pub async fn build(self) -> Result<Bot, BotError> {
        let Self {
            config,
            session,
            plugins,
            commands,
        } = self;

        let loader = PluginLoader::new(Arc::new(PluginRegistry::new()))
            .with_session(session.clone())
            .with_configs(config.plugins.settings.clone());

        let enabled: Vec<_> = plugins
            .into_iter()
            .filter(|plugin| {
                let disabled = config.plugins.is_disabled(plugin.name());
                if disabled {
                    info!(plugin = %plugin.name(), "Plugin disabled by config");
                }
                !disabled
            })
            .collect();
        loader.load_all(enabled).await?;

        let registry = Arc::new(CommandRegistry::new());
        for command in commands.into_iter().chain(loader.commands()) {
            if let Err(e) = registry.register(command) {
                loader.shutdown_all().await;
                return Err(e.into());
            }
        }

        let mut middleware = chain([recovery(), logging()]);
        middleware.extend(loader.middleware());
        let dispatcher =
            Dispatcher::new(Arc::clone(&registry), session.clone()).with_middleware(middleware);
        let event_handlers = loader.event_handlers();

        info!(
            bot = %config.bot.name,
            plugins = loader.registry().len(),
            commands = registry.len(),
            event_handlers = event_handlers.len(),
            "Bot ready"
        );

        Ok(Bot {
            config,
            session,
            registry,
            loader,
            dispatcher,
            event_handlers,
        })
    }
}

/// A running bot.
pub struct Bot {
    config: Config,
    session: Option<Arc<dyn Session>>,
    registry: Arc<CommandRegistry>,
    loader: PluginLoader,
    dispatcher: Dispatcher,
    event_handlers: Vec<Arc<dyn EventHandler>>,
}

impl Bot {
    pub fn builder(config: Config) -> BotBuilder {
        BotBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn plugins(&self) -> &Arc<PluginRegistry> {
        self.loader.registry()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Route one gateway event.
    ///
    /// Interactions go to the dispatcher; every event is then offered to the
    /// plugin event handlers. Returns the dispatch outcome for interactions.
    pub async fn handle_event(&self, event: GatewayEvent) -> Option<DispatchOutcome> {
        let span = spans::event(event.name());
        async {
            let outcome = match &event {
                GatewayEvent::Ready(ready) => {
                    info!(user = %ready.user.username, session_id = %ready.session_id, "Gateway ready");
                    None
                }
                GatewayEvent::InteractionCreate(interaction) => {
                    Some(self.dispatcher.dispatch(Some(interaction.clone())).await)
                }
                _ => None,
            };

            for handler in &self.event_handlers {
                if !handler.handles(&event) {
                    continue;
                }
                debug!(handler = %handler.name(), "Running event handler");
                if let Err(e) = handler.handle(self.session.as_ref(), &event).await {
                    error!(
                        handler = %handler.name(),
                        event = %event.name(),
                        error = %format!("{e:#}"),
                        "Event handler failed"
                    );
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Upload the command catalog, scoped to the configured guild if any.
    ///
    /// Returns the number of commands uploaded.
    pub async fn sync_commands(&self) -> Result<usize, BotError> {
        let session = self.session.as_ref().ok_or(BotError::NoSession)?;
        let descriptors = self.registry.to_descriptors();
        let guild_id = self.config.bot.guild_id.as_deref();

        session
            .overwrite_commands(&self.config.bot.application_id, guild_id, &descriptors)
            .await?;

        info!(
            count = descriptors.len(),
            scope = guild_id.unwrap_or("global"),
            "Synced command catalog"
        );
        Ok(descriptors.len())
    }

    /// Run every plugin shutdown hook.
    pub async fn shutdown(&self) {
        info!(bot = %self.config.bot.name, "Shutting down");
        self.loader.shutdown_all().await;
    }
}
