//! Plugin system.
//!
//! Plugins are self-describing bundles that may contribute commands,
//! middleware and gateway event handlers, with optional init and shutdown
//! hooks. The [`PluginLoader`] registers them in a [`PluginRegistry`],
//! initializes them, and aggregates their contributions in registration
//! order.
//!
//! Bundled plugins:
//! - [`ModerationPlugin`]: the moderation commands
//! - [`AuditPlugin`]: usage counters, `/modstats` and join logging

mod audit;
mod loader;
mod moderation;
mod registry;
pub mod traits;

pub use audit::{AuditPlugin, CommandStats};
pub use loader::PluginLoader;
pub use moderation::ModerationPlugin;
pub use registry::PluginRegistry;
pub use traits::{
    CommandProvider, EventHandler, EventHandlerProvider, Initializable, MiddlewareProvider,
    Plugin, PluginContext, Shutdownable,
};

use std::sync::Arc;

/// Every plugin shipped with the bot, in load order.
pub fn bundled() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(ModerationPlugin::new()), Arc::new(AuditPlugin::new())]
}
