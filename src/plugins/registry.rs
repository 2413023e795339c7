//! Ordered registry of plugins.

use super::traits::Plugin;
use crate::error::PluginError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Plugins in first-registration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let name = plugin.name();
        if name.trim().is_empty() {
            return Err(PluginError::EmptyName);
        }
        if semver::Version::parse(plugin.version()).is_err() {
            return Err(PluginError::InvalidVersion {
                name: name.to_string(),
                version: plugin.version().to_string(),
            });
        }

        let mut plugins = self.plugins.write();
        if plugins.iter().any(|p| p.name() == name) {
            return Err(PluginError::Duplicate(name.to_string()));
        }
        debug!(plugin = %name, version = %plugin.version(), "Registered plugin");
        plugins.push(plugin);
        Ok(())
    }

    /// Remove a plugin. Only used to roll back a failed load.
    pub(crate) fn unregister(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        let mut plugins = self.plugins.write();
        let index = plugins.iter().position(|p| p.name() == name)?;
        Some(plugins.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.read().iter().find(|p| p.name() == name).cloned()
    }

    /// Snapshot in registration order.
    pub fn all(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.read().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.read().iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}
