//! Command registry.
//!
//! The `CommandRegistry` maps command names to handlers. Registration is
//! append-only: a name can be claimed once and never replaced.

use super::traits::{Command, descriptor};
use crate::error::RegistryError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use warden_proto::ApplicationCommand;

/// Longest command name the platform accepts.
pub const MAX_NAME_LEN: usize = 32;

/// Registry of command handlers.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<dyn Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its own name.
    pub fn register(&self, command: Arc<dyn Command>) -> Result<(), RegistryError> {
        let name = command.name();
        validate_name(name)?;

        let mut commands = self.commands.write();
        if commands.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        debug!(command = %name, "Registered command");
        commands.insert(name.to_string(), command);
        Ok(())
    }

    /// Look up a command. A miss is not an error.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.read().contains_key(name)
    }

    /// Snapshot of every command, sorted by name.
    pub fn all(&self) -> Vec<Arc<dyn Command>> {
        let mut all: Vec<_> = self.commands.read().values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.commands.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }

    /// Catalog entries for every command, sorted by name.
    pub fn to_descriptors(&self) -> Vec<ApplicationCommand> {
        self.all()
            .iter()
            .map(|command| descriptor(command.as_ref()))
            .collect()
    }
}

/// Check a name against the platform's naming rule.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.trim().is_empty() {
        return Err(RegistryError::EmptyName);
    }
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid_chars || name.len() > MAX_NAME_LEN {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
