//! The command contract and its parameter schema.

use super::context::Context;
use crate::error::CommandResult;
use async_trait::async_trait;
use serde_json::Value;
use warden_proto::{ApplicationCommand, CommandOptionDescriptor, OptionChoice, OptionType, Permissions};

/// A slash command handler.
///
/// Implementations are immutable once built and are shared between
/// invocations as `Arc<dyn Command>`.
#[async_trait]
pub trait Command: Send + Sync {
    /// Unique lowercase name, as typed after the slash.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Option schema, in display order.
    fn parameters(&self) -> &[Parameter] {
        &[]
    }

    /// Permissions a member needs to use the command.
    fn permissions(&self) -> Option<Permissions> {
        None
    }

    /// Whether the command only makes sense inside a guild. Guild-only
    /// commands are hidden from direct messages in the catalog.
    fn guild_only(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &Context) -> CommandResult;
}

/// Value constraints attached to a parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub min_length: Option<u16>,
    pub max_length: Option<u16>,
    pub choices: Vec<OptionChoice>,
}

/// One entry of a command's option schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub kind: OptionType,
    pub required: bool,
    pub constraints: Constraints,
}

impl Parameter {
    fn new(name: &str, description: &str, kind: OptionType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            required: false,
            constraints: Constraints::default(),
        }
    }

    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionType::String)
    }

    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionType::Integer)
    }

    pub fn number(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionType::Number)
    }

    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionType::Boolean)
    }

    pub fn user(name: &str, description: &str) -> Self {
        Self::new(name, description, OptionType::User)
    }

    /// Mark the parameter as mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inclusive numeric bounds.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraints.min_value = Some(min);
        self.constraints.max_value = Some(max);
        self
    }

    /// Inclusive string length bounds.
    pub fn length(mut self, min: u16, max: u16) -> Self {
        self.constraints.min_length = Some(min);
        self.constraints.max_length = Some(max);
        self
    }

    /// Offer a fixed choice.
    pub fn choice(mut self, name: &str, value: Value) -> Self {
        self.constraints.choices.push(OptionChoice {
            name: name.to_string(),
            value,
        });
        self
    }

    pub fn to_descriptor(&self) -> CommandOptionDescriptor {
        CommandOptionDescriptor {
            kind: self.kind,
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required,
            min_value: self.constraints.min_value,
            max_value: self.constraints.max_value,
            min_length: self.constraints.min_length,
            max_length: self.constraints.max_length,
            choices: self.constraints.choices.clone(),
        }
    }
}

/// Render a command as the platform's catalog entry.
pub fn descriptor(command: &dyn Command) -> ApplicationCommand {
    ApplicationCommand {
        name: command.name().to_string(),
        description: command.description().to_string(),
        options: command
            .parameters()
            .iter()
            .map(Parameter::to_descriptor)
            .collect(),
        default_member_permissions: command.permissions(),
        dm_permission: !command.guild_only(),
    }
}
