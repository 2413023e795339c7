//! Inbound interaction payloads.

use crate::error::ProtoError;
use crate::option::OptionType;
use crate::permissions::Permissions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Kind of inbound interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum InteractionType {
    /// Endpoint liveness check.
    Ping = 1,
    /// A user invoked an application command.
    ApplicationCommand = 2,
    /// A user clicked a button or picked from a select menu.
    MessageComponent = 3,
    /// The client asks for option completions.
    Autocomplete = 4,
    /// A user submitted a modal.
    ModalSubmit = 5,
}

impl From<InteractionType> for u8 {
    fn from(kind: InteractionType) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for InteractionType {
    type Error = ProtoError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            4 => Self::Autocomplete,
            5 => Self::ModalSubmit,
            other => return Err(ProtoError::UnknownInteractionType(other)),
        })
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake id.
    pub id: String,
    /// Unique username.
    #[serde(default)]
    pub username: String,
    /// Display name, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Create a user with an id and username.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            global_name: None,
            bot: false,
        }
    }

    /// Name to show in replies: display name, then username, then id.
    pub fn display_name(&self) -> &str {
        match self.global_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ if !self.username.is_empty() => &self.username,
            _ => &self.id,
        }
    }

    /// Mention markup that pings the user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Guild-scoped view of the invoking user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The underlying user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Guild nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// Computed permissions of the member in the invoking channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    /// Role ids.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// One option value supplied with a command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDataOption {
    /// Parameter name.
    pub name: String,
    /// Declared type of the value.
    #[serde(rename = "type")]
    pub kind: OptionType,
    /// Raw value; user/channel/role options carry the referenced id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Nested options of a sub-command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandDataOption>,
}

/// Entities referenced by options, pre-resolved by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedData {
    /// Referenced users keyed by id.
    #[serde(default)]
    pub users: HashMap<String, User>,
}

/// Payload of an application-command interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    /// Id of the registered command.
    #[serde(default)]
    pub id: String,
    /// Invoked command name.
    pub name: String,
    /// Supplied options, in the order the user entered them.
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    /// Pre-resolved entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedData>,
}

/// An inbound interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Interaction id, used to address the response.
    pub id: String,
    /// Application the interaction targets.
    #[serde(default)]
    pub application_id: String,
    /// Interaction kind.
    #[serde(rename = "type")]
    pub kind: InteractionType,
    /// Command payload; absent for pings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
    /// Guild the interaction came from; absent in direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    /// Channel the interaction came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Invoking member, present in guilds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    /// Invoking user, present in direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Continuation token for responding.
    #[serde(default)]
    pub token: String,
}

impl Interaction {
    /// Start an application-command interaction with no options.
    pub fn application_command(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            token: format!("token-{id}"),
            id,
            application_id: String::new(),
            kind: InteractionType::ApplicationCommand,
            data: Some(CommandData {
                id: String::new(),
                name: name.into(),
                options: Vec::new(),
                resolved: None,
            }),
            guild_id: None,
            channel_id: None,
            member: None,
            user: None,
        }
    }

    /// Set the originating guild and channel.
    pub fn in_guild(mut self, guild_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        self.guild_id = Some(guild_id.into());
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Set the invoking guild member.
    pub fn from_member(mut self, user: User, permissions: Permissions) -> Self {
        self.member = Some(Member {
            user: Some(user),
            nick: None,
            permissions: Some(permissions),
            roles: Vec::new(),
        });
        self
    }

    /// Set the invoking user, as in a direct message.
    pub fn from_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Append an option value.
    pub fn with_option(mut self, name: impl Into<String>, kind: OptionType, value: Value) -> Self {
        if let Some(data) = self.data.as_mut() {
            data.options.push(CommandDataOption {
                name: name.into(),
                kind,
                value: Some(value),
                options: Vec::new(),
            });
        }
        self
    }

    /// Add a user to the pre-resolved entities.
    pub fn with_resolved_user(mut self, user: User) -> Self {
        if let Some(data) = self.data.as_mut() {
            data.resolved
                .get_or_insert_with(ResolvedData::default)
                .users
                .insert(user.id.clone(), user);
        }
        self
    }

    /// Whether this is an application-command invocation.
    pub fn is_application_command(&self) -> bool {
        self.kind == InteractionType::ApplicationCommand
    }

    /// Invoked command name, if the payload carries one.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|data| data.name.as_str())
    }
}
