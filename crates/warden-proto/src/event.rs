//! Gateway events.

use crate::interaction::{Interaction, User};
use serde::{Deserialize, Serialize};

/// The session is ready to receive events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ready {
    /// The bot's own user.
    pub user: User,
    /// Gateway session id.
    #[serde(default)]
    pub session_id: String,
}

/// A user joined a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMemberAdd {
    /// Guild joined.
    pub guild_id: String,
    /// The new member.
    pub user: User,
}

/// A message was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreate {
    /// Message id.
    pub id: String,
    /// Channel posted to.
    pub channel_id: String,
    /// Guild, absent for direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    /// Author.
    pub author: User,
    /// Text content.
    #[serde(default)]
    pub content: String,
}

/// A dispatched gateway event, in the `{"t": NAME, "d": payload}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEvent {
    /// Session established.
    Ready(Ready),
    /// Inbound interaction.
    InteractionCreate(Interaction),
    /// Member joined a guild.
    GuildMemberAdd(GuildMemberAdd),
    /// Message posted.
    MessageCreate(MessageCreate),
}

impl GatewayEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready(_) => "READY",
            Self::InteractionCreate(_) => "INTERACTION_CREATE",
            Self::GuildMemberAdd(_) => "GUILD_MEMBER_ADD",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
        }
    }
}
