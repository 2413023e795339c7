//! Interaction responses.

use crate::error::ProtoError;
use serde::{Deserialize, Serialize};

/// Kind of interaction response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ResponseKind {
    /// Acknowledge a ping.
    Pong = 1,
    /// Reply with a message.
    ChannelMessageWithSource = 4,
    /// Acknowledge now, edit the reply later.
    DeferredChannelMessageWithSource = 5,
}

impl From<ResponseKind> for u8 {
    fn from(kind: ResponseKind) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for ResponseKind {
    type Error = ProtoError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::Pong,
            4 => Self::ChannelMessageWithSource,
            5 => Self::DeferredChannelMessageWithSource,
            other => return Err(ProtoError::UnknownResponseType(other)),
        })
    }
}

/// Message flag bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageFlags(u64);

impl MessageFlags {
    /// Only the invoking user can see the message.
    pub const EPHEMERAL: Self = Self(1 << 6);

    /// Raw bitmask.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether no flag is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether every flag of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// One name/value row in an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field title.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Render side by side with neighbouring inline fields.
    #[serde(default)]
    pub inline: bool,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

/// Rich message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Title line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accent colour as `0xRRGGBB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Field rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    /// Footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// Start an embed with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set the body text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the accent colour.
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Append a field row.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer text.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }
}

/// Message payload of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Plain text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Rich embeds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    /// Message flags.
    #[serde(default, skip_serializing_if = "MessageFlags::is_empty")]
    pub flags: MessageFlags,
}

/// Response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    /// Response kind.
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Message payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    /// Visible text reply.
    pub fn message(content: impl Into<String>) -> Self {
        Self::with_data(ResponseData {
            content: Some(content.into()),
            ..ResponseData::default()
        })
    }

    /// Text reply only the invoking user can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self::with_data(ResponseData {
            content: Some(content.into()),
            flags: MessageFlags::EPHEMERAL,
            ..ResponseData::default()
        })
    }

    /// Visible embed reply.
    pub fn embed(embed: Embed) -> Self {
        Self::with_data(ResponseData {
            embeds: vec![embed],
            ..ResponseData::default()
        })
    }

    fn with_data(data: ResponseData) -> Self {
        Self {
            kind: ResponseKind::ChannelMessageWithSource,
            data: Some(data),
        }
    }

    /// Mark the reply as visible only to the invoking user.
    pub fn into_ephemeral(mut self) -> Self {
        self.data.get_or_insert_with(ResponseData::default).flags = MessageFlags::EPHEMERAL;
        self
    }

    /// Whether only the invoking user can see the reply.
    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .is_some_and(|data| data.flags.contains(MessageFlags::EPHEMERAL))
    }

    /// Text content, if any.
    pub fn content(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.content.as_deref())
    }
}
