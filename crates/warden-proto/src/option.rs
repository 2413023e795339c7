//! Application-command option types.

use crate::error::ProtoError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a command option.
///
/// Serialized as the platform's numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OptionType {
    /// Nested sub-command.
    SubCommand = 1,
    /// Group of sub-commands.
    SubCommandGroup = 2,
    /// UTF-8 string.
    String = 3,
    /// 53-bit signed integer.
    Integer = 4,
    /// `true` / `false`.
    Boolean = 5,
    /// Reference to a user by id.
    User = 6,
    /// Reference to a channel by id.
    Channel = 7,
    /// Reference to a role by id.
    Role = 8,
    /// Reference to a user or a role.
    Mentionable = 9,
    /// Double-precision number.
    Number = 10,
    /// Uploaded file.
    Attachment = 11,
}

impl OptionType {
    /// Lowercase name used in logs and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubCommand => "sub_command",
            Self::SubCommandGroup => "sub_command_group",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::User => "user",
            Self::Channel => "channel",
            Self::Role => "role",
            Self::Mentionable => "mentionable",
            Self::Number => "number",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OptionType> for u8 {
    fn from(kind: OptionType) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for OptionType {
    type Error = ProtoError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => Self::SubCommand,
            2 => Self::SubCommandGroup,
            3 => Self::String,
            4 => Self::Integer,
            5 => Self::Boolean,
            6 => Self::User,
            7 => Self::Channel,
            8 => Self::Role,
            9 => Self::Mentionable,
            10 => Self::Number,
            11 => Self::Attachment,
            other => return Err(ProtoError::UnknownOptionType(other)),
        })
    }
}
