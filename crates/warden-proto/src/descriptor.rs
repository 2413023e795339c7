//! Declarative command descriptors uploaded to the platform's command catalog.

use crate::option::OptionType;
use crate::permissions::Permissions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fixed choice offered for an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    /// Label shown to the user.
    pub name: String,
    /// Value sent back when picked.
    pub value: Value,
}

/// Schema of one command option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptionDescriptor {
    /// Value type.
    #[serde(rename = "type")]
    pub kind: OptionType,
    /// Option name.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Whether the user must supply it.
    #[serde(default)]
    pub required: bool,
    /// Inclusive lower bound for integer/number options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Inclusive upper bound for integer/number options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Minimum length for string options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    /// Maximum length for string options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    /// Fixed choices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
}

/// Schema of one application command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    /// Command name.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Options in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionDescriptor>,
    /// Permissions a member needs to see and use the command by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_member_permissions: Option<Permissions>,
    /// Whether the command is available in direct messages.
    #[serde(default = "default_dm_permission")]
    pub dm_permission: bool,
}

fn default_dm_permission() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_catalog_shape() {
        let command = ApplicationCommand {
            name: "kick".into(),
            description: "Remove a member".into(),
            options: vec![CommandOptionDescriptor {
                kind: OptionType::User,
                name: "user".into(),
                description: "Member to remove".into(),
                required: true,
                min_value: None,
                max_value: None,
                min_length: None,
                max_length: None,
                choices: Vec::new(),
            }],
            default_member_permissions: Some(Permissions::KICK_MEMBERS),
            dm_permission: false,
        };

        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "name": "kick",
                "description": "Remove a member",
                "options": [{ "type": 6, "name": "user", "description": "Member to remove", "required": true }],
                "default_member_permissions": "2",
                "dm_permission": false
            })
        );
    }
}
