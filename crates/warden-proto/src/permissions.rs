//! Member permission bitmask.
//!
//! The platform transmits permissions as a decimal string because the mask
//! does not fit in a JSON-safe integer. Deserialization also accepts a bare
//! number for leniency.

use crate::error::ProtoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

/// A set of member permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Permissions(u64);

const NAMED: &[(Permissions, &str)] = &[
    (Permissions::KICK_MEMBERS, "KICK_MEMBERS"),
    (Permissions::BAN_MEMBERS, "BAN_MEMBERS"),
    (Permissions::ADMINISTRATOR, "ADMINISTRATOR"),
    (Permissions::MANAGE_CHANNELS, "MANAGE_CHANNELS"),
    (Permissions::MANAGE_GUILD, "MANAGE_GUILD"),
    (Permissions::MANAGE_MESSAGES, "MANAGE_MESSAGES"),
    (Permissions::MODERATE_MEMBERS, "MODERATE_MEMBERS"),
];

impl Permissions {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Remove members from a guild.
    pub const KICK_MEMBERS: Self = Self(1 << 1);
    /// Ban members from a guild.
    pub const BAN_MEMBERS: Self = Self(1 << 2);
    /// Every permission, bypassing channel overwrites.
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    /// Edit and delete channels.
    pub const MANAGE_CHANNELS: Self = Self(1 << 4);
    /// Edit guild settings.
    pub const MANAGE_GUILD: Self = Self(1 << 5);
    /// Delete other members' messages.
    pub const MANAGE_MESSAGES: Self = Self(1 << 13);
    /// Time members out.
    pub const MODERATE_MEMBERS: Self = Self(1 << 40);

    /// Build from a raw bitmask.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether a member holding `self` satisfies `required`.
    ///
    /// `ADMINISTRATOR` satisfies everything.
    pub const fn allows(self, required: Self) -> bool {
        self.contains(Self::ADMINISTRATOR) || self.contains(required)
    }

    /// The bits of `required` that `self` lacks.
    pub const fn missing(self, required: Self) -> Self {
        if self.contains(Self::ADMINISTRATOR) {
            Self::NONE
        } else {
            Self(required.0 & !self.0)
        }
    }

    /// Names of the well-known permissions set in this mask.
    pub fn names(self) -> Vec<&'static str> {
        NAMED
            .iter()
            .filter(|(perm, _)| self.contains(*perm))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Permissions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Human-readable list of names, e.g. `BAN_MEMBERS | KICK_MEMBERS`.
///
/// Bits without a well-known name are rendered as a hex remainder.
impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let known = NAMED.iter().fold(0u64, |acc, (perm, _)| acc | perm.0);
        let mut parts: Vec<String> = self.names().into_iter().map(str::to_string).collect();
        let unknown = self.0 & !known;
        if unknown != 0 {
            parts.push(format!("{unknown:#x}"));
        }
        f.write_str(&parts.join(" | "))
    }
}

impl FromStr for Permissions {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ProtoError::InvalidPermissions(s.to_string()))
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Raw::Number(bits) => Ok(Self(bits)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_allows_everything() {
        let admin = Permissions::ADMINISTRATOR;
        assert!(admin.allows(Permissions::BAN_MEMBERS | Permissions::MODERATE_MEMBERS));
        assert!(admin.missing(Permissions::BAN_MEMBERS).is_empty());
    }

    #[test]
    fn test_missing_reports_only_absent_bits() {
        let held = Permissions::KICK_MEMBERS;
        let required = Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS;
        assert!(!held.allows(required));
        assert_eq!(held.missing(required), Permissions::BAN_MEMBERS);
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let perms = Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS;
        assert_eq!(serde_json::to_string(&perms).unwrap(), "\"6\"");

        let from_text: Permissions = serde_json::from_str("\"1099511627776\"").unwrap();
        assert_eq!(from_text, Permissions::MODERATE_MEMBERS);

        let from_number: Permissions = serde_json::from_str("4").unwrap();
        assert_eq!(from_number, Permissions::BAN_MEMBERS);
    }

    #[test]
    fn test_display_lists_names() {
        let perms = Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS;
        assert_eq!(perms.to_string(), "KICK_MEMBERS | BAN_MEMBERS");
        assert_eq!(Permissions::NONE.to_string(), "NONE");
        assert_eq!(Permissions::from_bits(1 << 60).to_string(), "0x1000000000000000");
    }
}
