//! Helpers shared by the moderation commands.

use super::core::Context;
use crate::config::defaults::{default_max_mute, default_true};
use crate::error::CommandError;
use crate::session::Session;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use warden_proto::User;

/// Longest audit-log reason the platform keeps.
pub const MAX_REASON_LEN: usize = 512;

/// `[plugins.moderation]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModerationSettings {
    /// Longest timeout `/mute` accepts.
    #[serde(default = "default_max_mute")]
    pub max_mute: String,
    /// Direct-message users when they are warned.
    #[serde(default = "default_true")]
    pub dm_on_warn: bool,
    /// Days of messages `/ban` deletes when the option is omitted.
    #[serde(default)]
    pub default_delete_days: u8,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            max_mute: default_max_mute(),
            dm_on_warn: true,
            default_delete_days: 0,
        }
    }
}

/// Settings shared between the moderation plugin and its commands.
pub type SharedSettings = Arc<RwLock<ModerationSettings>>;

/// The required user option `field`.
pub fn target_user(ctx: &Context, field: &str) -> Result<User, CommandError> {
    ctx.user_option(field)
        .filter(|user| !user.id.is_empty())
        .ok_or_else(|| CommandError::validation(field, "a user is required"))
}

/// Refuse actions the actor aims at themselves.
pub fn ensure_not_self(ctx: &Context, target: &User, verb: &str) -> Result<(), CommandError> {
    if target.id == ctx.actor_id() {
        return Err(CommandError::user_facing(
            format!("actor {} tried to {verb} themselves", target.id),
            format!("You can't {verb} yourself."),
        ));
    }
    Ok(())
}

/// The optional `reason` option, trimmed; blank means none.
pub fn reason(ctx: &Context) -> Result<Option<String>, CommandError> {
    let reason = ctx.string_option("reason").trim();
    if reason.is_empty() {
        return Ok(None);
    }
    if reason.chars().count() > MAX_REASON_LEN {
        return Err(CommandError::validation(
            "reason",
            format!("must be at most {MAX_REASON_LEN} characters"),
        ));
    }
    Ok(Some(reason.to_string()))
}

pub fn session(ctx: &Context) -> Result<&Arc<dyn Session>, CommandError> {
    ctx.session().ok_or(CommandError::NoSession)
}

/// Confirmation line posted after an action.
pub fn confirmation(action: &str, target: &User, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("{action} **{}**. Reason: {reason}", target.display_name()),
        None => format!("{action} **{}**.", target.display_name()),
    }
}
