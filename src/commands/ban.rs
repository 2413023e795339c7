//! `/ban` and `/unban`.

use super::common::{SharedSettings, confirmation, ensure_not_self, reason, session, target_user};
use super::core::{Command, Context, Parameter};
use crate::error::{CommandError, CommandResult};
use async_trait::async_trait;
use tracing::info;
use warden_proto::Permissions;

/// Most days of message history a ban can delete.
pub const MAX_DELETE_DAYS: i64 = 7;

const SECONDS_PER_DAY: u32 = 86_400;

pub struct Ban {
    params: Vec<Parameter>,
    settings: SharedSettings,
}

impl Ban {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            params: vec![
                Parameter::user("user", "Member to ban").required(),
                Parameter::string("reason", "Reason recorded in the audit log").length(1, 512),
                Parameter::integer("delete_days", "Days of their messages to delete")
                    .range(0.0, MAX_DELETE_DAYS as f64),
            ],
            settings,
        }
    }

    fn delete_days(&self, ctx: &Context) -> Result<u32, CommandError> {
        if !ctx.has_option("delete_days") {
            return Ok(u32::from(self.settings.read().default_delete_days));
        }
        let days = ctx.integer_option("delete_days");
        if !(0..=MAX_DELETE_DAYS).contains(&days) {
            return Err(CommandError::validation(
                "delete_days",
                format!("must be between 0 and {MAX_DELETE_DAYS}"),
            ));
        }
        u32::try_from(days).map_err(|_| CommandError::validation("delete_days", "out of range"))
    }
}

#[async_trait]
impl Command for Ban {
    fn name(&self) -> &str {
        "ban"
    }

    fn description(&self) -> &str {
        "Ban a member from the server"
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::BAN_MEMBERS)
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        let guild_id = ctx.require_guild()?;
        ctx.require_permissions(Permissions::BAN_MEMBERS)?;
        let target = target_user(ctx, "user")?;
        ensure_not_self(ctx, &target, "ban")?;
        let reason = reason(ctx)?;
        let delete_days = self.delete_days(ctx)?;

        session(ctx)?
            .ban_member(
                guild_id,
                &target.id,
                delete_days * SECONDS_PER_DAY,
                reason.as_deref(),
            )
            .await?;

        info!(
            guild_id = %guild_id,
            actor_id = %ctx.actor_id(),
            target_id = %target.id,
            delete_days,
            "Member banned"
        );
        ctx.respond(confirmation("Banned", &target, reason.as_deref()))
            .await
    }
}

pub struct Unban {
    params: Vec<Parameter>,
}

impl Unban {
    pub fn new() -> Self {
        Self {
            params: vec![
                Parameter::user("user", "User to unban").required(),
                Parameter::string("reason", "Reason recorded in the audit log").length(1, 512),
            ],
        }
    }
}

impl Default for Unban {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for Unban {
    fn name(&self) -> &str {
        "unban"
    }

    fn description(&self) -> &str {
        "Lift a ban"
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::BAN_MEMBERS)
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        let guild_id = ctx.require_guild()?;
        ctx.require_permissions(Permissions::BAN_MEMBERS)?;
        let target = target_user(ctx, "user")?;
        ensure_not_self(ctx, &target, "unban")?;
        let reason = reason(ctx)?;

        session(ctx)?
            .unban_member(guild_id, &target.id, reason.as_deref())
            .await?;

        info!(guild_id = %guild_id, actor_id = %ctx.actor_id(), target_id = %target.id, "Member unbanned");
        ctx.respond(confirmation("Unbanned", &target, reason.as_deref()))
            .await
    }
}
