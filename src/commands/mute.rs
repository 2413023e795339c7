//! `/mute` and `/unmute`, backed by platform timeouts.

use super::common::{SharedSettings, confirmation, ensure_not_self, reason, session, target_user};
use super::core::{Command, Context, Parameter};
use super::duration::{format_duration, parse_duration};
use crate::error::{CommandError, CommandResult};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use tracing::info;
use warden_proto::Permissions;

pub struct Mute {
    params: Vec<Parameter>,
    settings: SharedSettings,
}

impl Mute {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            params: vec![
                Parameter::user("user", "Member to mute").required(),
                Parameter::string("duration", "How long, e.g. 10m, 2h, 1d12h").required(),
                Parameter::string("reason", "Reason recorded in the audit log").length(1, 512),
            ],
            settings,
        }
    }

    fn max_mute(&self) -> Result<TimeDelta, CommandError> {
        let raw = self.settings.read().max_mute.clone();
        parse_duration(&raw)
            .map_err(|e| CommandError::Internal(format!("invalid max_mute {raw:?}: {e}")))
    }

    fn duration(&self, ctx: &Context) -> Result<TimeDelta, CommandError> {
        let raw = ctx.string_option("duration");
        let duration =
            parse_duration(raw).map_err(|e| CommandError::validation("duration", e.to_string()))?;
        if duration <= TimeDelta::zero() {
            return Err(CommandError::validation("duration", "must be longer than zero"));
        }
        let max = self.max_mute()?;
        if duration > max {
            return Err(CommandError::validation(
                "duration",
                format!("can be at most {}", format_duration(max)),
            ));
        }
        Ok(duration)
    }
}

#[async_trait]
impl Command for Mute {
    fn name(&self) -> &str {
        "mute"
    }

    fn description(&self) -> &str {
        "Time a member out"
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::MODERATE_MEMBERS)
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        let guild_id = ctx.require_guild()?;
        ctx.require_permissions(Permissions::MODERATE_MEMBERS)?;
        let target = target_user(ctx, "user")?;
        ensure_not_self(ctx, &target, "mute")?;
        let duration = self.duration(ctx)?;
        let reason = reason(ctx)?;

        let until = Utc::now()
            .checked_add_signed(duration)
            .ok_or_else(|| CommandError::validation("duration", "is too long"))?;
        session(ctx)?
            .timeout_member(guild_id, &target.id, Some(until), reason.as_deref())
            .await?;

        let duration = format_duration(duration);
        info!(
            guild_id = %guild_id,
            actor_id = %ctx.actor_id(),
            target_id = %target.id,
            duration = %duration,
            "Member muted"
        );
        let mut reply = format!("Muted **{}** for {duration}.", target.display_name());
        if let Some(reason) = reason {
            reply.push_str(&format!(" Reason: {reason}"));
        }
        ctx.respond(reply).await
    }
}

pub struct Unmute {
    params: Vec<Parameter>,
}

impl Unmute {
    pub fn new() -> Self {
        Self {
            params: vec![
                Parameter::user("user", "Member to unmute").required(),
                Parameter::string("reason", "Reason recorded in the audit log").length(1, 512),
            ],
        }
    }
}

impl Default for Unmute {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for Unmute {
    fn name(&self) -> &str {
        "unmute"
    }

    fn description(&self) -> &str {
        "Clear a member's timeout"
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::MODERATE_MEMBERS)
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        let guild_id = ctx.require_guild()?;
        ctx.require_permissions(Permissions::MODERATE_MEMBERS)?;
        let target = target_user(ctx, "user")?;
        ensure_not_self(ctx, &target, "unmute")?;
        let reason = reason(ctx)?;

        session(ctx)?
            .timeout_member(guild_id, &target.id, None, reason.as_deref())
            .await?;

        info!(guild_id = %guild_id, actor_id = %ctx.actor_id(), target_id = %target.id, "Member unmuted");
        ctx.respond(confirmation("Unmuted", &target, reason.as_deref()))
            .await
    }
}
