//! `/kick`.

use super::common::{confirmation, ensure_not_self, reason, session, target_user};
use super::core::{Command, Context, Parameter};
use crate::error::CommandResult;
use async_trait::async_trait;
use tracing::info;
use warden_proto::Permissions;

pub struct Kick {
    params: Vec<Parameter>,
}

impl Kick {
    pub fn new() -> Self {
        Self {
            params: vec![
                Parameter::user("user", "Member to kick").required(),
                Parameter::string("reason", "Reason recorded in the audit log").length(1, 512),
            ],
        }
    }
}

impl Default for Kick {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for Kick {
    fn name(&self) -> &str {
        "kick"
    }

    fn description(&self) -> &str {
        "Remove a member from the server"
    }

    fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::KICK_MEMBERS)
    }

    fn guild_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        let guild_id = ctx.require_guild()?;
        ctx.require_permissions(Permissions::KICK_MEMBERS)?;
        let target = target_user(ctx, "user")?;
        ensure_not_self(ctx, &target, "kick")?;
        let reason = reason(ctx)?;

        session(ctx)?
            .kick_member(guild_id, &target.id, reason.as_deref())
            .await?;

        info!(guild_id = %guild_id, actor_id = %ctx.actor_id(), target_id = %target.id, "Member kicked");
        ctx.respond(confirmation("Kicked", &target, reason.as_deref()))
            .await
    }
}
