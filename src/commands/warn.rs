//! `/warn`.

use super::common::{
    MAX_REASON_LEN, SharedSettings, ensure_not_self, reason, session, target_user,
};
use super::core::{Command, Context, Parameter};
use crate::error::{CommandError, CommandResult};
use async_trait::async_trait;
use tracing::{info, warn};
use warden_proto::Permissions;

pub struct Warn {
    params: Vec<Parameter>,
    settings: SharedSettings,
}

impl Warn {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            params: vec![
                Parameter::user("user", "Member to warn").required(),
                Parameter::string("reason", "What they are being warned for")
                    .required()
                    .length(1, MAX_REASON_LEN as u16),
            ],
            settings,
        }
    }
}

#[async_trait]
impl Command for Warn {
    fn name(&self) -> &str {
        "warn"
    }

    fn description(&self) -> &str {
        "Warn a member"
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
        ensure_not_self(ctx, &target, "warn")?;
        let reason = reason(ctx)?
            .ok_or_else(|| CommandError::validation("reason", "a reason is required"))?;

        let mut reply = format!("Warned **{}**. Reason: {reason}", target.display_name());
        let dm_on_warn = self.settings.read().dm_on_warn;
        if dm_on_warn {
            let notice = format!("You have been warned by the moderators. Reason: {reason}");
            if let Err(e) = session(ctx)?.send_direct_message(&target.id, &notice).await {
                warn!(target_id = %target.id, error = %e, "Failed to DM warned member");
                reply.push_str(" (could not DM them)");
            }
        }

        info!(
            guild_id = %guild_id,
            actor_id = %ctx.actor_id(),
            target_id = %target.id,
            "Member warned"
        );
        ctx.respond(reply).await
    }
}
