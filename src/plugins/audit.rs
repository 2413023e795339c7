//! The `audit` plugin.
//!
//! Counts command outcomes, logs member joins, serves `/modstats` and logs a
//! usage summary on shutdown.

use super::traits::{
    CommandProvider, EventHandler, EventHandlerProvider, MiddlewareProvider, Plugin, Shutdownable,
};
use crate::commands::core::{
    Command, Context, HandlerFn, HandlerFuture, Middleware, middleware_fn,
};
use crate::error::CommandResult;
use crate::session::Session;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};
use warden_proto::{Embed, GatewayEvent, InteractionResponse, Permissions};

/// The platform renders at most this many fields per embed.
const MAX_EMBED_FIELDS: usize = 25;

/// Outcome counters for one command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CommandStats {
    pub succeeded: u64,
    pub failed: u64,
}

impl CommandStats {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }
}

type StatsMap = Arc<DashMap<String, CommandStats>>;

/// Counters sorted by total usage, busiest first; ties by name.
fn sorted(stats: &StatsMap) -> Vec<(String, CommandStats)> {
    let mut rows: Vec<_> = stats
        .iter()
        .map(|entry| (entry.key().clone(), *entry.value()))
        .collect();
    rows.sort_by(|a, b| b.1.total().cmp(&a.1.total()).then_with(|| a.0.cmp(&b.0)));
    rows
}

#[derive(Default)]
pub struct AuditPlugin {
    stats: StatsMap,
}

impl AuditPlugin {
    pub const NAME: &'static str = "audit";

    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counters, busiest command first.
    pub fn stats(&self) -> Vec<(String, CommandStats)> {
        sorted(&self.stats)
    }
}

impl Plugin for AuditPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Command usage counters and member join logging"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn as_command_provider(&self) -> Option<&dyn CommandProvider> {
        Some(self)
    }

    fn as_middleware_provider(&self) -> Option<&dyn MiddlewareProvider> {
        Some(self)
    }

    fn as_event_handler_provider(&self) -> Option<&dyn EventHandlerProvider> {
        Some(self)
    }

    fn as_shutdownable(&self) -> Option<&dyn Shutdownable> {
        Some(self)
    }
}

impl MiddlewareProvider for AuditPlugin {
    fn middleware(&self) -> Vec<Middleware> {
        let stats = Arc::clone(&self.stats);
        vec![middleware_fn(move |next: HandlerFn| -> HandlerFn {
            let stats = Arc::clone(&stats);
            Arc::new(move |ctx: Arc<Context>| -> HandlerFuture {
                let next = Arc::clone(&next);
                let stats = Arc::clone(&stats);
                Box::pin(async move {
                    let command = ctx.command_name().to_string();
                    let result = next(ctx).await;
                    let mut entry = stats.entry(command).or_default();
                    if result.is_ok() {
                        entry.succeeded += 1;
                    } else {
                        entry.failed += 1;
                    }
                    result
                })
            })
        })]
    }
}

impl CommandProvider for AuditPlugin {
    fn commands(&self) -> Vec<Arc<dyn Command>> {
        vec![Arc::new(ModStats {
            stats: Arc::clone(&self.stats),
        })]
    }
}

impl EventHandlerProvider for AuditPlugin {
    fn event_handlers(&self) -> Vec<Arc<dyn EventHandler>> {
        vec![Arc::new(MemberJoinLogger)]
    }
}

#[async_trait]
impl Shutdownable for AuditPlugin {
    async fn shutdown(&self) -> anyhow::Result<()> {
        let rows = self.stats();
        let invocations: u64 = rows.iter().map(|(_, s)| s.total()).sum();
        let failed: u64 = rows.iter().map(|(_, s)| s.failed).sum();
        info!(commands = rows.len(), invocations, failed, "Command usage summary");
        for (command, stats) in &rows {
            debug!(
                command = %command,
                succeeded = stats.succeeded,
                failed = stats.failed,
                "Command usage"
            );
        }
        Ok(())
    }
}

// ============================================================================
// /modstats
// ============================================================================

struct ModStats {
    stats: StatsMap,
}

#[async_trait]
impl Command for ModStats {
    fn name(&self) -> &str {
        "modstats"
    }

    fn description(&self) -> &str {
        "Show command usage since startup"
    }

    fn permissions(&self) -> Option<Permissions> {
        Some(Permissions::MODERATE_MEMBERS)
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        ctx.require_permissions(Permissions::MODERATE_MEMBERS)?;

        let rows = sorted(&self.stats);
        let mut embed = Embed::titled("Command usage")
            .color(0x5865F2)
            .footer("Counted since startup");
        if rows.is_empty() {
            embed = embed.description("No commands have run yet.");
        }
        for (command, stats) in rows.iter().take(MAX_EMBED_FIELDS) {
            embed = embed.field(
                format!("/{command}"),
                format!("{} succeeded, {} failed", stats.succeeded, stats.failed),
                true,
            );
        }

        ctx.send_response(InteractionResponse::embed(embed).into_ephemeral())
            .await
    }
}

// ============================================================================
// Member joins
// ============================================================================

struct MemberJoinLogger;

#[async_trait]
impl EventHandler for MemberJoinLogger {
    fn name(&self) -> &str {
        "member-join-logger"
    }

    fn handles(&self, event: &GatewayEvent) -> bool {
        matches!(event, GatewayEvent::GuildMemberAdd(_))
    }

    async fn handle(
        &self,
        _session: Option<&Arc<dyn Session>>,
        event: &GatewayEvent,
    ) -> anyhow::Result<()> {
        if let GatewayEvent::GuildMemberAdd(add) = event {
            info!(
                guild_id = %add.guild_id,
                user_id = %add.user.id,
                username = %add.user.username,
                bot = add.user.bot,
                "Member joined"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::core::{chain, handler_fn};
    use crate::error::CommandError;
    use crate::session::MemorySession;
    use tracing::Span;
    use warden_proto::{GuildMemberAdd, Interaction, User};

    fn ctx_for(name: &str, session: Option<Arc<dyn Session>>) -> Arc<Context> {
        let interaction = Interaction::application_command("1", name)
            .in_guild("900", "901")
            .from_member(User::new("100", "mod"), Permissions::MODERATE_MEMBERS);
        Arc::new(Context::new(session, Some(interaction), &Span::none()))
    }

    async fn run_counted(plugin: &AuditPlugin, name: &str, ok: bool) {
        let handler = handler_fn(move |_ctx| async move {
            if ok {
                Ok(())
            } else {
                Err(CommandError::Internal("boom".into()))
            }
        });
        let wrapped = chain(plugin.middleware()).then(handler);
        let _ = wrapped(ctx_for(name, None)).await;
    }

    #[tokio::test]
    async fn test_counts_outcomes_per_command() {
        let plugin = AuditPlugin::new();
        run_counted(&plugin, "ban", true).await;
        run_counted(&plugin, "kick", true).await;
        run_counted(&plugin, "kick", false).await;
        run_counted(&plugin, "kick", true).await;

        let stats = plugin.stats();
        assert_eq!(stats[0].0, "kick");
        assert_eq!(stats[0].1, CommandStats { succeeded: 2, failed: 1 });
        assert_eq!(stats[1].0, "ban");
        assert_eq!(stats[1].1.total(), 1);
    }

    #[tokio::test]
    async fn test_modstats_replies_privately_sorted() {
        let plugin = AuditPlugin::new();
        run_counted(&plugin, "warn", true).await;
        run_counted(&plugin, "mute", true).await;
        run_counted(&plugin, "mute", false).await;

        let session = Arc::new(MemorySession::new());
        let modstats = plugin.commands().remove(0);
        let dyn_session: Arc<dyn Session> = session.clone();
        modstats
            .execute(&ctx_for("modstats", Some(dyn_session)))
            .await
            .unwrap();

        let responses = session.responses();
        let response = &responses[0];
        assert!(response.is_ephemeral());
        let embed = &response.data.as_ref().unwrap().embeds[0];
        assert_eq!(embed.fields[0].name, "/mute");
        assert_eq!(embed.fields[0].value, "1 succeeded, 1 failed");
        assert_eq!(embed.fields[1].name, "/warn");
    }

    #[tokio::test]
    async fn test_modstats_when_empty() {
        let plugin = AuditPlugin::new();
        let session = Arc::new(MemorySession::new());
        let dyn_session: Arc<dyn Session> = session.clone();
        plugin.commands()[0]
            .execute(&ctx_for("modstats", Some(dyn_session)))
            .await
            .unwrap();

        let responses = session.responses();
        let response = &responses[0];
        let embed = &response.data.as_ref().unwrap().embeds[0];
        assert!(embed.fields.is_empty());
        assert_eq!(embed.description.as_deref(), Some("No commands have run yet."));
    }

    #[tokio::test]
    async fn test_join_logger_filters_events() {
        let handlers = AuditPlugin::new().event_handlers();
        let handler = &handlers[0];
        let join = GatewayEvent::GuildMemberAdd(GuildMemberAdd {
            guild_id: "900".into(),
            user: User::new("5", "newbie"),
        });
        let other = GatewayEvent::InteractionCreate(Interaction::application_command("1", "ban"));

        assert!(handler.handles(&join));
        assert!(!handler.handles(&other));
        handler.handle(None, &join).await.unwrap();
    }
}
