//! Fixtures for command unit tests.

use super::core::{Command, Context};
use crate::error::CommandResult;
use crate::session::MemorySession;
use std::sync::Arc;
use tracing::Span;
use warden_proto::{Interaction, OptionType, Permissions, User};

pub const GUILD: &str = "900";
pub const MODERATOR: &str = "100";
pub const TARGET: &str = "200";

/// `/name` invoked in the test guild by the moderator holding `permissions`.
pub fn invocation(name: &str, permissions: Permissions) -> Interaction {
    Interaction::application_command("1", name)
        .in_guild(GUILD, "901")
        .from_member(User::new(MODERATOR, "moderator"), permissions)
}

/// Same as [`invocation`], targeting the test user.
pub fn targeting(name: &str, permissions: Permissions) -> Interaction {
    invocation(name, permissions)
        .with_option("user", OptionType::User, serde_json::json!(TARGET))
        .with_resolved_user(User::new(TARGET, "spammer"))
}

/// Execute `command` directly against a fresh recording session.
pub async fn run(command: &dyn Command, interaction: Interaction) -> (Arc<MemorySession>, CommandResult) {
    let session = Arc::new(MemorySession::new());
    let result = run_with(command, interaction, session.clone()).await;
    (session, result)
}

pub async fn run_with(
    command: &dyn Command,
    interaction: Interaction,
    session: Arc<MemorySession>,
) -> CommandResult {
    let ctx = Context::new(Some(session), Some(interaction), &Span::none());
    command.execute(&ctx).await
}
