//! Interaction builders and test commands.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use warden::CommandResult;
use warden::commands::core::{Command, Context};
use warden::proto::{Interaction, OptionType, Permissions, User};

pub const GUILD: &str = "900";
pub const CHANNEL: &str = "901";
pub const MODERATOR: &str = "100";
pub const TARGET: &str = "200";

/// `/name` invoked in the test guild by a moderator holding `permissions`.
pub fn invocation(name: &str, permissions: Permissions) -> Interaction {
    Interaction::application_command("1", name)
        .in_guild(GUILD, CHANNEL)
        .from_member(User::new(MODERATOR, "moderator"), permissions)
}

/// Same as [`invocation`], with the `user` option pointing at `target`.
pub fn targeting(name: &str, permissions: Permissions, target: &str) -> Interaction {
    invocation(name, permissions)
        .with_option("user", OptionType::User, json!(target))
        .with_resolved_user(User::new(target, "someone"))
}

/// Replies with fixed text and counts its runs.
pub struct Replies {
    pub name: &'static str,
    pub text: &'static str,
    pub runs: AtomicUsize,
}

impl Replies {
    pub fn new(name: &'static str, text: &'static str) -> Self {
        Self {
            name,
            text,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Command for Replies {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Replies with fixed text"
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        ctx.respond(self.text).await
    }
}

/// Panics with a message that must never reach the user.
pub struct Panics;

#[async_trait]
impl Command for Panics {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Always panics"
    }

    async fn execute(&self, ctx: &Context) -> CommandResult {
        let secrets: Vec<&'static str> = Vec::new();
        ctx.respond(read_secret(&secrets)).await
    }
}

/// Name that [`Panics`] leaves in the recorded backtrace.
pub const PANICKING_FN: &str = "read_secret";

#[inline(never)]
fn read_secret(secrets: &[&'static str]) -> &'static str {
    secrets[3]
}
