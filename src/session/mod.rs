//! Platform session boundary.
//!
//! The live gateway/REST client is supplied from outside the crate; this
//! module only defines the contract the pipeline consumes, plus two
//! in-process implementations:
//!
//! - [`MemorySession`]: records every call, with switchable failures
//! - [`ConsoleSession`]: writes every call as a JSON line

mod console;
mod memory;

pub use console::ConsoleSession;
pub use memory::{MemorySession, SessionCall};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use warden_proto::{ApplicationCommand, InteractionResponse};

/// Errors surfaced by a platform session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("platform API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operations the bot performs against the chat platform.
///
/// Calls are neither retried nor time-bounded by the pipeline; wrap the
/// session if timeouts are needed.
#[async_trait]
pub trait Session: Send + Sync {
    /// Reply to an interaction.
    async fn create_interaction_response(
        &self,
        interaction_id: &str,
        token: &str,
        response: &InteractionResponse,
    ) -> Result<(), SessionError>;

    /// Ban a user from a guild, deleting their recent messages.
    async fn ban_member(
        &self,
        guild_id: &str,
        user_id: &str,
        delete_message_seconds: u32,
        reason: Option<&str>,
    ) -> Result<(), SessionError>;

    /// Lift a ban.
    async fn unban_member(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<(), SessionError>;

    /// Remove a member from a guild.
    async fn kick_member(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<(), SessionError>;

    /// Time a member out until `until`, or clear the timeout with `None`.
    async fn timeout_member(
        &self,
        guild_id: &str,
        user_id: &str,
        until: Option<DateTime<Utc>>,
        reason: Option<&str>,
    ) -> Result<(), SessionError>;

    /// Send a direct message to a user.
    async fn send_direct_message(&self, user_id: &str, content: &str) -> Result<(), SessionError>;

    /// Replace the application's command catalog, globally or for one guild.
    async fn overwrite_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &[ApplicationCommand],
    ) -> Result<(), SessionError>;
}
