//! Session that prints every platform call as a JSON line.

use super::{Session, SessionError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::io::{Stdout, Write};
use tracing::info;
use warden_proto::{ApplicationCommand, InteractionResponse};

/// Writes `{"action": ..., ...}` lines to a writer, stdout by default.
pub struct ConsoleSession<W: Write + Send = Stdout> {
    writer: Mutex<W>,
}

impl ConsoleSession<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSession<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn emit(&self, line: Value) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(&line)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{encoded}")?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> Session for ConsoleSession<W> {
    async fn create_interaction_response(
        &self,
        interaction_id: &str,
        _token: &str,
        response: &InteractionResponse,
    ) -> Result<(), SessionError> {
        self.emit(json!({
            "action": "respond",
            "interaction_id": interaction_id,
            "response": response,
        }))
    }

    async fn ban_member(
        &self,
        guild_id: &str,
        user_id: &str,
        delete_message_seconds: u32,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        info!(guild_id = %guild_id, user_id = %user_id, "Ban");
        self.emit(json!({
            "action": "ban",
            "guild_id": guild_id,
            "user_id": user_id,
            "delete_message_seconds": delete_message_seconds,
            "reason": reason,
        }))
    }

    async fn unban_member(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        info!(guild_id = %guild_id, user_id = %user_id, "Unban");
        self.emit(json!({
            "action": "unban",
            "guild_id": guild_id,
            "user_id": user_id,
            "reason": reason,
        }))
    }

    async fn kick_member(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        info!(guild_id = %guild_id, user_id = %user_id, "Kick");
        self.emit(json!({
            "action": "kick",
            "guild_id": guild_id,
            "user_id": user_id,
            "reason": reason,
        }))
    }

    async fn timeout_member(
        &self,
        guild_id: &str,
        user_id: &str,
        until: Option<DateTime<Utc>>,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        info!(guild_id = %guild_id, user_id = %user_id, until = ?until, "Timeout");
        self.emit(json!({
            "action": "timeout",
            "guild_id": guild_id,
            "user_id": user_id,
            "until": until.map(|t| t.to_rfc3339()),
            "reason": reason,
        }))
    }

    async fn send_direct_message(&self, user_id: &str, content: &str) -> Result<(), SessionError> {
        self.emit(json!({
            "action": "direct_message",
            "user_id": user_id,
            "content": content,
        }))
    }

    async fn overwrite_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &[ApplicationCommand],
    ) -> Result<(), SessionError> {
        info!(count = commands.len(), guild_id = ?guild_id, "Overwriting command catalog");
        self.emit(json!({
            "action": "overwrite_commands",
            "application_id": application_id,
            "guild_id": guild_id,
            "commands": commands,
        }))
    }
}
