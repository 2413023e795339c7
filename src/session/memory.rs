//! In-memory session that records every call.
//!
//! Used by tests and dry runs in place of a live platform connection.

use super::{Session, SessionError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use warden_proto::{ApplicationCommand, InteractionResponse};

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    Respond {
        interaction_id: String,
        response: InteractionResponse,
    },
    Ban {
        guild_id: String,
        user_id: String,
        delete_message_seconds: u32,
        reason: Option<String>,
    },
    Unban {
        guild_id: String,
        user_id: String,
        reason: Option<String>,
    },
    Kick {
        guild_id: String,
        user_id: String,
        reason: Option<String>,
    },
    Timeout {
        guild_id: String,
        user_id: String,
        until: Option<DateTime<Utc>>,
        reason: Option<String>,
    },
    DirectMessage {
        user_id: String,
        content: String,
    },
    OverwriteCommands {
        application_id: String,
        guild_id: Option<String>,
        commands: Vec<ApplicationCommand>,
    },
}

/// Session that records calls instead of talking to the platform.
///
/// Each category of call can be switched to fail with a 503-style API error.
#[derive(Debug, Default)]
pub struct MemorySession {
    calls: Mutex<Vec<SessionCall>>,
    fail_responses: AtomicBool,
    fail_actions: AtomicBool,
    fail_direct_messages: AtomicBool,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make interaction responses fail.
    pub fn fail_responses(&self, fail: bool) {
        self.fail_responses.store(fail, Ordering::SeqCst);
    }

    /// Make moderation actions (ban, kick, timeout...) fail.
    pub fn fail_actions(&self, fail: bool) {
        self.fail_actions.store(fail, Ordering::SeqCst);
    }

    /// Make direct messages fail.
    pub fn fail_direct_messages(&self, fail: bool) {
        self.fail_direct_messages.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every call so far, in order.
    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().clone()
    }

    /// Interaction responses only.
    pub fn responses(&self) -> Vec<InteractionResponse> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SessionCall::Respond { response, .. } => Some(response.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, flag: &AtomicBool, call: SessionCall) -> Result<(), SessionError> {
        if flag.load(Ordering::SeqCst) {
            return Err(SessionError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn create_interaction_response(
        &self,
        interaction_id: &str,
        _token: &str,
        response: &InteractionResponse,
    ) -> Result<(), SessionError> {
        self.record(
            &self.fail_responses,
            SessionCall::Respond {
                interaction_id: interaction_id.to_string(),
                response: response.clone(),
            },
        )
    }

    async fn ban_member(
        &self,
        guild_id: &str,
        user_id: &str,
        delete_message_seconds: u32,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        self.record(
            &self.fail_actions,
            SessionCall::Ban {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
                delete_message_seconds,
                reason: reason.map(str::to_string),
            },
        )
    }

    async fn unban_member(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        self.record(
            &self.fail_actions,
            SessionCall::Unban {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
                reason: reason.map(str::to_string),
            },
        )
    }

    async fn kick_member(
        &self,
        guild_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        self.record(
            &self.fail_actions,
            SessionCall::Kick {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
                reason: reason.map(str::to_string),
            },
        )
    }

    async fn timeout_member(
        &self,
        guild_id: &str,
        user_id: &str,
        until: Option<DateTime<Utc>>,
        reason: Option<&str>,
    ) -> Result<(), SessionError> {
        self.record(
            &self.fail_actions,
            SessionCall::Timeout {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
                until,
                reason: reason.map(str::to_string),
            },
        )
    }

    async fn send_direct_message(&self, user_id: &str, content: &str) -> Result<(), SessionError> {
        self.record(
            &self.fail_direct_messages,
            SessionCall::DirectMessage {
                user_id: user_id.to_string(),
                content: content.to_string(),
            },
        )
    }

    async fn overwrite_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &[ApplicationCommand],
    ) -> Result<(), SessionError> {
        self.record(
            &self.fail_actions,
            SessionCall::OverwriteCommands {
                application_id: application_id.to_string(),
                guild_id: guild_id.map(str::to_string),
                commands: commands.to_vec(),
            },
        )
    }
}
