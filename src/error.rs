//! Unified error handling for warden.
//!
//! This module provides the error hierarchy for the dispatch pipeline, with
//! stable error codes for log labeling and the user-facing text the
//! dispatcher shows when a command fails.

use crate::session::SessionError;
use thiserror::Error;
use warden_proto::Permissions;

/// Reply shown when a command fails without a user-safe explanation.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong while running that command. Please try again later.";

// ============================================================================
// Command Errors (command execution)
// ============================================================================

/// Errors a command, middleware or context operation can return.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A missing or malformed argument.
    #[error("invalid value for `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// A business-rule violation with a message that is safe to show.
    ///
    /// `Display` renders the internal diagnostic; the user only ever sees
    /// `external`.
    #[error("{internal}")]
    UserFacing { internal: String, external: String },

    #[error("missing permissions: {0}")]
    MissingPermissions(Permissions),

    #[error("no session available to send a response")]
    NoSession,

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// A panic caught by the recovery middleware.
    #[error("command panicked: {0}")]
    Panic(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    /// Build a validation failure for `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a failure carrying separate log and user messages.
    pub fn user_facing(internal: impl Into<String>, external: impl Into<String>) -> Self {
        Self::UserFacing {
            internal: internal.into(),
            external: external.into(),
        }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::UserFacing { .. } => "user_facing",
            Self::MissingPermissions(_) => "missing_permissions",
            Self::NoSession => "no_session",
            Self::Session(_) => "session_error",
            Self::Panic(_) => "panic",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Text that is safe to show the invoking user.
    ///
    /// Returns `None` for infrastructure failures; callers fall back to
    /// [`GENERIC_ERROR_MESSAGE`].
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Validation { field, reason } => Some(format!("Invalid `{field}`: {reason}")),
            Self::UserFacing { external, .. } => Some(external.clone()),
            Self::MissingPermissions(missing) => Some(format!(
                "You need the following permissions to use this command: {missing}"
            )),
            Self::Panic(_) => Some(GENERIC_ERROR_MESSAGE.to_string()),

            // These errors don't get a specific reply
            Self::NoSession | Self::Session(_) | Self::Internal(_) => None,
        }
    }
}

/// Result type for commands and middleware.
pub type CommandResult = Result<(), CommandError>;

// ============================================================================
// Registry Errors
// ============================================================================

/// Command registration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command name is empty")]
    EmptyName,

    #[error(
        "invalid command name {0:?}: expected 1-32 lowercase letters, digits, '-' or '_'"
    )]
    InvalidName(String),

    #[error("command {0:?} is already registered")]
    DuplicateName(String),
}

// ============================================================================
// Plugin Errors
// ============================================================================

/// Plugin registration and lifecycle failures.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin name is empty")]
    EmptyName,

    #[error("plugin {name:?} has invalid version {version:?}")]
    InvalidVersion { name: String, version: String },

    #[error("plugin {0:?} is already registered")]
    Duplicate(String),

    #[error("plugin {name:?} failed to initialize: {source}")]
    Init {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

// ============================================================================
// Bot Errors (runtime wiring)
// ============================================================================

/// Failures while assembling or operating the bot runtime.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("no session configured")]
    NoSession,

    #[error(transparent)]
    Session(#[from] SessionError),
}
