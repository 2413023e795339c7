//! Telemetry utilities for command timing and span construction.

use std::time::Instant;

/// Guard for timing a command invocation.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Standardized span constructors for bot observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one command invocation.
    pub fn interaction(
        parent: &Span,
        command: &str,
        actor_id: &str,
        channel_id: &str,
        guild_id: &str,
    ) -> Span {
        info_span!(
            parent: parent,
            "interaction",
            command = %command,
            actor_id = %actor_id,
            channel_id = %channel_id,
            guild_id = %guild_id,
        )
    }

    /// Create a span for a plugin's lifecycle hooks.
    pub fn plugin(name: &str, version: &str) -> Span {
        info_span!("plugin", name = %name, version = %version)
    }

    /// Create the root span of a dispatcher.
    pub fn dispatcher() -> Span {
        info_span!("dispatcher")
    }

    /// Create a span for one gateway event.
    pub fn event(name: &str) -> Span {
        info_span!("gateway.event", event = %name)
    }
}
