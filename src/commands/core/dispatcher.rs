//! Interaction dispatch.
//!
//! The `Dispatcher` resolves an inbound interaction to a registered command,
//! runs it through the middleware chain, and is the single place that
//! decides what a failing invocation shows the user.

use super::context::Context;
use super::middleware::{Chain, HandlerFn, handler_fn};
use super::registry::CommandRegistry;
use crate::error::GENERIC_ERROR_MESSAGE;
use crate::session::Session;
use crate::telemetry::spans;
use std::sync::Arc;
use tracing::{Instrument, Span, error, warn};
use warden_proto::{Interaction, InteractionResponse};

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a dispatchable command invocation.
    Rejected,
    /// No command registered under the invoked name.
    NotFound,
    Completed,
    /// The command returned an error; the user was told.
    Failed,
}

/// Routes interactions to commands.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    session: Option<Arc<dyn Session>>,
    chain: Option<Chain>,
    span: Span,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, session: Option<Arc<dyn Session>>) -> Self {
        Self {
            registry,
            session,
            chain: None,
            span: spans::dispatcher(),
        }
    }

    /// Wrap every command in `chain`.
    pub fn with_middleware(mut self, chain: Chain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Run one interaction to completion.
    pub async fn dispatch(&self, interaction: Option<Interaction>) -> DispatchOutcome {
        let Some(interaction) = interaction else {
            warn!("Rejected dispatch without an interaction");
            return DispatchOutcome::Rejected;
        };
        if !interaction.is_application_command() {
            warn!(interaction_id = %interaction.id, kind = ?interaction.kind, "Rejected non-command interaction");
            return DispatchOutcome::Rejected;
        }
        let name = match interaction.command_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                warn!(interaction_id = %interaction.id, "Rejected interaction without a command name");
                return DispatchOutcome::Rejected;
            }
        };

        let Some(command) = self.registry.get(&name) else {
            return self.not_found(&name, interaction).await;
        };

        let ctx = Arc::new(Context::new(
            self.session.clone(),
            Some(interaction),
            &self.span,
        ));
        let terminal: HandlerFn = handler_fn(move |ctx: Arc<Context>| {
            let command = Arc::clone(&command);
            async move { command.execute(&ctx).await }
        });
        let handler = match &self.chain {
            Some(chain) => chain.then(terminal),
            None => terminal,
        };

        let span = ctx.span().clone();
        match handler(Arc::clone(&ctx)).instrument(span).await {
            Ok(()) => DispatchOutcome::Completed,
            Err(e) => {
                error!(
                    command = %name,
                    actor_id = %ctx.actor_id(),
                    guild_id = %ctx.guild_id(),
                    error = %e,
                    error_code = e.error_code(),
                    "Command error"
                );
                let message = e
                    .user_message()
                    .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
                if let Err(send_err) = ctx.respond_ephemeral(message).await {
                    warn!(command = %name, error = %send_err, "Failed to send error response");
                }
                DispatchOutcome::Failed
            }
        }
    }

    async fn not_found(&self, name: &str, interaction: Interaction) -> DispatchOutcome {
        let ctx = Context::new(self.session.clone(), Some(interaction), &self.span);
        error!(
            command = %name,
            actor_id = %ctx.actor_id(),
            guild_id = %ctx.guild_id(),
            "Unknown command"
        );
        let response = InteractionResponse::ephemeral(format!("Command `/{name}` was not found."));
        if let Err(e) = ctx.send_response(response).await {
            warn!(command = %name, error = %e, "Failed to send not-found response");
        }
        DispatchOutcome::NotFound
    }
}
