//! Per-invocation command context.
//!
//! A `Context` bundles the platform session, the inbound interaction and a
//! request-scoped span. Both the session and the interaction may be absent;
//! every accessor then degrades to its zero value instead of failing.

use crate::error::{CommandError, CommandResult};
use crate::session::Session;
use crate::telemetry::spans;
use std::sync::Arc;
use tracing::Span;
use warden_proto::{
    CommandDataOption, Embed, Interaction, InteractionResponse, OptionType, Permissions, User,
};

/// Context handed to commands and middleware for one invocation.
pub struct Context {
    session: Option<Arc<dyn Session>>,
    interaction: Option<Interaction>,
    span: Span,
}

impl Context {
    /// Create a context, opening an invocation span under `parent`.
    pub fn new(
        session: Option<Arc<dyn Session>>,
        interaction: Option<Interaction>,
        parent: &Span,
    ) -> Self {
        let mut ctx = Self {
            session,
            interaction,
            span: Span::none(),
        };
        ctx.span = spans::interaction(
            parent,
            ctx.command_name(),
            ctx.actor_id(),
            ctx.channel_id(),
            ctx.guild_id(),
        );
        ctx
    }

    pub fn session(&self) -> Option<&Arc<dyn Session>> {
        self.session.as_ref()
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    /// The invocation span.
    pub fn span(&self) -> &Span {
        &self.span
    }

    // ========================================================================
    // Options
    // ========================================================================

    fn option(&self, name: &str, kind: OptionType) -> Option<&CommandDataOption> {
        self.interaction
            .as_ref()?
            .data
            .as_ref()?
            .options
            .iter()
            .find(|opt| opt.name == name && opt.kind == kind)
    }

    /// Whether an option with this name was supplied, whatever its type.
    pub fn has_option(&self, name: &str) -> bool {
        self.interaction
            .as_ref()
            .and_then(|i| i.data.as_ref())
            .is_some_and(|data| data.options.iter().any(|opt| opt.name == name))
    }

    /// String option, or `""`.
    pub fn string_option(&self, name: &str) -> &str {
        self.option(name, OptionType::String)
            .and_then(|opt| opt.value.as_ref())
            .and_then(|value| value.as_str())
            .unwrap_or_default()
    }

    /// Integer option, or `0`.
    pub fn integer_option(&self, name: &str) -> i64 {
        self.option(name, OptionType::Integer)
            .and_then(|opt| opt.value.as_ref())
            .and_then(|value| value.as_i64())
            .unwrap_or_default()
    }

    /// Number option, or `0.0`.
    pub fn number_option(&self, name: &str) -> f64 {
        self.option(name, OptionType::Number)
            .and_then(|opt| opt.value.as_ref())
            .and_then(|value| value.as_f64())
            .unwrap_or_default()
    }

    /// Boolean option, or `false`.
    pub fn boolean_option(&self, name: &str) -> bool {
        self.option(name, OptionType::Boolean)
            .and_then(|opt| opt.value.as_ref())
            .and_then(|value| value.as_bool())
            .unwrap_or_default()
    }

    /// User option resolved through the interaction's resolved entities.
    ///
    /// Falls back to a user carrying only the id when the platform did not
    /// resolve it.
    pub fn user_option(&self, name: &str) -> Option<User> {
        let id = self
            .option(name, OptionType::User)?
            .value
            .as_ref()?
            .as_str()?;
        let resolved = self
            .interaction
            .as_ref()
            .and_then(|i| i.data.as_ref())
            .and_then(|data| data.resolved.as_ref())
            .and_then(|resolved| resolved.users.get(id));
        Some(resolved.cloned().unwrap_or_else(|| User::new(id, "")))
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// The invoking user. Guild member data wins over the top-level user.
    pub fn actor(&self) -> Option<&User> {
        let interaction = self.interaction.as_ref()?;
        interaction
            .member
            .as_ref()
            .and_then(|member| member.user.as_ref())
            .or(interaction.user.as_ref())
    }

    pub fn actor_id(&self) -> &str {
        self.actor().map(|user| user.id.as_str()).unwrap_or_default()
    }

    pub fn channel_id(&self) -> &str {
        self.interaction
            .as_ref()
            .and_then(|i| i.channel_id.as_deref())
            .unwrap_or_default()
    }

    pub fn guild_id(&self) -> &str {
        self.interaction
            .as_ref()
            .and_then(|i| i.guild_id.as_deref())
            .unwrap_or_default()
    }

    pub fn command_name(&self) -> &str {
        self.interaction
            .as_ref()
            .and_then(Interaction::command_name)
            .unwrap_or_default()
    }

    /// Permissions the platform computed for the invoking member.
    pub fn actor_permissions(&self) -> Permissions {
        self.interaction
            .as_ref()
            .and_then(|i| i.member.as_ref())
            .and_then(|member| member.permissions)
            .unwrap_or(Permissions::NONE)
    }

    /// Fail with the missing bits unless the actor holds `required`.
    pub fn require_permissions(&self, required: Permissions) -> CommandResult {
        let held = self.actor_permissions();
        if held.allows(required) {
            Ok(())
        } else {
            Err(CommandError::MissingPermissions(held.missing(required)))
        }
    }

    /// Guild id, failing for invocations outside a guild.
    pub fn require_guild(&self) -> Result<&str, CommandError> {
        match self.guild_id() {
            "" => Err(CommandError::user_facing(
                format!("/{} invoked outside a guild", self.command_name()),
                "This command can only be used in a server.",
            )),
            guild_id => Ok(guild_id),
        }
    }

    // ========================================================================
    // Responses
    // ========================================================================

    /// Send a visible text reply.
    pub async fn respond(&self, content: impl Into<String>) -> CommandResult {
        self.send_response(InteractionResponse::message(content)).await
    }

    /// Send a reply only the invoking user can see.
    pub async fn respond_ephemeral(&self, content: impl Into<String>) -> CommandResult {
        self.send_response(InteractionResponse::ephemeral(content)).await
    }

    /// Send a visible embed reply.
    pub async fn respond_embed(&self, embed: Embed) -> CommandResult {
        self.send_response(InteractionResponse::embed(embed)).await
    }

    /// Send an arbitrary response. Repeated calls are not prevented.
    pub async fn send_response(&self, response: InteractionResponse) -> CommandResult {
        let (Some(session), Some(interaction)) = (&self.session, &self.interaction) else {
            return Err(CommandError::NoSession);
        };
        session
            .create_interaction_response(&interaction.id, &interaction.token, &response)
            .await?;
        Ok(())
    }
}
