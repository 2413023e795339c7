//! End-to-end dispatch through a built bot.
//!
//! Covers command resolution, error mapping to user replies, panic recovery
//! and the log events each path emits.

mod common;

use common::fixtures::{GUILD, MODERATOR, PANICKING_FN, TARGET};
use common::{LogCapture, Panics, Replies, invocation, targeting};
use std::sync::Arc;
use tracing::Level;
use warden::commands::core::{DispatchOutcome, chain, handler_fn, middleware_fn};
use warden::config::Config;
use warden::error::GENERIC_ERROR_MESSAGE;
use warden::proto::{GatewayEvent, Interaction, Permissions, User};
use warden::session::{MemorySession, SessionCall};
use warden::{Bot, plugins};

fn config() -> Config {
    let mut config = Config::default();
    config.bot.application_id = "77".into();
    config
}

async fn bot_with(session: &Arc<MemorySession>) -> Bot {
    Bot::builder(config())
        .session(session.clone())
        .plugins(plugins::bundled())
        .command(Arc::new(Panics))
        .command(Arc::new(Replies::new("ping", "pong")))
        .build()
        .await
        .unwrap()
}

async fn dispatch(bot: &Bot, interaction: Interaction) -> Option<DispatchOutcome> {
    bot.handle_event(GatewayEvent::InteractionCreate(interaction))
        .await
}

#[tokio::test]
async fn test_unknown_command_replies_once_and_logs_once() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;
    logs.clear();

    let outcome = dispatch(&bot, invocation("nope", Permissions::NONE)).await;

    assert_eq!(outcome, Some(DispatchOutcome::NotFound));
    let responses = session.responses();
    assert_eq!(responses.len(), 1);
    assert!(responses[0].is_ephemeral());
    assert_eq!(
        responses[0].content(),
        Some("Command `/nope` was not found.")
    );

    let errors = logs.at_level(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Unknown command");
    assert_eq!(errors[0].field("command"), Some("nope"));
    assert_eq!(errors[0].field("guild_id"), Some(GUILD));
}

#[tokio::test]
async fn test_successful_command_logs_completion() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;

    let outcome = dispatch(&bot, invocation("ping", Permissions::NONE)).await;

    assert_eq!(outcome, Some(DispatchOutcome::Completed));
    assert_eq!(session.responses()[0].content(), Some("pong"));
    assert!(!session.responses()[0].is_ephemeral());

    let completed = logs.with_message("Command completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].level, Level::INFO);
    assert_eq!(completed[0].field("command"), Some("ping"));
    assert_eq!(completed[0].field("actor_id"), Some(MODERATOR));
    assert!(completed[0].field("elapsed_ms").is_some());
    assert!(logs.at_level(Level::ERROR).is_empty());
}

#[tokio::test]
async fn test_user_facing_error_reaches_user() {
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;

    let outcome = dispatch(
        &bot,
        targeting("ban", Permissions::BAN_MEMBERS, MODERATOR),
    )
    .await;

    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    let responses = session.responses();
    assert_eq!(responses.len(), 1);
    assert!(responses[0].is_ephemeral());
    assert_eq!(responses[0].content(), Some("You can't ban yourself."));
    // Nothing reached the platform besides the reply
    assert_eq!(session.calls().len(), 1);
}

#[tokio::test]
async fn test_validation_error_names_the_field() {
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;

    let outcome = dispatch(&bot, invocation("kick", Permissions::KICK_MEMBERS)).await;

    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    assert_eq!(
        session.responses()[0].content(),
        Some("Invalid `user`: a user is required")
    );
}

#[tokio::test]
async fn test_failed_command_logs_failure() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;
    logs.clear();

    let outcome = dispatch(&bot, invocation("kick", Permissions::KICK_MEMBERS)).await;

    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    let failed = logs.with_message("Command failed");
    assert_eq!(failed.len(), 1);
    let event = &failed[0];
    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.field("command"), Some("kick"));
    assert_eq!(event.field("actor_id"), Some(MODERATOR));
    assert_eq!(event.field("guild_id"), Some(GUILD));
    assert!(event.field("elapsed_ms").is_some());
    assert!(
        event
            .field("error")
            .is_some_and(|error| error.contains("user"))
    );
    assert_eq!(event.field("error_code"), Some("validation"));
    assert!(logs.with_message("Command completed").is_empty());
}

#[tokio::test]
async fn test_missing_permissions_are_listed() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;
    logs.clear();

    let outcome = dispatch(&bot, targeting("ban", Permissions::NONE, TARGET)).await;

    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    let reply = session.responses()[0].content().unwrap_or_default().to_string();
    assert!(reply.starts_with("You need the following permissions"));
    assert!(reply.contains("BAN_MEMBERS"));
    assert!(
        !session
            .calls()
            .iter()
            .any(|call| matches!(call, SessionCall::Ban { .. }))
    );

    let failed = logs.with_message("Command error");
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].field("error_code"), Some("missing_permissions"));
}

#[tokio::test]
async fn test_panic_is_recovered_with_generic_reply() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;

    let outcome = dispatch(&bot, invocation("explode", Permissions::NONE)).await;

    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    let responses = session.responses();
    assert_eq!(responses.len(), 1);
    assert!(responses[0].is_ephemeral());
    assert_eq!(responses[0].content(), Some(GENERIC_ERROR_MESSAGE));
    assert!(!responses[0].content().unwrap_or_default().contains("index out of bounds"));

    let panicked = logs.with_message("Command panicked");
    assert_eq!(panicked.len(), 1);
    assert!(
        panicked[0]
            .field("panic")
            .is_some_and(|detail| detail.contains("index out of bounds"))
    );
    assert!(
        panicked[0]
            .field("location")
            .is_some_and(|location| location.contains("fixtures.rs"))
    );
    // Captured where the panic happened, not after unwinding
    assert!(
        panicked[0]
            .field("backtrace")
            .is_some_and(|backtrace| backtrace.contains(PANICKING_FN))
    );

    // The bot keeps serving after a panic
    let outcome = dispatch(&bot, invocation("ping", Permissions::NONE)).await;
    assert_eq!(outcome, Some(DispatchOutcome::Completed));
}

#[tokio::test]
async fn test_failed_error_reply_is_only_logged() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;
    session.fail_responses(true);

    let outcome = dispatch(&bot, invocation("ping", Permissions::NONE)).await;

    // The command's own reply failed, so the error reply fails too
    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    assert!(session.responses().is_empty());
    let warned = logs.with_message("Failed to send error response");
    assert_eq!(warned.len(), 1);
    assert_eq!(warned[0].level, Level::WARN);

    let errors = logs.with_message("Command error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("error_code"), Some("session_error"));
}

#[tokio::test]
async fn test_non_interaction_events_do_not_dispatch() {
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;

    let event: GatewayEvent = serde_json::from_str(
        r#"{"t":"GUILD_MEMBER_ADD","d":{"guild_id":"900","user":{"id":"5","username":"newbie"}}}"#,
    )
    .unwrap();

    assert_eq!(bot.handle_event(event).await, None);
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn test_direct_message_invocation_of_guild_command() {
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;
    let interaction = Interaction::application_command("1", "kick")
        .from_user(User::new(MODERATOR, "moderator"));

    let outcome = dispatch(&bot, interaction).await;

    assert_eq!(outcome, Some(DispatchOutcome::Failed));
    assert_eq!(
        session.responses()[0].content(),
        Some("This command can only be used in a server.")
    );
}

#[tokio::test]
async fn test_plugin_middleware_runs_inside_stock_layers() {
    let (logs, _guard) = LogCapture::install();
    let session = Arc::new(MemorySession::new());
    let bot = bot_with(&session).await;

    dispatch(&bot, invocation("ping", Permissions::NONE)).await;
    dispatch(&bot, invocation("kick", Permissions::KICK_MEMBERS)).await;
    let outcome = dispatch(&bot, invocation("modstats", Permissions::MODERATE_MEMBERS)).await;

    assert_eq!(outcome, Some(DispatchOutcome::Completed));
    let responses = session.responses();
    let stats = responses.last().unwrap();
    let embed = &stats.data.as_ref().unwrap().embeds[0];
    let kick = embed.fields.iter().find(|f| f.name == "/kick").unwrap();
    assert_eq!(kick.value, "0 succeeded, 1 failed");
    let ping = embed.fields.iter().find(|f| f.name == "/ping").unwrap();
    assert_eq!(ping.value, "1 succeeded, 0 failed");
    assert_eq!(logs.with_message("Command completed").len(), 2);
}

#[tokio::test]
async fn test_dispatcher_without_bot_uses_custom_chain() {
    use parking_lot::Mutex;
    use warden::commands::core::{CommandRegistry, Dispatcher, HandlerFn};

    let registry = Arc::new(CommandRegistry::new());
    registry
        .register(Arc::new(Replies::new("ping", "pong")))
        .unwrap();
    let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let tag = |label: &'static str, seen: Arc<Mutex<Vec<&'static str>>>| {
        middleware_fn(move |next: HandlerFn| {
            let seen = Arc::clone(&seen);
            handler_fn(move |ctx| {
                seen.lock().push(label);
                let next = Arc::clone(&next);
                async move { next(ctx).await }
            })
        })
    };

    let session = Arc::new(MemorySession::new());
    let dispatcher = Dispatcher::new(registry, Some(session.clone())).with_middleware(chain([
        tag("outer", Arc::clone(&seen)),
        tag("inner", Arc::clone(&seen)),
    ]));

    let outcome = dispatcher
        .dispatch(Some(invocation("ping", Permissions::NONE)))
        .await;

    assert_eq!(outcome, DispatchOutcome::Completed);
    assert_eq!(*seen.lock(), ["outer", "inner"]);
    assert_eq!(session.responses().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch() {
    let session = Arc::new(MemorySession::new());
    let bot = Arc::new(bot_with(&session).await);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..64 {
        let bot = Arc::clone(&bot);
        tasks.spawn(async move {
            let name = if i % 2 == 0 { "ping" } else { "explode" };
            dispatch(&bot, invocation(name, Permissions::NONE)).await
        });
    }

    let mut completed = 0;
    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Some(DispatchOutcome::Completed) => completed += 1,
            Some(DispatchOutcome::Failed) => failed += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(completed, 32);
    assert_eq!(failed, 32);
    assert_eq!(session.responses().len(), 64);
}
