//! Middleware composition around command handlers.
//!
//! A [`HandlerFn`] turns a shared [`Context`] into a [`CommandResult`]; a
//! [`Middleware`] turns one `HandlerFn` into another. A [`Chain`] folds its
//! layers right to left so the first layer ends up outermost.

use super::context::Context;
use crate::error::{CommandError, CommandResult};
use crate::telemetry::CommandTimer;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Once};
use tracing::{error, info};

/// Future returned by a handler.
pub type HandlerFuture = BoxFuture<'static, CommandResult>;

/// A handler function: context in, result out.
pub type HandlerFn = Arc<dyn Fn(Arc<Context>) -> HandlerFuture + Send + Sync>;

/// A handler transformer.
pub type Middleware = Arc<dyn Fn(HandlerFn) -> HandlerFn + Send + Sync>;

/// Wrap an async closure as a [`HandlerFn`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CommandResult> + Send + 'static,
{
    Arc::new(move |ctx| -> HandlerFuture { Box::pin(f(ctx)) })
}

/// Wrap a closure as a [`Middleware`].
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(HandlerFn) -> HandlerFn + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered middleware stack.
#[derive(Clone, Default)]
pub struct Chain {
    layers: Vec<Middleware>,
}

impl Chain {
    pub fn new(layers: Vec<Middleware>) -> Self {
        Self { layers }
    }

    /// Add an innermost layer.
    pub fn push(&mut self, layer: Middleware) -> &mut Self {
        self.layers.push(layer);
        self
    }

    pub fn extend(&mut self, layers: impl IntoIterator<Item = Middleware>) -> &mut Self {
        self.layers.extend(layers);
        self
    }

    /// Concatenate two chains; `self` stays outside `other`.
    pub fn append(mut self, other: Chain) -> Chain {
        self.layers.extend(other.layers);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Wrap `handler` so that the first layer runs first.
    pub fn then(&self, handler: HandlerFn) -> HandlerFn {
        self.layers
            .iter()
            .rev()
            .fold(handler, |next, layer| layer(next))
    }
}

/// Build a chain from a list of layers.
pub fn chain(layers: impl IntoIterator<Item = Middleware>) -> Chain {
    Chain::new(layers.into_iter().collect())
}

// ============================================================================
// Stock middleware
// ============================================================================

/// Where a panic happened, recorded by the panic hook before unwinding.
struct PanicSite {
    location: Option<String>,
    backtrace: Backtrace,
}

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook in front of the existing one that keeps the panicking
/// thread's backtrace. Installed once per process.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let site = PanicSite {
                location: info.location().map(ToString::to_string),
                backtrace: Backtrace::force_capture(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(site));
            previous(info);
        }));
    });
}

/// The site recorded for the latest panic on this thread, if any.
fn take_panic_site() -> Option<PanicSite> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}

/// Convert panics below this layer into [`CommandError::Panic`].
///
/// The catch and the unwind happen within the same poll, so the site left by
/// the panic hook on this thread belongs to the caught panic.
pub fn recovery() -> Middleware {
    install_panic_hook();
    middleware_fn(|next: HandlerFn| -> HandlerFn {
        Arc::new(move |ctx: Arc<Context>| -> HandlerFuture {
            let next = Arc::clone(&next);
            Box::pin(async move {
                let inner = Arc::clone(&ctx);
                match AssertUnwindSafe(async move { next(inner).await })
                    .catch_unwind()
                    .await
                {
                    Ok(result) => result,
                    Err(payload) => {
                        let detail = panic_detail(payload.as_ref());
                        let site = take_panic_site().unwrap_or_else(|| PanicSite {
                            location: None,
                            backtrace: Backtrace::force_capture(),
                        });
                        error!(
                            command = %ctx.command_name(),
                            actor_id = %ctx.actor_id(),
                            guild_id = %ctx.guild_id(),
                            panic = %detail,
                            location = site.location.as_deref().unwrap_or("unknown"),
                            backtrace = %site.backtrace,
                            "Command panicked"
                        );
                        Err(CommandError::Panic(detail))
                    }
                }
            })
        })
    })
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Log one structured event per invocation with its outcome and latency.
pub fn logging() -> Middleware {
    middleware_fn(|next: HandlerFn| -> HandlerFn {
        Arc::new(move |ctx: Arc<Context>| -> HandlerFuture {
            let next = Arc::clone(&next);
            Box::pin(async move {
                let timer = CommandTimer::new(ctx.command_name());
                let result = next(Arc::clone(&ctx)).await;
                let elapsed_ms = timer.elapsed_ms();

                match &result {
                    Ok(()) => info!(
                        command = %timer.command(),
                        actor_id = %ctx.actor_id(),
                        guild_id = %ctx.guild_id(),
                        elapsed_ms,
                        "Command completed"
                    ),
                    Err(e) => error!(
                        command = %timer.command(),
                        actor_id = %ctx.actor_id(),
                        guild_id = %ctx.guild_id(),
                        elapsed_ms,
                        error = %e,
                        error_code = e.error_code(),
                        "Command failed"
                    ),
                }
                result
            })
        })
    })
}
