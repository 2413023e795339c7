//! Core command infrastructure.
//!
//! This module contains the fundamental types of the dispatch pipeline:
//!
//! - [`Command`]: the contract every slash command implements
//! - [`CommandRegistry`]: name → command map, exportable as catalog descriptors
//! - [`Context`]: per-invocation façade over the session and the interaction
//! - [`Chain`]: ordered middleware composition, plus the stock
//!   [`recovery`] and [`logging`] layers
//! - [`Dispatcher`]: interaction → registry → context → chain → command

pub mod context;
pub mod dispatcher;
pub mod middleware;
pub mod registry;
pub mod traits;

pub use context::Context;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use middleware::{
    Chain, HandlerFn, HandlerFuture, Middleware, chain, handler_fn, logging, middleware_fn,
    recovery,
};
pub use registry::CommandRegistry;
pub use traits::{Command, Constraints, Parameter, descriptor};
