//! # warden
//!
//! A moderation bot built around a pluggable command dispatch pipeline.
//!
//! An inbound interaction flows through the pipeline like this:
//!
//! ```text
//! GatewayEvent → Bot → Dispatcher → CommandRegistry → Context
//!              → Chain [recovery, logging, plugin middleware…] → Command::execute
//! ```
//!
//! - [`commands::core`]: the command contract, registry, context, middleware
//!   chain and dispatcher
//! - [`commands`]: the moderation commands
//! - [`plugins`]: plugin contract, registry, loader and the bundled plugins
//! - [`session`]: the platform session boundary and two in-process sessions
//! - [`bot`]: the runtime that wires it all together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden::{Bot, config::Config, plugins, session::MemorySession};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load("config.toml")?;
//! let bot = Bot::builder(config)
//!     .session(Arc::new(MemorySession::new()))
//!     .plugins(plugins::bundled())
//!     .build()
//!     .await?;
//! bot.sync_commands().await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod plugins;
pub mod session;
pub mod telemetry;

pub use bot::{Bot, BotBuilder};
pub use error::{BotError, CommandError, CommandResult, PluginError, RegistryError};
pub use warden_proto as proto;
