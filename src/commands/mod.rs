//! Slash commands.
//!
//! This module contains the dispatch pipeline in [`core`] and the moderation
//! commands built on top of it.
//!
//! ## Moderation commands
//!
//! | command | permission |
//! |---|---|
//! | `/ban`, `/unban` | `BAN_MEMBERS` |
//! | `/kick` | `KICK_MEMBERS` |
//! | `/mute`, `/unmute`, `/warn` | `MODERATE_MEMBERS` |
//!
//! Every moderation command needs a guild, refuses to target the invoking
//! user, and reports the action in a visible reply.

pub mod core;

mod ban;
mod common;
mod duration;
mod kick;
mod mute;
mod warn;

#[cfg(test)]
mod test_support;

pub use ban::{Ban, MAX_DELETE_DAYS, Unban};
pub use common::{MAX_REASON_LEN, ModerationSettings, SharedSettings};
pub use duration::{DurationError, format_duration, parse_duration};
pub use kick::Kick;
pub use mute::{Mute, Unmute};
pub use warn::Warn;
