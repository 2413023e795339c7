//! # warden-proto
//!
//! Wire types for a Discord-style application-command platform.
//!
//! ## Features
//!
//! - Inbound interactions with typed option lists and resolved entities
//! - Interaction responses, including ephemeral replies and embeds
//! - Declarative command descriptors for syncing the command catalog
//! - The member permission bitmask, serialized as a decimal string
//! - Gateway events in the `{"t": ..., "d": ...}` envelope
//!
//! Every type serializes to and from the platform's JSON shape with `serde`.
//!
//! ## Quick Start
//!
//! ```rust
//! use warden_proto::{Interaction, OptionType, Permissions, User};
//! use serde_json::json;
//!
//! let moderator = User::new("100", "moderator");
//! let interaction = Interaction::application_command("1", "ban")
//!     .in_guild("900", "901")
//!     .from_member(moderator, Permissions::BAN_MEMBERS)
//!     .with_option("user", OptionType::User, json!("200"));
//!
//! assert!(interaction.is_application_command());
//! assert_eq!(interaction.command_name(), Some("ban"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod event;
pub mod interaction;
pub mod option;
pub mod permissions;
pub mod response;

pub use descriptor::{ApplicationCommand, CommandOptionDescriptor, OptionChoice};
pub use error::ProtoError;
pub use event::{GatewayEvent, GuildMemberAdd, MessageCreate, Ready};
pub use interaction::{
    CommandData, CommandDataOption, Interaction, InteractionType, Member, ResolvedData, User,
};
pub use option::OptionType;
pub use permissions::Permissions;
pub use response::{
    Embed, EmbedField, EmbedFooter, InteractionResponse, MessageFlags, ResponseData, ResponseKind,
};
