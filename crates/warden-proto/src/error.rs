//! Errors produced while decoding platform payloads.

use thiserror::Error;

/// Error converting a raw wire value into a typed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// The numeric option type is not one the platform defines.
    #[error("unknown option type {0}")]
    UnknownOptionType(u8),

    /// The numeric interaction type is not one the platform defines.
    #[error("unknown interaction type {0}")]
    UnknownInteractionType(u8),

    /// The numeric response type is not one the platform defines.
    #[error("unknown interaction response type {0}")]
    UnknownResponseType(u8),

    /// A permission bitmask string could not be parsed.
    #[error("invalid permission bitmask {0:?}")]
    InvalidPermissions(String),
}
