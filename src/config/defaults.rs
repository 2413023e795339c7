//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_bot_name() -> String {
    "warden".to_string()
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_filter() -> String {
    "info".to_string()
}

// =============================================================================
// Moderation Defaults
// =============================================================================

/// The platform's timeout ceiling.
pub fn default_max_mute() -> String {
    "28d".to_string()
}
