//! Application-wide constants for tuning and validation
//!
//! Centralizes magic numbers to make them discoverable.

/// Minimum accepted input length in characters (after trimming).
/// Applies to every entry point, both write and rewrite mode.
pub const MIN_INPUT_CHARS: usize = 10;

/// Maximum accepted input length in characters (after trimming).
pub const MAX_INPUT_CHARS: usize = 5000;

/// Timeout for a single chat-completion request in seconds.
/// A timed out request is never retried; the local composer takes over.
pub const REMOTE_TIMEOUT_SECS: u64 = 30;

/// Number of history records returned when no limit is given.
pub const HISTORY_PAGE_SIZE: u32 = 50;

/// Upper bound for a caller-supplied history limit.
pub const HISTORY_MAX_PAGE_SIZE: u32 = 200;

/// Maximum request body size (64KB).
pub const MAX_BODY_SIZE: usize = 65_536;

/// Characters of an upstream error body kept when no structured message exists.
pub const UPSTREAM_ERROR_SNIPPET_CHARS: usize = 200;

/// Format used for timestamps in responses and history records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
