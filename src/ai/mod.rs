//! Remote email generation through a chat-completion API
//!
//! - `prompts` builds the system/user prompt pair for a tone and mode
//! - `client` sends the request and maps failures to `GenerationError`

mod client;
mod prompts;

pub use client::{GenerationClient, GenerationError};
