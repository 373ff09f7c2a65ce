//! Backend selection: remote chat API when configured, local composer otherwise
//!
//! Remote failures never reach the caller. Every `GenerationError` is logged
//! and answered with the local composer's output for the same input.

use crate::ai::{GenerationClient, GenerationError};
use crate::compose;
use crate::config::AiConfig;
use crate::tone::ToneProfile;
use crate::types::Mode;

/// Which backend produced a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub source: Source,
}

pub struct BackendSelector {
    /// Present only when an API key is configured
    remote: Option<GenerationClient>,
}

impl BackendSelector {
    pub fn new(config: &AiConfig) -> anyhow::Result<Self> {
        let remote = if config.is_enabled() {
            tracing::info!("Remote generation enabled (model: {})", config.model);
            Some(GenerationClient::new(config)?)
        } else {
            tracing::info!("No API key configured, using local composer");
            None
        };
        Ok(Self { remote })
    }

    /// A selector that never calls the remote API
    pub fn local_only() -> Self {
        Self { remote: None }
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Produce an email for `text`, never failing.
    pub async fn rewrite_or_generate(&self, text: &str, tone: &ToneProfile, mode: Mode) -> Generated {
        let Some(client) = &self.remote else {
            return Self::compose_locally(text, tone, mode);
        };

        match client.generate(text, tone, mode).await {
            Ok(text) => Generated {
                text,
                source: Source::Remote,
            },
            Err(e) => {
                log_remote_failure(&e);
                Self::compose_locally(text, tone, mode)
            }
        }
    }

    fn compose_locally(text: &str, tone: &ToneProfile, mode: Mode) -> Generated {
        let text = match mode {
            Mode::Write => compose::compose_from_description(text, tone),
            Mode::Rewrite => compose::compose_from_existing(text, tone),
        };
        Generated {
            text,
            source: Source::Local,
        }
    }
}

fn log_remote_failure(e: &GenerationError) {
    tracing::warn!(kind = e.kind(), "Remote generation failed, falling back: {}", e);
}
