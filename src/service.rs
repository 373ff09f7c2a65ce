//! Request handling: validation, generation and optional persistence.

use thiserror::Error;

use crate::backend::{BackendSelector, Source};
use crate::constants::{MAX_INPUT_CHARS, MIN_INPUT_CHARS, TIMESTAMP_FORMAT};
use crate::history::HistoryStore;
use crate::tone;
use crate::types::{GenerationRequest, GenerationResult};

/// Caller input rejected before any generation is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email text is required")]
    Empty,
    #[error("Email text is too short (minimum {min} characters)")]
    TooShort { min: usize },
    #[error("Email text is too long (maximum {max} characters)")]
    TooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Trim `text` and check it against the input length bounds.
pub fn validate_input(text: &str) -> Result<&str, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Empty);
    }

    let len = text.chars().count();
    if len < MIN_INPUT_CHARS {
        return Err(ValidationError::TooShort {
            min: MIN_INPUT_CHARS,
        });
    }
    if len > MAX_INPUT_CHARS {
        return Err(ValidationError::TooLong {
            max: MAX_INPUT_CHARS,
        });
    }
    Ok(text)
}

pub struct EmailService {
    backend: BackendSelector,
    history: Option<HistoryStore>,
}

impl EmailService {
    pub fn new(backend: BackendSelector, history: Option<HistoryStore>) -> Self {
        Self { backend, history }
    }

    pub fn remote_enabled(&self) -> bool {
        self.backend.remote_enabled()
    }

    #[cfg(test)]
    pub fn history(&self) -> Option<&HistoryStore> {
        self.history.as_ref()
    }

    /// Validate, generate, and persist when requested.
    pub async fn handle(&self, request: GenerationRequest) -> Result<GenerationResult, ServiceError> {
        let text = validate_input(&request.input_text)?;
        let profile = tone::resolve(&request.tone);

        let generated = self
            .backend
            .rewrite_or_generate(text, profile, request.mode)
            .await;
        tracing::debug!(
            "Generated {} email in {} tone via {}",
            request.mode,
            profile.name,
            match generated.source {
                Source::Remote => "remote API",
                Source::Local => "local composer",
            }
        );

        let result = GenerationResult {
            output_text: generated.text,
            tone: profile.name.to_string(),
            generated_at: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        if request.persist {
            match &self.history {
                Some(store) => {
                    let id = store
                        .insert(text, &result.output_text, &result.tone, &result.generated_at)
                        .await?;
                    tracing::debug!("Saved history record {}", id);
                }
                None => tracing::debug!("No history store attached, not saving"),
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    fn request(text: &str, tone: &str, mode: Mode, persist: bool) -> GenerationRequest {
        GenerationRequest {
            input_text: text.to_string(),
            tone: tone.to_string(),
            mode,
            persist,
        }
    }

    async fn test_service() -> EmailService {
        let store = HistoryStore::open_in_memory().await.unwrap();
        EmailService::new(BackendSelector::local_only(), Some(store))
    }

    #[test]
    fn test_validation_bounds() {
        assert_eq!(validate_input(""), Err(ValidationError::Empty));
        assert_eq!(validate_input("   \n\t "), Err(ValidationError::Empty));
        assert_eq!(
            validate_input(&"a".repeat(9)),
            Err(ValidationError::TooShort { min: 10 })
        );
        assert!(validate_input(&"a".repeat(10)).is_ok());
        assert!(validate_input(&"a".repeat(5000)).is_ok());
        assert_eq!(
            validate_input(&"a".repeat(5001)),
            Err(ValidationError::TooLong { max: 5000 })
        );
    }

    #[test]
    fn test_validation_trims_and_counts_characters() {
        assert_eq!(validate_input("  hello world  ").unwrap(), "hello world");
        // Surrounding whitespace does not count toward the minimum
        assert!(validate_input("   short   ").is_err());
        // Multi-byte characters count once each
        assert!(validate_input(&"é".repeat(5000)).is_ok());
    }

    #[test]
    fn test_validation_messages_name_the_bound() {
        assert_eq!(
            ValidationError::TooShort { min: 10 }.to_string(),
            "Email text is too short (minimum 10 characters)"
        );
        assert_eq!(
            ValidationError::TooLong { max: 5000 }.to_string(),
            "Email text is too long (maximum 5000 characters)"
        );
    }

    #[tokio::test]
    async fn test_handle_rewrites_and_persists() {
        let service = test_service().await;
        let result = service
            .handle(request(
                "  hey,\ncan you send me that report? need it asap.\nthanks  ",
                "Formal",
                Mode::Rewrite,
                true,
            ))
            .await
            .unwrap();

        assert_eq!(result.tone, "formal");
        assert!(result.output_text.contains("thank you"));
        assert!(result.output_text.contains("Respectfully yours,"));
        assert_eq!(result.generated_at.len(), "2024-01-01 00:00:00".len());

        let records = service.history().unwrap().recent(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].original_text,
            "hey,\ncan you send me that report? need it asap.\nthanks"
        );
        assert_eq!(records[0].rewritten_text, result.output_text);
        assert_eq!(records[0].timestamp, result.generated_at);
    }

    #[tokio::test]
    async fn test_handle_without_persist_saves_nothing() {
        let service = test_service().await;
        let result = service
            .handle(request(
                "schedule a team meeting tomorrow at 2pm",
                "unknown-tone",
                Mode::Write,
                false,
            ))
            .await
            .unwrap();

        assert_eq!(result.tone, "professional");
        assert!(
            result
                .output_text
                .contains("Regarding: schedule a team meeting tomorrow at 2pm")
        );
        assert_eq!(service.history().unwrap().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_handle_rejects_invalid_input_before_generation() {
        let service = test_service().await;
        let err = service
            .handle(request("too short", "formal", Mode::Rewrite, true))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::TooShort { min: 10 })
        ));
        assert_eq!(service.history().unwrap().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_handle_without_store_still_succeeds() {
        let service = EmailService::new(BackendSelector::local_only(), None);
        let result = service
            .handle(request("please review the draft", "concise", Mode::Rewrite, true))
            .await
            .unwrap();
        assert!(result.output_text.contains("Thanks,"));
    }
}
