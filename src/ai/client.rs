//! Chat-completion API client (OpenAI-compatible)

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::prompts;
use crate::config::AiConfig;
use crate::constants::UPSTREAM_ERROR_SNIPPET_CHARS;
use crate::tone::ToneProfile;
use crate::types::Mode;

/// Why a remote generation attempt failed
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    Configuration,
    #[error("API key rejected")]
    Authentication,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("response contained no generated text")]
    MalformedResponse,
}

impl GenerationError {
    /// Short machine-readable label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Configuration => "configuration",
            GenerationError::Authentication => "authentication",
            GenerationError::RateLimited => "rate_limited",
            GenerationError::Timeout => "timeout",
            GenerationError::Network(_) => "network",
            GenerationError::Upstream { .. } | GenerationError::MalformedResponse => "upstream",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Network(e.to_string())
        }
    }
}

/// Client for a chat-completions endpoint
#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl GenerationClient {
    /// Create a client from the AI configuration.
    /// A missing API key is allowed; `generate` then reports `Configuration`.
    pub fn new(config: &AiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: config.credential().map(str::to_string),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
        })
    }

    /// Generate or rewrite an email, returning the trimmed text of the first choice
    pub async fn generate(
        &self,
        text: &str,
        tone: &ToneProfile,
        mode: Mode,
    ) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::Configuration)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: prompts::system_prompt(mode, tone),
                },
                Message {
                    role: "user",
                    content: prompts::user_prompt(mode, text),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            stream: false,
        };

        tracing::debug!("Calling chat API ({} mode, {} tone)", mode, tone.name);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(GenerationError::Authentication),
            StatusCode::TOO_MANY_REQUESTS => return Err(GenerationError::RateLimited),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(GenerationError::Upstream {
                    status: s.as_u16(),
                    message: upstream_message(&body),
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|_| GenerationError::MalformedResponse)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|content| content.trim().to_string())
            .ok_or(GenerationError::MalformedResponse)
    }
}

/// Extract `error.message` from an error body, else a short raw snippet
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| body.chars().take(UPSTREAM_ERROR_SNIPPET_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::resolve;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str, key: Option<&str>) -> AiConfig {
        AiConfig {
            api_key: key.map(str::to_string),
            api_url: format!("{}/openai/v1/chat/completions", url),
            timeout_secs: 1,
            ..AiConfig::default()
        }
    }

    async fn mock_status(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer gsk-test"))
            .and(body_partial_json(json!({
                "model": "openai/gpt-oss-120b",
                "max_tokens": 1500,
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "  Hello,\n\nPlease send the report.  \n"}},
                    {"message": {"role": "assistant", "content": "second"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(&test_config(&server.uri(), Some("gsk-test"))).unwrap();
        let text = client
            .generate("hey, send the report", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap();
        assert_eq!(text, "Hello,\n\nPlease send the report.");

        let requests = server.received_requests().await.unwrap_or_default();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(
            messages[0]["content"]
                .as_str()
                .unwrap()
                .contains("TONE: Formal")
        );
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"],
            "Rewrite this email:\n\nhey, send the report"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let server = MockServer::start().await;
        let client = GenerationClient::new(&test_config(&server.uri(), None)).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Write)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Configuration));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let server = MockServer::start().await;
        mock_status(&server, ResponseTemplate::new(401)).await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("bad"))).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Authentication));

        let server = MockServer::start().await;
        mock_status(&server, ResponseTemplate::new(429)).await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::RateLimited));
        assert_eq!(err.kind(), "rate_limited");
    }

    #[tokio::test]
    async fn test_other_status_is_upstream_with_message() {
        let server = MockServer::start().await;
        mock_status(
            &server,
            ResponseTemplate::new(503).set_body_json(json!({
                "error": {"message": "model overloaded", "type": "server_error"}
            })),
        )
        .await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("casual"), Mode::Write)
            .await
            .unwrap_err();
        match err {
            GenerationError::Upstream { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unstructured_error_body_is_truncated() {
        let server = MockServer::start().await;
        mock_status(
            &server,
            ResponseTemplate::new(500).set_body_string("x".repeat(500)),
        )
        .await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("casual"), Mode::Write)
            .await
            .unwrap_err();
        match err {
            GenerationError::Upstream { message, .. } => assert_eq!(message.len(), 200),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        let server = MockServer::start().await;
        mock_status(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
        )
        .await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse));
        assert_eq!(err.kind(), "upstream");

        let server = MockServer::start().await;
        mock_status(&server, ResponseTemplate::new(200).set_body_string("not json")).await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        mock_status(
            &server,
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]})),
        )
        .await;
        let client = GenerationClient::new(&test_config(&server.uri(), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Timeout));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            GenerationClient::new(&test_config(&format!("http://{}", addr), Some("key"))).unwrap();
        let err = client
            .generate("some text here", resolve("formal"), Mode::Rewrite)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Network(_)));
    }
}
