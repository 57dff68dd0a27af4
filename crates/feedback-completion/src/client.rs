//! Chat-completions API client.
//!
//! Speaks the OpenAI chat format against a configurable base URL. The
//! key and model travel with each call because the settings UI can
//! change them at any moment; the client itself only owns the HTTP
//! connection pool and its timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{CompletionError, Result};

/// Default completion API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.zukijourney.com/v1";

/// Per-request socket timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can turn a prompt into generated text.
///
/// Implemented by [`CompletionClient`] for the real API and by scripted
/// fakes in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Requests one completion for the prompt.
    async fn complete(&self, prompt: &str, model: &str, api_key: &str) -> Result<String>;
}

/// HTTP client for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
}

impl CompletionClient {
    /// Creates a client against the default API endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (no trailing slash
    /// needed).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, prompt: &str, model: &str, api_key: &str) -> Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
        };

        trace!(model, "Sending completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let response: ChatResponse = response.json().await?;

        debug!(
            tokens = response.usage.as_ref().map_or(0, |u| u.total_tokens),
            "Completion response received"
        );

        // A response without content counts as empty text; the caller's
        // length floor decides what to do with it.
        Ok(response.content().unwrap_or_default().to_string())
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,

    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: String,

    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion choices.
    pub choices: Vec<ChatChoice>,

    /// Token usage information.
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// The first choice's text content, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// A choice in the completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ResponseMessage,
}

/// Message in a completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Text content of the response.
    pub content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,

    /// Tokens in the completion.
    pub completion_tokens: u32,

    /// Total tokens used.
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("Reply to this review")],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Reply to this review");
    }

    #[test]
    fn response_deserialization() {
        let json = r#"{
            "id": "gen-123",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Thank you so much for the kind words!"
                },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 120,
                "completion_tokens": 42,
                "total_tokens": 162
            }
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.content(),
            Some("Thank you so much for the kind words!")
        );
        assert_eq!(response.usage.unwrap().total_tokens, 162);
    }

    #[test]
    fn response_without_content() {
        let json = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null
                }
            }],
            "usage": null
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content(), None);
    }

    #[test]
    fn response_without_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.content(), None);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CompletionClient::with_base_url("http://localhost:9000/v1/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/v1");
    }
}
