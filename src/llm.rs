//! Language-model client for verse commentary.
//!
//! Defines the [`CompletionProvider`] trait and [`ChatCompletionsClient`],
//! which calls any OpenAI-compatible `POST {base_url}/chat/completions`
//! endpoint.
//!
//! Unlike batch workloads, commentary requests are interactive: there is a
//! single attempt with a bounded timeout, and the first choice's
//! `message.content` is relayed as is.
//!
//! | Outcome | Error |
//! |---------|-------|
//! | non-2xx status | [`ExplorerError::Upstream`] with the response body |
//! | timeout | [`ExplorerError::Timeout`] |
//! | unreachable, unreadable body, or missing `choices` | [`ExplorerError::BadResponse`] |
//! | blank content | [`ExplorerError::EmptyCompletion`] |

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::ExplorerError;

pub const SERVICE_NAME: &str = "language model";

/// A prompt ready to send: system instructions plus the user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Generates text for a prompt using the given bearer credential.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt, api_key: &str) -> Result<String, ExplorerError>;
}

pub struct ChatCompletionsClient {
    http: reqwest::Client,
    url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsClient {
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
        })
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsClient {
    async fn complete(&self, prompt: &Prompt, api_key: &str) -> Result<String, ExplorerError> {
        tracing::debug!(model = %self.model, url = %self.url, "requesting completion");

        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ExplorerError::from_transport(SERVICE_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExplorerError::Upstream {
                service: SERVICE_NAME,
                status: status.as_u16(),
                detail: upstream_message(&body),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ExplorerError::from_transport(SERVICE_NAME, e))?;
        parse_completion(&json)
    }
}

/// Extracts `choices[0].message.content`.
pub fn parse_completion(json: &Value) -> Result<String, ExplorerError> {
    let choices = json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ExplorerError::BadResponse {
            service: SERVICE_NAME,
            detail: "invalid response: missing choices array".to_string(),
        })?;

    let content = choices
        .first()
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::trim)
        .unwrap_or_default();

    if content.is_empty() {
        return Err(ExplorerError::EmptyCompletion);
    }
    Ok(content.to_string())
}

/// Prefers the provider's `error.message` over the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_choice() {
        let json = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  First.  " } },
                { "message": { "role": "assistant", "content": "Second." } }
            ]
        });
        assert_eq!(parse_completion(&json).unwrap(), "First.");
    }

    #[test]
    fn test_parse_missing_choices() {
        let err = parse_completion(&json!({ "id": "x" })).unwrap_err();
        assert!(matches!(err, ExplorerError::BadResponse { .. }));
    }

    #[test]
    fn test_parse_empty_completion() {
        for json in [
            json!({ "choices": [] }),
            json!({ "choices": [ { "message": { "content": "   " } } ] }),
            json!({ "choices": [ { "message": {} } ] }),
        ] {
            assert!(matches!(
                parse_completion(&json),
                Err(ExplorerError::EmptyCompletion)
            ));
        }
    }

    #[test]
    fn test_upstream_message_extraction() {
        assert_eq!(
            upstream_message(r#"{"error":{"message":"Incorrect API key"}}"#),
            "Incorrect API key"
        );
        assert_eq!(upstream_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_request_body_shape() {
        let client = ChatCompletionsClient::new(&LlmConfig::default()).unwrap();
        let body = client.request_body(&Prompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        });
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(client.url, "https://api.openai.com/v1/chat/completions");
    }
}
