//! REST client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenAiConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// No API key is configured.
    #[error("Text generation is not configured (missing API key)")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// TextGenerator
// ---------------------------------------------------------------------------

/// Turns a prompt into model text.
///
/// An `Ok` reply may be empty; callers decide what an empty reply means.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn user_prompt(text: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text }],
            }],
        }
    }
}

/// Response body of `generateContent`. Only the fields read here are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty when there are none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from configuration. Fails when no API key is set.
    pub fn new(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let api_key = config.api_key.clone().ok_or(GenAiError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config, api_key))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &GenAiConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: endpoint_url(&config.base_url, &config.model),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// `{base}/v1beta/models/{model}:generateContent`
pub fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{model}:generateContent",
        base_url.trim_end_matches('/')
    )
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::user_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed.text())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        assert_eq!(
            endpoint_url("https://generativelanguage.googleapis.com/", "gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn new_requires_api_key() {
        let config = GenAiConfig::default();
        assert!(matches!(
            GeminiClient::new(&config),
            Err(GenAiError::MissingApiKey)
        ));
    }

    #[test]
    fn new_with_key_uses_configured_model() {
        let config = GenAiConfig {
            api_key: Some("key".into()),
            model: "gemini-test".into(),
            base_url: "http://localhost:9999".into(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn request_body_wraps_prompt_as_user_content() {
        let body = serde_json::to_value(GenerateContentRequest::user_prompt("hello")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "Open "}, {"text": "plan"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.text(), "Open plan");
    }

    #[test]
    fn response_without_candidates_is_empty_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}))
                .unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn api_error_display() {
        let err = GenAiError::ApiError {
            status: 429,
            body: "quota".into(),
        };
        assert_eq!(err.to_string(), "Gemini API error (429): quota");
    }
}
