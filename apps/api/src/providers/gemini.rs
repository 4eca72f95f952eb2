//! Gemini provider — wraps the Google Generative Language JSON endpoint.
//!
//! Unlike Claude there is no chat/system-message structure here: the prompt
//! is a single text part and the key travels as a query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::retry::BackoffStrategy;
use crate::providers::prompts::{GEMINI_FALLBACK_TEXT, GEMINI_PROMPT_PREFIX};
use crate::providers::{ProviderClient, ProviderError, ProviderName};

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";
/// Placeholder key shipped in example configs; treated as "not configured".
const PLACEHOLDER_KEY: &str = "demo-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate, if any.
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
    }
}

/// HTTP JSON provider client backed by the Gemini generateContent endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn name(&self) -> ProviderName {
        ProviderName::Gemini
    }

    /// Available when a key is configured and is not the placeholder sentinel.
    fn is_available(&self) -> bool {
        matches!(&self.api_key, Some(key) if key.as_str() != PLACEHOLDER_KEY)
    }

    async fn generate(&self, resume_text: &str) -> Result<String, ProviderError> {
        if resume_text.trim().is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        let api_key = self.api_key.as_ref().ok_or(ProviderError::MissingCredentials)?;

        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{GEMINI_PROMPT_PREFIX}{resume_text}"),
                }],
            }],
        };

        let response = self
            .client
            .post(GEMINI_API_URL)
            .query(&[("key", api_key.as_str())])
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = response.json().await?;
        debug!("Gemini call succeeded");

        match parsed.text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::EmptyContent),
        }
    }

    fn fallback_text(&self) -> Option<&str> {
        Some(GEMINI_FALLBACK_TEXT)
    }

    fn backoff(&self) -> BackoffStrategy {
        BackoffStrategy::Fixed(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_without_key_or_with_placeholder() {
        assert!(!GeminiClient::new(None).is_available());
        assert!(!GeminiClient::new(Some(String::new())).is_available());
        assert!(!GeminiClient::new(Some("demo-key".to_string())).is_available());
    }

    #[test]
    fn available_with_real_key() {
        assert!(GeminiClient::new(Some("AIzaSyTest".to_string())).is_available());
    }

    #[tokio::test]
    async fn generate_rejects_blank_input_without_network() {
        let client = GeminiClient::new(Some("AIzaSyTest".to_string()));
        let err = client.generate("").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyInput));
    }

    #[test]
    fn defines_a_fallback_text() {
        let client = GeminiClient::new(None);
        assert_eq!(client.fallback_text(), Some(GEMINI_FALLBACK_TEXT));
    }

    #[test]
    fn response_text_navigates_candidates() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"summary"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("summary"));
    }

    #[test]
    fn empty_candidate_list_yields_no_text() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.text().is_none());
    }
}
