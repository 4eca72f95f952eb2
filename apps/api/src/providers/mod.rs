//! AI provider clients — the only modules allowed to talk to external AI APIs.
//!
//! Each backend implements [`ProviderClient`]: a uniform capability contract
//! over very differently shaped upstreams (Anthropic's chat-completion API vs.
//! Google's raw JSON generation endpoint). The orchestrator in
//! `crate::analysis` never sees anything but this trait.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod claude;
pub mod gemini;
pub mod prompts;
pub mod registry;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use registry::ProviderRegistry;

use crate::analysis::retry::BackoffStrategy;

/// Identity of an AI provider. Fixed set, priority order is Claude then Gemini.
///
/// String names are parsed at the HTTP boundary only; everything internal is
/// keyed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderName {
    Claude,
    Gemini,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Claude => "Claude",
            ProviderName::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown provider name string, reported back to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported AI provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderName {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" => Ok(ProviderName::Claude),
            "gemini" => Ok(ProviderName::Gemini),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Error from a single `generate` attempt against one provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("resume text is empty")]
    EmptyInput,

    #[error("no API key configured")]
    MissingCredentials,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no usable content")]
    EmptyContent,
}

impl ProviderError {
    /// Transient failures worth retrying: transport errors, rate limits, 5xx.
    /// Validation and empty-response failures will not get better on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http(_) => true,
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            ProviderError::EmptyInput
            | ProviderError::MissingCredentials
            | ProviderError::EmptyContent => false,
        }
    }
}

/// Uniform capability contract over one external AI backend.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Constant identity.
    fn name(&self) -> ProviderName;

    /// Best-effort availability probe. Must never panic or block on the
    /// network; any internal failure degrades to `false`. Cheap enough to be
    /// called on every status request.
    fn is_available(&self) -> bool;

    /// One generation attempt. Retry policy is applied by the caller, not
    /// inside the client.
    async fn generate(&self, resume_text: &str) -> Result<String, ProviderError>;

    /// Static degraded-service message returned instead of an error once the
    /// retry budget is exhausted. `None` means exhaustion propagates the error.
    fn fallback_text(&self) -> Option<&str> {
        None
    }

    /// Delay schedule used between retry attempts for this provider.
    fn backoff(&self) -> BackoffStrategy {
        BackoffStrategy::Fixed(Duration::from_secs(1))
    }
}
