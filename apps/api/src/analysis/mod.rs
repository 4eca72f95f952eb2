//! Analysis orchestration — the decision layer between résumé text and the
//! AI providers.
//!
//! Flow per call: validate text → resolve provider(s) → availability gate →
//! bounded retry around `generate` → fallback or typed error → normalized
//! [`AnalysisResult`]. The orchestrator owns nothing mutable; one instance is
//! shared across all requests behind an `Arc`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::retry::{retry, RetryPolicy};
use crate::analysis::status::ProviderStatusReport;
use crate::middleware::RequestContext;
use crate::providers::{ProviderClient, ProviderError, ProviderName, ProviderRegistry};

pub mod handlers;
pub mod retry;
pub mod status;

/// Default number of `generate` attempts per provider.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// How the caller picks a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSelector {
    /// Use exactly this provider or fail.
    Explicit(ProviderName),
    /// Walk the priority order and take the first provider that answers.
    BestAvailable,
}

/// Normalized outcome of one analysis call. Immutable once built, returned to
/// the caller, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub file_name: String,
    pub analysis: String,
    pub ai_provider: ProviderName,
    pub analyzed_at: DateTime<Utc>,
    pub success: bool,
}

impl AnalysisResult {
    fn new(file_name: &str, analysis: String, provider: ProviderName) -> Self {
        Self {
            file_name: file_name.to_string(),
            analysis,
            ai_provider: provider,
            analyzed_at: Utc::now(),
            success: true,
        }
    }
}

/// Typed failure of an analysis call. Mapped to HTTP statuses in
/// `crate::errors`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("resume text is empty")]
    EmptyResume,

    #[error("unsupported AI provider: {0}")]
    UnknownProvider(String),

    #[error("provider {0} is not available")]
    ProviderUnavailable(ProviderName),

    #[error("provider {provider} failed: {source}")]
    Provider {
        provider: ProviderName,
        #[source]
        source: ProviderError,
    },

    #[error("no AI provider is currently available")]
    NoProviderAvailable,
}

/// Stateless coordinator over the provider registry.
pub struct AnalysisOrchestrator {
    registry: ProviderRegistry,
    retry_attempts: u32,
}

impl AnalysisOrchestrator {
    pub fn new(registry: ProviderRegistry, retry_attempts: u32) -> Self {
        Self {
            registry,
            retry_attempts,
        }
    }

    /// Analyzes `resume_text`, selecting a provider per `selector`.
    ///
    /// Blank input fails before any probe or network call. In best-available
    /// mode, both an unavailable candidate and a mid-call failure fall through
    /// to the next candidate in priority order.
    pub async fn analyze(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        resume_text: &str,
        selector: ProviderSelector,
    ) -> Result<AnalysisResult, AnalysisError> {
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::EmptyResume);
        }

        match selector {
            ProviderSelector::Explicit(name) => {
                let client = self
                    .registry
                    .get(name)
                    .ok_or_else(|| AnalysisError::UnknownProvider(name.to_string()))?;
                if !client.is_available() {
                    return Err(AnalysisError::ProviderUnavailable(name));
                }
                self.invoke(ctx, file_name, client, resume_text).await
            }
            ProviderSelector::BestAvailable => {
                for client in self.registry.all() {
                    if !client.is_available() {
                        debug!(
                            correlation_id = %ctx.correlation_id,
                            provider = %client.name(),
                            "skipping unavailable provider"
                        );
                        continue;
                    }
                    match self.invoke(ctx, file_name, client, resume_text).await {
                        Ok(result) => return Ok(result),
                        Err(err) => {
                            warn!(
                                correlation_id = %ctx.correlation_id,
                                provider = %client.name(),
                                error = %err,
                                "provider failed, trying next in priority order"
                            );
                            continue;
                        }
                    }
                }
                Err(AnalysisError::NoProviderAvailable)
            }
        }
    }

    /// One provider invocation under the retry budget. Exhaustion degrades to
    /// the provider's fallback text when one is defined.
    async fn invoke(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        client: &dyn ProviderClient,
        resume_text: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let name = client.name();
        let policy = RetryPolicy {
            max_attempts: self.retry_attempts,
            backoff: client.backoff(),
        };

        match retry(name.as_str(), &policy, || client.generate(resume_text)).await {
            Ok(analysis) => {
                info!(
                    correlation_id = %ctx.correlation_id,
                    provider = %name,
                    file_name,
                    "analysis generated"
                );
                Ok(AnalysisResult::new(file_name, analysis, name))
            }
            Err(err) => match client.fallback_text() {
                Some(fallback) => {
                    warn!(
                        correlation_id = %ctx.correlation_id,
                        provider = %name,
                        error = %err,
                        "retry budget exhausted, returning fallback text"
                    );
                    Ok(AnalysisResult::new(file_name, fallback.to_string(), name))
                }
                None => Err(AnalysisError::Provider {
                    provider: name,
                    source: err,
                }),
            },
        }
    }

    /// Names of providers currently available, in priority order.
    pub fn available_providers(&self) -> Vec<String> {
        self.registry
            .all()
            .filter(|c| c.is_available())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// First available provider in priority order.
    pub fn preferred_provider(&self) -> Option<ProviderName> {
        self.registry
            .all()
            .find(|c| c.is_available())
            .map(|c| c.name())
    }

    /// Availability of one provider; `false` for names with no client.
    pub fn is_provider_available(&self, name: ProviderName) -> bool {
        self.registry.get(name).is_some_and(|c| c.is_available())
    }

    /// Full availability snapshot. Probes every provider on each call.
    pub fn system_status(&self) -> ProviderStatusReport {
        let provider_status = self
            .registry
            .all()
            .map(|c| (c.name().to_string(), c.is_available()))
            .collect();
        let available_providers = self.available_providers();

        ProviderStatusReport {
            provider_status,
            preferred_provider: self.preferred_provider().map(|n| n.to_string()),
            has_available_provider: !available_providers.is_empty(),
            available_providers,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const RESUME: &str = "John Doe, Software Engineer";

    /// Scriptable provider double: availability flag, canned outcome, call
    /// counter.
    struct FakeProvider {
        name: ProviderName,
        available: bool,
        outcome: Outcome,
        fallback: Option<&'static str>,
        calls: AtomicU32,
    }

    enum Outcome {
        Succeed(&'static str),
        FailTransient,
    }

    impl FakeProvider {
        fn new(name: ProviderName, available: bool, outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                name,
                available,
                outcome,
                fallback: None,
                calls: AtomicU32::new(0),
            })
        }

        fn with_fallback(name: ProviderName, outcome: Outcome, text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                available: true,
                outcome,
                fallback: Some(text),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderClient for FakeProvider {
        fn name(&self) -> ProviderName {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn generate(&self, _resume_text: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Succeed(text) => Ok(text.to_string()),
                Outcome::FailTransient => Err(ProviderError::Api {
                    status: 503,
                    message: "boom".to_string(),
                }),
            }
        }

        fn fallback_text(&self) -> Option<&str> {
            self.fallback
        }

        fn backoff(&self) -> crate::analysis::retry::BackoffStrategy {
            crate::analysis::retry::BackoffStrategy::Fixed(std::time::Duration::from_millis(10))
        }
    }

    fn orchestrator(clients: Vec<Arc<FakeProvider>>) -> AnalysisOrchestrator {
        let clients = clients
            .into_iter()
            .map(|c| c as Arc<dyn ProviderClient>)
            .collect();
        AnalysisOrchestrator::new(ProviderRegistry::new(clients), DEFAULT_RETRY_ATTEMPTS)
    }

    fn ctx() -> RequestContext {
        RequestContext::new("test-correlation-id".to_string())
    }

    #[tokio::test]
    async fn explicit_provider_success_is_normalized() {
        let claude = FakeProvider::new(
            ProviderName::Claude,
            true,
            Outcome::Succeed("Enhanced: Senior Software Engineer"),
        );
        let orch = orchestrator(vec![claude.clone()]);

        let result = orch
            .analyze(
                &ctx(),
                "resume.pdf",
                RESUME,
                ProviderSelector::Explicit(ProviderName::Claude),
            )
            .await
            .unwrap();

        assert_eq!(result.file_name, "resume.pdf");
        assert_eq!(result.analysis, "Enhanced: Senior Software Engineer");
        assert_eq!(result.ai_provider, ProviderName::Claude);
        assert!(result.success);
        assert_eq!(claude.calls(), 1);
    }

    #[tokio::test]
    async fn blank_resume_fails_before_any_probe_or_call() {
        let claude = FakeProvider::new(ProviderName::Claude, true, Outcome::Succeed("x"));
        let orch = orchestrator(vec![claude.clone()]);

        let err = orch
            .analyze(&ctx(), "resume.pdf", "  \n", ProviderSelector::BestAvailable)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::EmptyResume));
        assert_eq!(claude.calls(), 0);
    }

    #[tokio::test]
    async fn explicit_unavailable_provider_is_reported() {
        let claude = FakeProvider::new(ProviderName::Claude, false, Outcome::Succeed("x"));
        let orch = orchestrator(vec![claude.clone()]);

        let err = orch
            .analyze(
                &ctx(),
                "resume.pdf",
                RESUME,
                ProviderSelector::Explicit(ProviderName::Claude),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::ProviderUnavailable(ProviderName::Claude)
        ));
        assert_eq!(claude.calls(), 0);
    }

    #[tokio::test]
    async fn best_available_skips_unavailable_and_uses_next() {
        let claude = FakeProvider::new(ProviderName::Claude, false, Outcome::Succeed("from claude"));
        let gemini = FakeProvider::new(ProviderName::Gemini, true, Outcome::Succeed("from gemini"));
        let orch = orchestrator(vec![claude.clone(), gemini.clone()]);

        let result = orch
            .analyze(&ctx(), "resume.pdf", RESUME, ProviderSelector::BestAvailable)
            .await
            .unwrap();

        assert_eq!(result.ai_provider, ProviderName::Gemini);
        assert_eq!(result.analysis, "from gemini");
        assert_eq!(claude.calls(), 0);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn best_available_falls_through_on_mid_call_failure() {
        let claude = FakeProvider::new(ProviderName::Claude, true, Outcome::FailTransient);
        let gemini = FakeProvider::new(ProviderName::Gemini, true, Outcome::Succeed("from gemini"));
        let orch = orchestrator(vec![claude.clone(), gemini.clone()]);

        let result = orch
            .analyze(&ctx(), "resume.pdf", RESUME, ProviderSelector::BestAvailable)
            .await
            .unwrap();

        assert_eq!(result.ai_provider, ProviderName::Gemini);
        // Claude burned its full retry budget before the fallthrough.
        assert_eq!(claude.calls(), DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(gemini.calls(), 1);
    }

    #[tokio::test]
    async fn all_unavailable_fails_without_any_generate_call() {
        let claude = FakeProvider::new(ProviderName::Claude, false, Outcome::Succeed("x"));
        let gemini = FakeProvider::new(ProviderName::Gemini, false, Outcome::Succeed("y"));
        let orch = orchestrator(vec![claude.clone(), gemini.clone()]);

        let err = orch
            .analyze(&ctx(), "resume.pdf", RESUME, ProviderSelector::BestAvailable)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::NoProviderAvailable));
        assert_eq!(claude.calls(), 0);
        assert_eq!(gemini.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhaustion_without_fallback_surfaces_provider_error() {
        let claude = FakeProvider::new(ProviderName::Claude, true, Outcome::FailTransient);
        let orch = orchestrator(vec![claude.clone()]);

        let err = orch
            .analyze(
                &ctx(),
                "resume.pdf",
                RESUME,
                ProviderSelector::Explicit(ProviderName::Claude),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Provider {
                provider: ProviderName::Claude,
                ..
            }
        ));
        assert_eq!(claude.calls(), DEFAULT_RETRY_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhaustion_with_fallback_degrades_to_success() {
        let gemini = FakeProvider::with_fallback(
            ProviderName::Gemini,
            Outcome::FailTransient,
            "Service temporarily unavailable",
        );
        let orch = orchestrator(vec![gemini.clone()]);

        let result = orch
            .analyze(
                &ctx(),
                "resume.pdf",
                RESUME,
                ProviderSelector::Explicit(ProviderName::Gemini),
            )
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.analysis, "Service temporarily unavailable");
        assert_eq!(gemini.calls(), DEFAULT_RETRY_ATTEMPTS);
    }

    #[tokio::test]
    async fn best_available_is_deterministic_for_a_fixed_snapshot() {
        let claude = FakeProvider::new(ProviderName::Claude, true, Outcome::Succeed("from claude"));
        let gemini = FakeProvider::new(ProviderName::Gemini, true, Outcome::Succeed("from gemini"));
        let orch = orchestrator(vec![claude, gemini]);

        for _ in 0..3 {
            let result = orch
                .analyze(&ctx(), "resume.pdf", RESUME, ProviderSelector::BestAvailable)
                .await
                .unwrap();
            assert_eq!(result.ai_provider, ProviderName::Claude);
        }
    }

    #[test]
    fn system_status_reflects_probes_and_priority() {
        let claude = FakeProvider::new(ProviderName::Claude, false, Outcome::Succeed("x"));
        let gemini = FakeProvider::new(ProviderName::Gemini, true, Outcome::Succeed("y"));
        let orch = orchestrator(vec![claude, gemini]);

        let status = orch.system_status();
        assert_eq!(status.provider_status["Claude"], false);
        assert_eq!(status.provider_status["Gemini"], true);
        assert_eq!(status.available_providers, vec!["Gemini"]);
        assert_eq!(status.preferred_provider.as_deref(), Some("Gemini"));
        assert!(status.has_available_provider);
    }

    #[test]
    fn preferred_provider_follows_priority_order() {
        let claude = FakeProvider::new(ProviderName::Claude, true, Outcome::Succeed("x"));
        let gemini = FakeProvider::new(ProviderName::Gemini, true, Outcome::Succeed("y"));
        let orch = orchestrator(vec![claude, gemini]);
        assert_eq!(orch.preferred_provider(), Some(ProviderName::Claude));
    }

    #[test]
    fn result_serializes_to_external_shape() {
        let result = AnalysisResult::new("cv.pdf", "text".to_string(), ProviderName::Claude);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["fileName"], "cv.pdf");
        assert_eq!(json["analysis"], "text");
        assert_eq!(json["aiProvider"], "Claude");
        assert_eq!(json["success"], true);
        assert!(json.get("analyzedAt").is_some());
    }
}
