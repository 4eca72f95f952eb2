use std::sync::Arc;

use crate::analysis::AnalysisOrchestrator;
use crate::config::Config;
use crate::middleware::RateLimiter;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable or internally synchronized — one clone per
/// request is cheap and safe.
#[derive(Clone)]
pub struct AppState {
    /// Blob store for uploaded resumes (local filesystem or Postgres).
    pub storage: Arc<dyn ResumeStore>,
    /// Provider selection, retry, and fallback logic.
    pub orchestrator: Arc<AnalysisOrchestrator>,
    /// Per-IP token buckets for the /api/v1 surface.
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Config,
}
