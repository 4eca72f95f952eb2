//! Request-scoped plumbing: correlation IDs and rate limiting.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;
use std::convert::Infallible;
use uuid::Uuid;

pub mod rate_limit;

pub use rate_limit::RateLimiter;

/// Header carrying the correlation id. Set on every request by the
/// request-id layer (generated when the client did not send one) and echoed
/// on every response.
pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Per-request context passed explicitly to the orchestrator and anything
/// else that wants the correlation id in its log fields. Never stored in
/// shared state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
}

impl RequestContext {
    pub fn new(correlation_id: String) -> Self {
        Self { correlation_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .headers
            .get(&CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .map(str::to_owned)
            // The layer normally guarantees the header; this is the fallback
            // for direct handler invocation in tests.
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Ok(RequestContext::new(correlation_id))
    }
}
