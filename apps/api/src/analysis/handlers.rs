//! AI provider HTTP handlers: availability listing and status reporting.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::analysis::status::ProviderStatusReport;
use crate::providers::ProviderName;
use crate::state::AppState;

/// GET /api/v1/ai/providers
pub async fn handle_list_providers(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.orchestrator.available_providers())
}

/// GET /api/v1/ai/status
pub async fn handle_system_status(State(state): State<AppState>) -> Json<ProviderStatusReport> {
    Json(state.orchestrator.system_status())
}

/// GET /api/v1/ai/providers/:name/status
///
/// Echoes the requested name with its availability; an unknown name is simply
/// reported as unavailable rather than rejected.
pub async fn handle_provider_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<HashMap<String, bool>> {
    let available = name
        .parse::<ProviderName>()
        .is_ok_and(|n| state.orchestrator.is_provider_available(n));
    Json(HashMap::from([(name, available)]))
}

/// GET /api/v1/ai/preferred
pub async fn handle_preferred_provider(State(state): State<AppState>) -> Response {
    match state.orchestrator.preferred_provider() {
        Some(preferred) => Json(json!({ "preferred": preferred.as_str() })).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "No AI provider is currently available" })),
        )
            .into_response(),
    }
}
