pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as ai;
use crate::middleware::rate_limit::rate_limit;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // AI provider API
        .route("/ai/providers", get(ai::handle_list_providers))
        .route("/ai/status", get(ai::handle_system_status))
        .route("/ai/providers/:name/status", get(ai::handle_provider_status))
        .route("/ai/preferred", get(ai::handle_preferred_provider))
        // Resume API
        .route(
            "/resume/upload",
            post(resume::handle_upload)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes + 64 * 1024)),
        )
        .route("/resume/analyze/:file_name", get(resume::handle_analyze))
        .route(
            "/resume/analyze/:file_name/provider/:provider",
            get(resume::handle_analyze_with_provider),
        )
        .route(
            "/resume/:file_name",
            get(resume::handle_get_content).delete(resume::handle_delete),
        )
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api)
        .with_state(state)
}
