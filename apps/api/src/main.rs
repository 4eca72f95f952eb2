mod analysis;
mod config;
mod db;
mod errors;
mod middleware;
mod providers;
mod resume;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisOrchestrator;
use crate::config::{Config, StorageBackend};
use crate::db::create_pool;
use crate::middleware::{RateLimiter, CORRELATION_ID_HEADER};
use crate::providers::{ClaudeClient, GeminiClient, ProviderClient, ProviderRegistry};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{DatabaseStorage, LocalStorage, ResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize resume storage
    let storage = build_storage(&config).await?;

    // Initialize AI provider clients; priority order: Claude, then Gemini
    let claude = ClaudeClient::new(config.anthropic_api_key.clone());
    let gemini = GeminiClient::new(config.gemini_api_key.clone());
    info!(
        claude_available = claude.is_available(),
        gemini_available = gemini.is_available(),
        "AI provider clients initialized"
    );

    let registry = ProviderRegistry::new(vec![Arc::new(claude), Arc::new(gemini)]);
    let orchestrator = Arc::new(AnalysisOrchestrator::new(registry, config.retry_attempts));

    let rate_limiter = Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute));

    // Build app state
    let state = AppState {
        storage,
        orchestrator,
        rate_limiter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(PropagateRequestIdLayer::new(CORRELATION_ID_HEADER.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            CORRELATION_ID_HEADER.clone(),
            MakeRequestUuid,
        ))
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Constructs the resume store configured by `STORAGE_BACKEND`.
async fn build_storage(config: &Config) -> Result<Arc<dyn ResumeStore>> {
    match config.storage_backend {
        StorageBackend::Local => {
            info!("Using local storage at {}", config.storage_path);
            Ok(Arc::new(LocalStorage::new(config.storage_path.clone())))
        }
        StorageBackend::Database => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL missing for database storage"))?;
            let pool = create_pool(url).await?;
            let storage = DatabaseStorage::new(pool).await?;
            info!("Using database storage");
            Ok(Arc::new(storage))
        }
    }
}
