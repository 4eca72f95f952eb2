//! Resume HTTP handlers: upload, content retrieval, analysis, deletion.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::analysis::{AnalysisResult, ProviderSelector};
use crate::errors::AppError;
use crate::middleware::RequestContext;
use crate::providers::ProviderName;
use crate::resume::extract::extract_text;
use crate::resume::sanitize::sanitize;
use crate::resume::validation::validate_upload;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
    pub message: String,
    pub file_size: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub file_name: String,
    pub content: String,
    pub content_type: String,
}

/// POST /api/v1/resume/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    ctx: RequestContext,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = sanitize(field.file_name().unwrap_or_default());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        validate_upload(&file_name, data.len(), state.config.max_upload_bytes)?;

        if state.storage.exists(&file_name).await {
            info!(correlation_id = %ctx.correlation_id, %file_name, "replacing existing resume");
        }
        state.storage.save(&file_name, &data).await?;

        info!(
            correlation_id = %ctx.correlation_id,
            %file_name,
            size = data.len(),
            "resume uploaded"
        );
        return Ok(Json(UploadResponse {
            file_name,
            message: "Upload successful".to_string(),
            file_size: data.len(),
        }));
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}

/// GET /api/v1/resume/:file_name
pub async fn handle_get_content(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<ContentResponse>, AppError> {
    let content = read_resume_text(&state, &file_name).await?;
    Ok(Json(ContentResponse {
        file_name,
        content,
        content_type: "text/plain".to_string(),
    }))
}

/// GET /api/v1/resume/analyze/:file_name
///
/// Best-available mode: providers are tried in priority order.
pub async fn handle_analyze(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(file_name): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    analyze(&state, &ctx, &file_name, ProviderSelector::BestAvailable).await
}

/// GET /api/v1/resume/analyze/:file_name/provider/:provider
pub async fn handle_analyze_with_provider(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((file_name, provider)): Path<(String, String)>,
) -> Result<Json<AnalysisResult>, AppError> {
    let name: ProviderName = provider
        .parse()
        .map_err(|_| AppError::UnknownProvider(provider))?;
    analyze(&state, &ctx, &file_name, ProviderSelector::Explicit(name)).await
}

/// DELETE /api/v1/resume/:file_name
pub async fn handle_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(file_name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.storage.delete(&file_name).await?;
    info!(correlation_id = %ctx.correlation_id, %file_name, "resume deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn analyze(
    state: &AppState,
    ctx: &RequestContext,
    file_name: &str,
    selector: ProviderSelector,
) -> Result<Json<AnalysisResult>, AppError> {
    let resume_text = read_resume_text(state, file_name).await?;
    let result = state
        .orchestrator
        .analyze(ctx, file_name, &resume_text, selector)
        .await?;
    Ok(Json(result))
}

async fn read_resume_text(state: &AppState, file_name: &str) -> Result<String, AppError> {
    let bytes = state.storage.read(file_name).await?;
    Ok(extract_text(file_name, &bytes)?)
}
