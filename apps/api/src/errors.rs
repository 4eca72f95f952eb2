use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::providers::ProviderName;
use crate::resume::extract::ExtractError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported AI provider: {0}")]
    UnknownProvider(String),

    #[error("Provider {0} is not available")]
    ProviderUnavailable(ProviderName),

    #[error("Provider {provider} failed: {message}")]
    Provider {
        provider: ProviderName,
        message: String,
    },

    #[error("No AI provider is currently available")]
    NoProviderAvailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::EmptyResume => AppError::Validation(err.to_string()),
            AnalysisError::UnknownProvider(name) => AppError::UnknownProvider(name),
            AnalysisError::ProviderUnavailable(name) => AppError::ProviderUnavailable(name),
            AnalysisError::Provider { provider, source } => AppError::Provider {
                provider,
                message: source.to_string(),
            },
            AnalysisError::NoProviderAvailable => AppError::NoProviderAvailable,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => AppError::NotFound(format!("Resume {name} not found")),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        // Unsupported formats and unreadable binaries are caller problems:
        // the stored bytes cannot be turned into text.
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    /// (HTTP status, stable machine-readable code, user-facing message).
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "RESUME_NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::UnknownProvider(name) => (
                StatusCode::BAD_REQUEST,
                "AI_PROVIDER_NOT_FOUND",
                format!("Unsupported AI provider: {name}"),
            ),
            AppError::ProviderUnavailable(name) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_SERVICE_UNAVAILABLE",
                format!("Provider {name} is not available"),
            ),
            AppError::Provider { provider, message } => {
                tracing::error!("Provider {provider} error: {message}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI_SERVICE_UNAVAILABLE",
                    format!("Provider {provider} failed to generate an analysis"),
                )
            }
            AppError::NoProviderAvailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_SERVICE_UNAVAILABLE",
                "No AI provider is currently available".to_string(),
            ),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                "Too many requests. Try again later.".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;

    fn status_and_code(err: AppError) -> (StatusCode, &'static str) {
        let (status, code, _) = err.parts();
        (status, code)
    }

    #[test]
    fn analysis_errors_map_to_expected_statuses() {
        assert_eq!(
            status_and_code(AnalysisError::EmptyResume.into()),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            status_and_code(AnalysisError::UnknownProvider("gpt".into()).into()),
            (StatusCode::BAD_REQUEST, "AI_PROVIDER_NOT_FOUND")
        );
        assert_eq!(
            status_and_code(AnalysisError::ProviderUnavailable(ProviderName::Claude).into()),
            (StatusCode::SERVICE_UNAVAILABLE, "AI_SERVICE_UNAVAILABLE")
        );
        assert_eq!(
            status_and_code(
                AnalysisError::Provider {
                    provider: ProviderName::Gemini,
                    source: ProviderError::EmptyContent,
                }
                .into()
            ),
            (StatusCode::SERVICE_UNAVAILABLE, "AI_SERVICE_UNAVAILABLE")
        );
        assert_eq!(
            status_and_code(AnalysisError::NoProviderAvailable.into()),
            (StatusCode::SERVICE_UNAVAILABLE, "AI_SERVICE_UNAVAILABLE")
        );
    }

    #[test]
    fn storage_not_found_maps_to_404() {
        assert_eq!(
            status_and_code(StorageError::NotFound("cv.pdf".into()).into()),
            (StatusCode::NOT_FOUND, "RESUME_NOT_FOUND")
        );
    }

    #[test]
    fn rate_limited_maps_to_429() {
        assert_eq!(
            status_and_code(AppError::RateLimited),
            (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
        );
    }

    #[test]
    fn provider_error_message_does_not_leak_the_cause() {
        let err: AppError = AnalysisError::Provider {
            provider: ProviderName::Claude,
            source: ProviderError::Api {
                status: 500,
                message: "secret internal detail".to_string(),
            },
        }
        .into();
        let (_, _, message) = err.parts();
        assert!(!message.contains("secret internal detail"));
    }
}
