use anyhow::{bail, Context, Result};

use crate::analysis::DEFAULT_RETRY_ATTEMPTS;

/// Which backend stores uploaded resume files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Database,
}

/// Application configuration loaded from environment variables.
/// Provider API keys are optional — a missing key makes that provider report
/// itself unavailable instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub storage_backend: StorageBackend,
    pub storage_path: String,
    /// Required only when `storage_backend` is `Database`.
    pub database_url: Option<String>,
    pub retry_attempts: u32,
    pub max_upload_bytes: usize,
    pub rate_limit_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "database" => StorageBackend::Database,
            other => bail!("STORAGE_BACKEND must be 'local' or 'database', got '{other}'"),
        };

        let database_url = optional_env("DATABASE_URL");
        if storage_backend == StorageBackend::Database && database_url.is_none() {
            bail!("DATABASE_URL is required when STORAGE_BACKEND=database");
        }

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            storage_backend,
            storage_path: std::env::var("STORAGE_PATH").unwrap_or_else(|_| "resumes".to_string()),
            database_url,
            retry_attempts: parse_env("AI_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            rate_limit_per_minute: parse_env("RATE_LIMIT_PER_MINUTE", 10)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
