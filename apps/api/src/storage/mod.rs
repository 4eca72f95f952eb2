//! Resume blob storage — filesystem or Postgres, behind one trait.

use async_trait::async_trait;
use thiserror::Error;

pub mod database;
pub mod local;

pub use database::DatabaseStorage;
pub use local::LocalStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("resume {0} not found")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Blob store keyed by (sanitized) file name.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Saves or replaces the file.
    async fn save(&self, file_name: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Raw stored bytes. `NotFound` when the file was never saved.
    async fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError>;

    /// Non-throwing existence check; backend failures degrade to `false`.
    async fn exists(&self, file_name: &str) -> bool;

    /// Removes the file. `NotFound` when there is nothing to remove.
    async fn delete(&self, file_name: &str) -> Result<(), StorageError>;
}
