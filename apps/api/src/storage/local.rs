//! Filesystem-backed resume store.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::storage::{ResumeStore, StorageError};

/// Stores each resume as a file under one base directory, created on demand.
/// File names are sanitized before they get here, so plain joins are safe.
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.base_dir.join(file_name)
    }
}

#[async_trait]
impl ResumeStore for LocalStorage {
    async fn save(&self, file_name: &str, content: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir).await?;
        fs::write(self.path_for(file_name), content).await?;
        Ok(())
    }

    async fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.path_for(file_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, file_name: &str) -> bool {
        fs::try_exists(self.path_for(file_name)).await.unwrap_or(false)
    }

    async fn delete(&self, file_name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
