//! Postgres-backed resume store. One table, upsert on save.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::storage::{ResumeStore, StorageError};

pub struct DatabaseStorage {
    pool: PgPool,
}

impl DatabaseStorage {
    /// Ensures the backing table exists before handing the store out.
    pub async fn new(pool: PgPool) -> Result<Self, StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                file_name   TEXT PRIMARY KEY,
                content     BYTEA NOT NULL,
                uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ResumeStore for DatabaseStorage {
    async fn save(&self, file_name: &str, content: &[u8]) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO resumes (file_name, content, uploaded_at)
            VALUES ($1, $2, now())
            ON CONFLICT (file_name)
            DO UPDATE SET content = EXCLUDED.content, uploaded_at = now()
            "#,
        )
        .bind(file_name)
        .bind(content)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn read(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT content FROM resumes WHERE file_name = $1")
                .bind(file_name)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(content,)| content)
            .ok_or_else(|| StorageError::NotFound(file_name.to_string()))
    }

    async fn exists(&self, file_name: &str) -> bool {
        let result: Result<(bool,), _> =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM resumes WHERE file_name = $1)")
                .bind(file_name)
                .fetch_one(&self.pool)
                .await;
        match result {
            Ok((exists,)) => exists,
            Err(e) => {
                warn!("existence check failed for {file_name}: {e}");
                false
            }
        }
    }

    async fn delete(&self, file_name: &str) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM resumes WHERE file_name = $1")
            .bind(file_name)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(file_name.to_string()));
        }
        Ok(())
    }
}
