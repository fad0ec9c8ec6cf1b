// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::migrate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::storage::{Storage, StorageError};

/// Key-value storage backed by an embedded SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens a sqlite database connection.
    /// If `state_dir` is `None`, it opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created, the database cannot be
    /// opened, or migrations fail.
    pub async fn open(state_dir: Option<&Path>) -> Result<Self, StorageError> {
        let pool = if let Some(dir) = state_dir {
            const NAME: &str = "shortlist.db";

            tracing::info!(dir = %dir.display(), "connecting to SQLite database");
            tokio::fs::create_dir_all(dir).await?;
            let options = SqliteConnectOptions::new()
                .filename(dir.join(NAME))
                .create_if_missing(true);
            SqlitePoolOptions::new().connect_with(options).await?
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            // every connection to `:memory:` is a separate database, so pin a single one
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::new().in_memory(true))
                .await?
        };

        migrate!("src/localdb/migrations") // relative path from the crate root
            .run(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        const SQL: &str = "
INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = excluded.updated_at
";

        sqlx::query(SQL)
            .bind(key)
            .bind(value)
            .bind(Timestamp::now().to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
