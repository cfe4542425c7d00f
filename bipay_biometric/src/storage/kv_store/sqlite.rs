use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use crate::storage::errors::StorageError;

use super::config::DB_TABLE_KV_ENTRIES;
use super::types::{KeyValueStore, SqliteKeyValueStore};

impl SqliteKeyValueStore {
    /// Create a lazily connected store for `url`, e.g. `sqlite:bipay.db` or `sqlite::memory:`.
    ///
    /// The pool keeps a single long-lived connection so that `sqlite::memory:`
    /// databases survive between calls.
    pub fn connect(url: &str) -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(0)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(opts);

        Ok(Self {
            pool,
            table: DB_TABLE_KV_ENTRIES.to_string(),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            self.table
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>(&format!(
            "SELECT value FROM {} WHERE key = ?",
            self.table
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            self.table
        ))
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        sqlx::query(&format!("DELETE FROM {} WHERE key = ?", self.table))
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
