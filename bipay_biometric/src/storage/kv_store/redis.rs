use async_trait::async_trait;
use redis::{self, AsyncCommands};

use crate::storage::errors::StorageError;

use super::types::{KeyValueStore, RedisKeyValueStore};

const KV_PREFIX: &str = "kv";

impl RedisKeyValueStore {
    pub fn open(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    fn make_key(key: &str) -> String {
        format!("{KV_PREFIX}:{key}")
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn init(&self) -> Result<(), StorageError> {
        // Verify the connection works
        let _conn = self.client.get_multiplexed_async_connection().await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let value: Option<String> = conn.get(&key).await?;
        Ok(value)
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let _: () = conn.set(&key, value).await?;
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let key = Self::make_key(key);
        let _: () = conn.del(&key).await?;
        Ok(())
    }
}
