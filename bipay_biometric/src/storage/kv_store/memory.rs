use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;

use super::types::{InMemoryKeyValueStore, KeyValueStore};

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory key-value store");
        Self {
            entry: HashMap::new(),
        }
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entry.remove(key);
        Ok(())
    }
}
