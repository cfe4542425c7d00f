//! Shared helpers for unit tests across the crate.

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};
use std::sync::Arc;
use std::time::Duration;

use crate::biometric::BiometricDatabase;
use crate::config::BiometricConfig;
use crate::storage::{InMemoryKeyValueStore, KeyValueStore, SharedKeyValueStore, StorageError, shared};

/// In-memory store with a seeded rng and no artificial delays.
///
/// Returns the backend too so tests can inspect what was persisted.
pub(crate) async fn seeded_database(seed: u64) -> (Arc<BiometricDatabase>, SharedKeyValueStore) {
    let backend = shared(InMemoryKeyValueStore::new());
    let db = BiometricDatabase::open_with_rng(
        backend.clone(),
        BiometricConfig::without_delays(),
        StdRng::seed_from_u64(seed),
    )
    .await;
    (Arc::new(db), backend)
}

/// Backend that reads as empty and rejects every write.
#[derive(Default)]
pub(crate) struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&mut self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Storage("quota exceeded".to_string()))
    }

    async fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Storage("quota exceeded".to_string()))
    }
}

/// In-memory backend whose reads take `delay` to complete.
pub(crate) struct SlowKeyValueStore {
    inner: InMemoryKeyValueStore,
    delay: Duration,
}

impl SlowKeyValueStore {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryKeyValueStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl KeyValueStore for SlowKeyValueStore {
    async fn init(&self) -> Result<(), StorageError> {
        self.inner.init().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}
