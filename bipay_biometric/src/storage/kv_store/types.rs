use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

/// Key-value backend shared between the template store and the provider.
pub type SharedKeyValueStore = Arc<Mutex<Box<dyn KeyValueStore>>>;

/// Wrap a backend so it can be handed to [`crate::BiometricDatabase`].
pub fn shared(store: impl KeyValueStore) -> SharedKeyValueStore {
    Arc::new(Mutex::new(Box::new(store)))
}

pub struct InMemoryKeyValueStore {
    pub(super) entry: HashMap<String, String>,
}

pub struct RedisKeyValueStore {
    pub(super) client: redis::Client,
}

pub struct SqliteKeyValueStore {
    pub(super) pool: sqlx::SqlitePool,
    pub(super) table: String,
}

/// String key-value storage with no transactions and no expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Initialize the store. Called once before first use.
    async fn init(&self) -> Result<(), StorageError>;

    /// Get the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
