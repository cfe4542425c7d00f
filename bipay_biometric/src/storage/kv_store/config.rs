use std::{
    env,
    sync::{Arc, LazyLock},
};
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

use super::types::{
    InMemoryKeyValueStore, KeyValueStore, RedisKeyValueStore, SharedKeyValueStore,
    SqliteKeyValueStore,
};

/// Table prefix from environment variable
pub(crate) static KV_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("KV_TABLE_PREFIX").unwrap_or_else(|_| "bipay_".to_string()));

/// Key-value table name used by the SQLite backend
pub(crate) static DB_TABLE_KV_ENTRIES: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_KV_ENTRIES")
        .unwrap_or_else(|_| format!("{}{}", *KV_TABLE_PREFIX, "kv_entries"))
});

/// Build and initialize the backend selected by `KV_STORE_TYPE` and `KV_STORE_URL`.
///
/// Supported types are `memory` (the default, URL ignored), `redis` and `sqlite`.
pub async fn open_backend_from_env() -> Result<SharedKeyValueStore, StorageError> {
    let store_type = env::var("KV_STORE_TYPE").unwrap_or_else(|_| "memory".to_string());
    let store_url = env::var("KV_STORE_URL").ok();

    tracing::info!(
        "Initializing key-value store with type: {}, url: {:?}",
        store_type,
        store_url
    );

    let store: Box<dyn KeyValueStore> = match store_type.as_str() {
        "memory" => Box::new(InMemoryKeyValueStore::new()),
        "redis" => Box::new(RedisKeyValueStore::open(&require_url(store_url.as_deref())?)?),
        "sqlite" => Box::new(SqliteKeyValueStore::connect(&require_url(
            store_url.as_deref(),
        )?)?),
        t => {
            return Err(StorageError::Config(format!(
                "Unsupported key-value store type: {t}. Supported types are 'memory', 'redis' and 'sqlite'"
            )));
        }
    };

    if let Err(e) = store.init().await {
        tracing::error!("Failed to initialize key-value store: {}", e);
        return Err(e);
    }

    tracing::info!("Connected to key-value store: type={}", store_type);

    Ok(Arc::new(Mutex::new(store)))
}

fn require_url(url: Option<&str>) -> Result<String, StorageError> {
    url.map(str::to_string)
        .ok_or_else(|| StorageError::Config("KV_STORE_URL must be set".to_string()))
}
