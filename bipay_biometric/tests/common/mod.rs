use bipay_biometric::{
    BiometricConfig, BiometricDatabase, BiometricProvider, InMemoryKeyValueStore,
    SharedKeyValueStore, SqliteKeyValueStore, shared,
};
use std::sync::Arc;

/// Backend flavours the flows are run against
#[derive(Clone, Copy, Debug)]
pub enum Backend {
    Memory,
    Sqlite,
}

pub const ALL_BACKENDS: [Backend; 2] = [Backend::Memory, Backend::Sqlite];

pub fn test_config() -> BiometricConfig {
    BiometricConfig::without_delays()
}

pub fn open_backend(kind: Backend) -> SharedKeyValueStore {
    match kind {
        Backend::Memory => shared(InMemoryKeyValueStore::new()),
        Backend::Sqlite => shared(
            SqliteKeyValueStore::connect("sqlite::memory:").expect("in-memory sqlite url"),
        ),
    }
}

/// Open a store over `backend` with delays disabled.
pub async fn open_database(backend: &SharedKeyValueStore) -> Arc<BiometricDatabase> {
    Arc::new(BiometricDatabase::open(backend.clone(), test_config()).await)
}

pub async fn open_provider(kind: Backend) -> (BiometricProvider, SharedKeyValueStore) {
    let backend = open_backend(kind);
    let db = open_database(&backend).await;
    (BiometricProvider::new(db), backend)
}
