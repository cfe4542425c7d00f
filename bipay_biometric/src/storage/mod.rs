mod errors;
mod kv_store;

pub use errors::StorageError;
pub use kv_store::{
    InMemoryKeyValueStore, KeyValueStore, RedisKeyValueStore, SharedKeyValueStore,
    SqliteKeyValueStore, open_backend_from_env, shared,
};
