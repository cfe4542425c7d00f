mod config;
mod memory;
mod redis;
mod sqlite;
mod types;

pub use config::open_backend_from_env;
pub use types::{
    InMemoryKeyValueStore, KeyValueStore, RedisKeyValueStore, SharedKeyValueStore,
    SqliteKeyValueStore, shared,
};
