//! bipay_biometric - Synthetic biometric template store for the BiPay demo
//!
//! This crate keeps enrollment templates per user in a pluggable key-value
//! backend, generates synthetic fingerprint-like templates, and authenticates
//! a presented template by prefix similarity against every stored template.
//!
//! The matching heuristic is a placeholder for demo purposes. It is not
//! cryptographic and gives no real authentication guarantee.

mod biometric;
mod config;
mod provider;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use biometric::{
    BiometricDatabase, BiometricError, BiometricStats, BiometricTemplate, DeviceInfo,
    TemplateType, extract_pattern, longest_common_prefix_len, raw_similarity,
};

pub use config::{
    BIOMETRIC_DB_KEY, BIOMETRIC_DEVICE_ID_KEY, BiometricConfig, CREDENTIAL_KEY,
    CURRENT_TEMPLATE_ID_KEY, ENROLLED_FLAG_KEY, ENROLLED_TYPE_KEY, LEGACY_TEMPLATE_KEY,
};

pub use provider::{BiometricKind, BiometricProvider, ClientEnvironment};

pub use storage::{
    InMemoryKeyValueStore, KeyValueStore, RedisKeyValueStore, SharedKeyValueStore,
    SqliteKeyValueStore, StorageError, open_backend_from_env, shared,
};
