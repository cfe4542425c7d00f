use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the biometric provider.
///
/// Store operations follow a best-effort contract and log persistence
/// failures instead of returning them; only provider flows and backend
/// construction report errors through this type.
#[derive(Debug, Error)]
pub enum BiometricError {
    /// Error from the key-value backend
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// Invalid configuration, e.g. an unknown backend type
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error converting between data formats using Serde
    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),

    /// The operation was interrupted before its simulated delay elapsed
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<StorageError> for BiometricError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Config(msg) => Self::Config(msg),
            other => Self::Storage(other),
        }
    }
}

impl From<serde_json::Error> for BiometricError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
