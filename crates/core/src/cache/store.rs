//! Key-value store abstraction backing the caches.
//!
//! The cache layer depends only on this interface, so tests run against the
//! in-memory implementation while the server uses the SQLite one.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from a key-value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A flat JSON key-value store.
///
/// Writes are whole-value inserts or overwrites, never partial mutations, so
/// concurrent readers always observe a complete record.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get a single value.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Get several values at once. Missing keys are simply absent from the
    /// result map.
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Value>, StoreError>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove the given keys, returning how many existed.
    async fn remove_many(&self, keys: &[String]) -> Result<usize, StoreError>;

    /// List all keys starting with the given prefix.
    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
