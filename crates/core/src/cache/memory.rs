//! In-memory key-value store (tests and ephemeral deployments).

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{KeyValueStore, StoreError};

/// HashMap-backed store. Cheap to construct per test.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.write().await;
        Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count())
    }

    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let store = MemoryStore::new();
        store.set("k", json!(1)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!(1)));

        store.set("k", json!({"v": 2})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let store = MemoryStore::new();
        store.set("a", json!("x")).await.unwrap();
        let got = store
            .get_many(&["a".into(), "b".into()])
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["a"], json!("x"));
    }

    #[tokio::test]
    async fn test_remove_many_counts_existing_only() {
        let store = MemoryStore::new();
        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();
        let removed = store
            .remove_many(&["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_keys_with_prefix() {
        let store = MemoryStore::new();
        store.set("oa_cache_1", json!(1)).await.unwrap();
        store.set("oa_cache_2", json!(2)).await.unwrap();
        store.set("doi_cache_1", json!(3)).await.unwrap();

        let mut keys = store.list_keys_with_prefix("oa_cache_").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["oa_cache_1", "oa_cache_2"]);
    }
}
