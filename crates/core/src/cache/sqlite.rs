//! SQLite-backed key-value store implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::Value;

use super::store::{KeyValueStore, StoreError};

/// SQLite-backed key-value store. Values are stored as JSON text.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Backend(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv_cache WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                _ => Err(StoreError::Backend(e.to_string())),
            })?;

        raw.map(|s| {
            serde_json::from_str(&s).map_err(|e| StoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Value>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT value FROM kv_cache WHERE key = ?")
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut out = HashMap::new();
        for key in keys {
            let raw: Option<String> = stmt
                .query_row(params![key], |row| row.get(0))
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    _ => Err(StoreError::Backend(e.to_string())),
                })?;

            if let Some(raw) = raw {
                let value = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                out.insert(key.clone(), value);
            }
        }

        Ok(out)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(&value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv_cache (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, &raw],
        )
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut removed = 0;
        for key in keys {
            removed += conn
                .execute("DELETE FROM kv_cache WHERE key = ?", params![key])
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        Ok(removed)
    }

    async fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().unwrap();

        // LIKE treats % and _ as wildcards, so escape them in the prefix.
        let pattern = format!(
            "{}%",
            prefix
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_")
        );

        let mut stmt = conn
            .prepare("SELECT key FROM kv_cache WHERE key LIKE ? ESCAPE '\\'")
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let rows = stmt
            .query_map(params![&pattern], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row.map_err(|e| StoreError::Backend(e.to_string()))?);
        }
        Ok(keys)
    }
}
