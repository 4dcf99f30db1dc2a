//! Two-tier cache over the key-value store.
//!
//! Status entries (`oa_cache_` prefix, keyed by DOI) carry a 7-day TTL since
//! open-access status changes as publishers flip embargoes. Identifier
//! entries (`doi_cache_` prefix, keyed by normalized title) never expire: a
//! title-to-DOI binding is permanent, and negative results are cached too so
//! unmatched titles are not re-queried every page load.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::metrics;
use crate::resolver::DoiRecord;
use crate::status::OaRecord;

use super::store::{KeyValueStore, StoreError};

/// Days before a cached status entry goes stale.
pub const CACHE_TTL_DAYS: i64 = 7;

/// Key prefix for status cache entries.
pub const STATUS_PREFIX: &str = "oa_cache_";

/// Key prefix for identifier cache entries.
pub const DOI_PREFIX: &str = "doi_cache_";

/// A timestamped cache envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
        }
    }

    /// Entries exactly at the TTL boundary are already stale.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp < Duration::days(CACHE_TTL_DAYS)
    }
}

/// Aggregate counts over both cache tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
    pub status_entries: usize,
    pub doi_entries: usize,
}

/// Cache facade used by the resolver and the pipeline.
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn KeyValueStore>,
}

impl CacheLayer {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn status_key(doi: &str) -> String {
        format!("{}{}", STATUS_PREFIX, doi)
    }

    fn doi_key(normalized_title: &str) -> String {
        format!("{}{}", DOI_PREFIX, normalized_title)
    }

    /// Fetch still-valid status records for the given DOIs. Expired entries
    /// are treated as misses and left in place to be overwritten.
    pub async fn get_valid_status_many(
        &self,
        dois: &[String],
    ) -> Result<HashMap<String, OaRecord>, StoreError> {
        let keys: Vec<String> = dois.iter().map(|d| Self::status_key(d)).collect();
        let raw = self.store.get_many(&keys).await?;
        let now = Utc::now();

        let mut out = HashMap::new();
        for doi in dois {
            let Some(value) = raw.get(&Self::status_key(doi)) else {
                metrics::CACHE_EVENTS
                    .with_label_values(&["status", "miss"])
                    .inc();
                continue;
            };

            match serde_json::from_value::<CacheEntry<OaRecord>>(value.clone()) {
                Ok(entry) if entry.is_valid_at(now) => {
                    metrics::CACHE_EVENTS
                        .with_label_values(&["status", "hit"])
                        .inc();
                    out.insert(doi.clone(), entry.data);
                }
                Ok(_) => {
                    metrics::CACHE_EVENTS
                        .with_label_values(&["status", "expired"])
                        .inc();
                }
                Err(e) => {
                    warn!(doi = %doi, error = %e, "Discarding undecodable status cache entry");
                    metrics::CACHE_EVENTS
                        .with_label_values(&["status", "miss"])
                        .inc();
                }
            }
        }

        Ok(out)
    }

    /// Store a freshly fetched status record, stamped now.
    pub async fn put_status(&self, doi: &str, record: &OaRecord) -> Result<(), StoreError> {
        let entry = CacheEntry::new(record);
        let value = serde_json::to_value(&entry)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&Self::status_key(doi), value).await?;
        metrics::CACHE_EVENTS
            .with_label_values(&["status", "write"])
            .inc();
        Ok(())
    }

    /// Fetch cached DOI records for the given normalized titles.
    ///
    /// Entries written by earlier versions were bare DOI strings; those are
    /// migrated in place to the current envelope shape on first read.
    pub async fn get_doi_records(
        &self,
        normalized_titles: &[String],
    ) -> Result<HashMap<String, DoiRecord>, StoreError> {
        let keys: Vec<String> = normalized_titles.iter().map(|t| Self::doi_key(t)).collect();
        let raw = self.store.get_many(&keys).await?;

        let mut out = HashMap::new();
        for title in normalized_titles {
            let Some(value) = raw.get(&Self::doi_key(title)) else {
                metrics::CACHE_EVENTS
                    .with_label_values(&["doi", "miss"])
                    .inc();
                continue;
            };

            let record = match decode_doi_entry(title, value) {
                Some(DecodedDoiEntry::Current(record)) => record,
                Some(DecodedDoiEntry::Legacy(record)) => {
                    debug!(title = %title, "Migrating legacy identifier cache entry");
                    self.put_doi_record(title, &record).await?;
                    record
                }
                None => {
                    warn!(title = %title, "Discarding undecodable identifier cache entry");
                    metrics::CACHE_EVENTS
                        .with_label_values(&["doi", "miss"])
                        .inc();
                    continue;
                }
            };

            metrics::CACHE_EVENTS
                .with_label_values(&["doi", "hit"])
                .inc();
            out.insert(title.clone(), record);
        }

        Ok(out)
    }

    /// Store a resolution result. Callers must not pass records carrying a
    /// service error; those are transient and stay uncached.
    pub async fn put_doi_record(
        &self,
        normalized_title: &str,
        record: &DoiRecord,
    ) -> Result<(), StoreError> {
        let entry = CacheEntry::new(record);
        let value = serde_json::to_value(&entry)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&Self::doi_key(normalized_title), value).await?;
        metrics::CACHE_EVENTS
            .with_label_values(&["doi", "write"])
            .inc();
        Ok(())
    }

    /// Drop every entry from both tiers, returning how many were removed.
    pub async fn clear_all(&self) -> Result<usize, StoreError> {
        let mut keys = self.store.list_keys_with_prefix(STATUS_PREFIX).await?;
        keys.extend(self.store.list_keys_with_prefix(DOI_PREFIX).await?);
        let removed = self.store.remove_many(&keys).await?;
        metrics::CACHE_EVENTS
            .with_label_values(&["all", "clear"])
            .inc();
        Ok(removed)
    }

    /// Count entries per tier and per freshness. Identifier entries never
    /// expire, so they always count as valid.
    pub async fn stats(&self) -> Result<CacheStats, StoreError> {
        let status_keys = self.store.list_keys_with_prefix(STATUS_PREFIX).await?;
        let doi_keys = self.store.list_keys_with_prefix(DOI_PREFIX).await?;
        let now = Utc::now();

        let raw = self.store.get_many(&status_keys).await?;
        let mut expired = 0;
        for value in raw.values() {
            match serde_json::from_value::<CacheEntry<OaRecord>>(value.clone()) {
                Ok(entry) if entry.is_valid_at(now) => {}
                _ => expired += 1,
            }
        }

        let total = status_keys.len() + doi_keys.len();
        Ok(CacheStats {
            total,
            valid: total - expired,
            expired,
            status_entries: status_keys.len(),
            doi_entries: doi_keys.len(),
        })
    }
}

enum DecodedDoiEntry {
    Current(DoiRecord),
    Legacy(DoiRecord),
}

fn decode_doi_entry(title: &str, value: &Value) -> Option<DecodedDoiEntry> {
    // Legacy shape: the value is the DOI itself.
    if let Value::String(doi) = value {
        return Some(DecodedDoiEntry::Legacy(DoiRecord::from_legacy_cached(
            title,
            doi.clone(),
        )));
    }

    serde_json::from_value::<CacheEntry<DoiRecord>>(value.clone())
        .ok()
        .map(|e| DecodedDoiEntry::Current(e.data))
}
