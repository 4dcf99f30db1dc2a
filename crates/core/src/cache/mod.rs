//! Caching: key-value store backends plus the two-tier cache layer.

mod layer;
mod memory;
mod sqlite;
mod store;

pub use layer::{CacheEntry, CacheLayer, CacheStats, CACHE_TTL_DAYS, DOI_PREFIX, STATUS_PREFIX};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, StoreError};
