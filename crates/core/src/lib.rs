pub mod cache;
pub mod catalog;
pub mod config;
pub mod doi;
pub mod matching;
pub mod metrics;
pub mod pipeline;
pub mod resolver;
pub mod settings;
pub mod status;
pub mod testing;

pub use cache::{CacheLayer, CacheStats, KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use config::{load_config, load_config_from_str, Config, ConfigError};
pub use pipeline::{ItemOutcome, ItemState, NoopRenderer, PageItem, Pipeline, Renderer};
pub use resolver::{DoiRecord, DoiResolver, DoiSource};
pub use settings::Settings;
pub use status::{OaRecord, OaStatus};
