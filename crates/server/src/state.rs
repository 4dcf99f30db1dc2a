use std::sync::Arc;

use oalens_core::cache::CacheLayer;
use oalens_core::{Config, Pipeline};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Arc<Pipeline>,
    cache: CacheLayer,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<Pipeline>, cache: CacheLayer) -> Self {
        Self {
            config,
            pipeline,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }
}
