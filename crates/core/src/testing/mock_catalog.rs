//! Mock works catalog for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, CatalogWork, WorksCatalog};

/// Mock implementation of the WorksCatalog trait.
///
/// Returns a configured list of works for every search, records the titles of
/// each call, and can be armed to fail the next call.
#[derive(Default)]
pub struct MockCatalog {
    /// Configured works to return, in catalog relevance order.
    results: Arc<RwLock<Vec<CatalogWork>>>,
    /// Recorded title batches, one per call.
    calls: Arc<RwLock<Vec<Vec<String>>>>,
    /// If set, the next search fails with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the works to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<CatalogWork>) {
        *self.results.write().await = results;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Title batches recorded so far, one entry per search call.
    pub async fn recorded_calls(&self) -> Vec<Vec<String>> {
        self.calls.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl WorksCatalog for MockCatalog {
    async fn search_titles(
        &self,
        titles: &[String],
        _mailto: &str,
    ) -> Result<Vec<CatalogWork>, CatalogError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.calls.write().await.push(titles.to_vec());
        Ok(self.results.read().await.clone())
    }
}
