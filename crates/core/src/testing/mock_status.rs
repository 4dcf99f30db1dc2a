//! Mock status service for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::status::{OaRecord, OaStatusService, StatusError};

/// Mock implementation of the OaStatusService trait.
///
/// Serves records from a DOI-keyed map, records every fetched DOI, and can
/// fail specific DOIs or the next call regardless of DOI.
#[derive(Default)]
pub struct MockStatusService {
    /// Records to serve, keyed by DOI.
    records: Arc<RwLock<HashMap<String, OaRecord>>>,
    /// DOIs that always fail, with their error message.
    failing_dois: Arc<RwLock<HashMap<String, String>>>,
    /// Recorded fetched DOIs, in call order.
    fetches: Arc<RwLock<Vec<String>>>,
    /// If set, the next fetch fails with this error.
    next_error: Arc<RwLock<Option<StatusError>>>,
}

impl MockStatusService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given record for the given DOI.
    pub async fn set_record(&self, doi: &str, record: OaRecord) {
        self.records.write().await.insert(doi.to_string(), record);
    }

    /// Make every fetch of the given DOI fail with a transport error.
    pub async fn fail_doi(&self, doi: &str, message: &str) {
        self.failing_dois
            .write()
            .await
            .insert(doi.to_string(), message.to_string());
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: StatusError) {
        *self.next_error.write().await = Some(error);
    }

    /// DOIs fetched so far, in call order.
    pub async fn recorded_fetches(&self) -> Vec<String> {
        self.fetches.read().await.clone()
    }

    /// Number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl OaStatusService for MockStatusService {
    async fn fetch(&self, doi: &str, _email: &str) -> Result<OaRecord, StatusError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.fetches.write().await.push(doi.to_string());

        if let Some(message) = self.failing_dois.read().await.get(doi) {
            return Err(StatusError::Transport(message.clone()));
        }

        // Unconfigured DOIs behave like an API 404.
        Ok(self
            .records
            .read()
            .await
            .get(doi)
            .cloned()
            .unwrap_or_else(|| OaRecord::unknown("DOI not found")))
    }
}
