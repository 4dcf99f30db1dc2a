//! Lookup pipeline: takes page items through DOI resolution and status
//! fetching, batch by batch.

mod render;
mod types;

pub use render::{NoopRenderer, Renderer};
pub use types::{ItemOutcome, ItemState, PageItem};

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::{CacheLayer, StoreError};
use crate::doi::strip_doi_url_prefix;
use crate::matching::normalize_title;
use crate::metrics;
use crate::resolver::{DoiRecord, DoiResolver};
use crate::settings::Settings;
use crate::status::{OaRecord, OaStatusService};

/// Items per batch; also the upper bound on titles per catalog query.
pub const BATCH_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
}

/// Drives items through resolution and status lookup.
pub struct Pipeline {
    resolver: DoiResolver,
    status: Arc<dyn OaStatusService>,
    cache: CacheLayer,
    settings: Settings,
    renderer: Arc<dyn Renderer>,
    batch_size: usize,
}

impl Pipeline {
    pub fn new(
        resolver: DoiResolver,
        status: Arc<dyn OaStatusService>,
        cache: CacheLayer,
        settings: Settings,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            resolver,
            status,
            cache,
            settings,
            renderer,
            batch_size: BATCH_SIZE,
        }
    }

    /// Override the batch size (must be at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Process a whole page of items in sequential batches. Batches never
    /// overlap, so at most one catalog query is in flight at a time.
    pub async fn process_page(&self, items: &[PageItem]) -> Result<Vec<ItemOutcome>, PipelineError> {
        if !self.settings.enabled {
            debug!("Lookups disabled, skipping page");
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::with_capacity(items.len());
        for batch in items.chunks(self.batch_size) {
            outcomes.extend(self.process_batch(batch).await?);
        }

        info!(
            items = items.len(),
            failed = outcomes.iter().filter(|o| o.is_failure()).count(),
            "Page processed"
        );
        Ok(outcomes)
    }

    /// Process one batch. Every input item gets a terminal outcome; a
    /// failing status fetch marks its own items and never aborts siblings.
    pub async fn process_batch(&self, items: &[PageItem]) -> Result<Vec<ItemOutcome>, PipelineError> {
        if !self.settings.enabled {
            return Ok(Vec::new());
        }

        let mut states = vec![ItemState::Pending; items.len()];
        for item in items {
            self.renderer.lookup_started(item);
        }

        // Resolution phase: page-extracted DOIs short-circuit the catalog.
        let mut needs_resolve: Vec<String> = Vec::new();
        for (i, item) in items.iter().enumerate() {
            states[i] = ItemState::Resolving;
            if item.extracted_doi.is_none() {
                needs_resolve.push(item.title.clone());
            }
        }

        let resolved = self
            .resolver
            .resolve(&needs_resolve, &self.settings.contact_email)
            .await?;

        let doi_records: Vec<DoiRecord> = items
            .iter()
            .map(|item| match &item.extracted_doi {
                Some(doi) => DoiRecord::from_page(&item.title, strip_doi_url_prefix(doi)),
                None => resolved
                    .get(&normalize_title(&item.title))
                    .cloned()
                    .unwrap_or_else(|| DoiRecord::not_found(&item.title)),
            })
            .collect();

        // Status phase: one fetch per unique DOI, cache-valid hits reused,
        // misses fetched concurrently.
        let mut unique_dois: Vec<String> = Vec::new();
        for record in &doi_records {
            if let Some(doi) = &record.doi {
                if !unique_dois.contains(doi) {
                    unique_dois.push(doi.clone());
                }
            }
        }
        for state in states.iter_mut() {
            *state = ItemState::Fetching;
        }

        let mut oa_records = self.cache.get_valid_status_many(&unique_dois).await?;

        let misses: Vec<&String> = unique_dois
            .iter()
            .filter(|d| !oa_records.contains_key(*d))
            .collect();

        let fetches = join_all(misses.iter().map(|doi| {
            let doi = doi.as_str();
            async move { (doi, self.status.fetch(doi, &self.settings.contact_email).await) }
        }))
        .await;

        for (doi, result) in fetches {
            match result {
                Ok(record) => {
                    self.cache.put_status(doi, &record).await?;
                    oa_records.insert(doi.to_string(), record);
                }
                Err(e) => {
                    warn!(doi = %doi, error = %e, "Status fetch failed");
                    oa_records.insert(doi.to_string(), OaRecord::failed(e.to_string()));
                }
            }
        }

        Ok(self.finish_batch(items, doi_records, &oa_records, &mut states))
    }

    fn finish_batch(
        &self,
        items: &[PageItem],
        doi_records: Vec<DoiRecord>,
        oa_records: &HashMap<String, OaRecord>,
        states: &mut [ItemState],
    ) -> Vec<ItemOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());

        for ((item, doi_record), state) in items.iter().zip(doi_records).zip(states.iter_mut()) {
            let oa_record = doi_record
                .doi
                .as_ref()
                .and_then(|doi| oa_records.get(doi))
                .cloned();

            let mut outcome = ItemOutcome {
                item_id: item.id.clone(),
                doi_record,
                oa_record,
                state: ItemState::Done,
            };
            if outcome.is_failure() {
                outcome.state = ItemState::Failed;
            }
            *state = outcome.state;

            let label = if outcome.is_failure() {
                "failed"
            } else if outcome.doi_record.found {
                "done"
            } else {
                "not_found"
            };
            metrics::ITEMS_PROCESSED.with_label_values(&[label]).inc();

            match &outcome.oa_record {
                Some(oa) if self.settings.is_visible(oa.status) => {
                    self.renderer
                        .item_resolved(&outcome.item_id, &outcome.doi_record, oa);
                }
                Some(_) => {}
                None => {
                    self.renderer
                        .item_not_found(&outcome.item_id, &outcome.doi_record);
                }
            }

            outcomes.push(outcome);
        }

        self.renderer.lookup_finished(&outcomes);
        outcomes
    }
}
