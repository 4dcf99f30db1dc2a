//! DOI resolution: binds page titles to canonical DOIs via the identifier
//! cache and, for misses, a single batched works-catalog query plus fuzzy
//! title matching.

mod types;

pub use types::{DoiRecord, DoiSource, MATCHED_FROM_CACHE, MATCHED_FROM_PAGE};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheLayer, StoreError};
use crate::catalog::WorksCatalog;
use crate::doi::strip_doi_url_prefix;
use crate::matching::{normalize_title, similarity};
use crate::metrics;

/// Scores at or below this are rejected as coincidental overlap.
pub const DEFAULT_MIN_MATCH_SCORE: f64 = 0.8;

/// Resolves titles to DOIs.
pub struct DoiResolver {
    catalog: Arc<dyn WorksCatalog>,
    cache: CacheLayer,
    min_match_score: f64,
}

impl DoiResolver {
    pub fn new(catalog: Arc<dyn WorksCatalog>, cache: CacheLayer, min_match_score: f64) -> Self {
        Self {
            catalog,
            cache,
            min_match_score,
        }
    }

    /// Resolve a batch of titles. The result is keyed by normalized title and
    /// has an entry for every input: a match, a cached record, a negative
    /// result, or a failure marker when the catalog itself errored.
    ///
    /// Matches and negative results are cached; failure markers are not, so
    /// the titles are retried on the next batch.
    pub async fn resolve(
        &self,
        titles: &[String],
        mailto: &str,
    ) -> Result<HashMap<String, DoiRecord>, StoreError> {
        // Keyed by normalized title; duplicates collapse to one lookup.
        let mut originals: HashMap<String, &str> = HashMap::new();
        let mut normalized: Vec<String> = Vec::new();
        for title in titles {
            let norm = normalize_title(title);
            if norm.is_empty() {
                continue;
            }
            if !originals.contains_key(&norm) {
                originals.insert(norm.clone(), title);
                normalized.push(norm);
            }
        }

        let mut resolved = self.cache.get_doi_records(&normalized).await?;

        let uncached: Vec<String> = normalized
            .iter()
            .filter(|n| !resolved.contains_key(*n))
            .cloned()
            .collect();

        if uncached.is_empty() {
            return Ok(resolved);
        }

        let search_titles: Vec<String> = uncached
            .iter()
            .map(|n| originals[n].to_string())
            .collect();

        debug!(
            cached = resolved.len(),
            uncached = uncached.len(),
            "Resolving titles against works catalog"
        );

        let works = match self.catalog.search_titles(&search_titles, mailto).await {
            Ok(works) => works,
            Err(e) => {
                warn!(error = %e, titles = uncached.len(), "Catalog lookup failed");
                for norm in &uncached {
                    resolved.insert(
                        norm.clone(),
                        DoiRecord::lookup_failed(originals[norm], e.to_string()),
                    );
                }
                return Ok(resolved);
            }
        };

        // Works are walked in catalog relevance order; each claims at most
        // one title and each title is claimed at most once.
        let mut claimed: Vec<bool> = vec![false; uncached.len()];

        for work in &works {
            let (Some(doi), Some(work_title)) = (work.doi.as_deref(), work.title.as_deref())
            else {
                continue;
            };
            let work_norm = normalize_title(work_title);

            let mut best: Option<(usize, f64)> = None;
            for (i, norm) in uncached.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                let score = similarity(&work_norm, norm);
                if score > self.min_match_score && best.is_none_or(|(_, b)| score > b) {
                    best = Some((i, score));
                }
            }

            if let Some((i, score)) = best {
                claimed[i] = true;
                let norm = &uncached[i];
                let doi = strip_doi_url_prefix(doi);
                metrics::MATCH_CONFIDENCE.observe(score);
                debug!(
                    title = %originals[norm],
                    doi = %doi,
                    score = score,
                    "Matched title to catalog work"
                );
                let record = DoiRecord::matched(originals[norm], doi, work_title, score);
                self.cache.put_doi_record(norm, &record).await?;
                resolved.insert(norm.clone(), record);
            }
        }

        // Whatever is left got a real answer from the catalog: cache the
        // negative so the title is not re-queried next page.
        for (i, norm) in uncached.iter().enumerate() {
            if claimed[i] {
                continue;
            }
            let record = DoiRecord::not_found(originals[norm]);
            self.cache.put_doi_record(norm, &record).await?;
            resolved.insert(norm.clone(), record);
        }

        Ok(resolved)
    }
}
