//! Prometheus metrics for core components.
//!
//! Covers the works-catalog client, the OA status client, the cache layer,
//! and pipeline outcomes.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Works-catalog lookups by result.
pub static CATALOG_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("oalens_catalog_lookups_total", "Total works-catalog lookups"),
        &["result"], // "success", "error"
    )
    .unwrap()
});

/// OA status fetches by result.
pub static STATUS_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("oalens_status_fetches_total", "Total OA status fetches"),
        &["result"], // "success", "not_found", "error"
    )
    .unwrap()
});

/// Cache lookups by namespace and outcome.
pub static CACHE_EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("oalens_cache_events_total", "Cache lookup events"),
        &["cache", "event"], // cache: "status", "doi", "all"; event: "hit", "miss", "expired", "write", "clear"
    )
    .unwrap()
});

/// Distribution of accepted title-match scores.
pub static MATCH_CONFIDENCE: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "oalens_match_confidence",
            "Distribution of accepted title-match scores",
        )
        .buckets(vec![0.8, 0.85, 0.9, 0.95, 0.99, 1.0]),
    )
    .unwrap()
});

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "oalens_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service"], // "openalex", "unpaywall"
    )
    .unwrap()
});

/// Items processed by terminal outcome.
pub static ITEMS_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("oalens_items_processed_total", "Items processed by outcome"),
        &["outcome"], // "done", "not_found", "failed"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_LOOKUPS.clone()),
        Box::new(STATUS_FETCHES.clone()),
        Box::new(CACHE_EVENTS.clone()),
        Box::new(MATCH_CONFIDENCE.clone()),
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(ITEMS_PROCESSED.clone()),
    ]
}
