//! End-to-end pipeline tests over the in-memory store and mocks.

use std::sync::Arc;

use chrono::{Duration, Utc};

use oalens_core::cache::{CacheEntry, CacheLayer, KeyValueStore, MemoryStore};
use oalens_core::pipeline::{ItemState, PageItem, Pipeline};
use oalens_core::resolver::{DoiResolver, DoiSource, DEFAULT_MIN_MATCH_SCORE};
use oalens_core::status::OaStatus;
use oalens_core::testing::{fixtures, MockCatalog, MockStatusService, RecordingRenderer};
use oalens_core::Settings;

struct Harness {
    pipeline: Pipeline,
    cache: CacheLayer,
    store: Arc<MemoryStore>,
    catalog: Arc<MockCatalog>,
    status: Arc<MockStatusService>,
    renderer: Arc<RecordingRenderer>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let cache = CacheLayer::new(store.clone());
    let catalog = Arc::new(MockCatalog::new());
    let status = Arc::new(MockStatusService::new());
    let renderer = Arc::new(RecordingRenderer::new());

    let resolver = DoiResolver::new(catalog.clone(), cache.clone(), DEFAULT_MIN_MATCH_SCORE);
    let pipeline = Pipeline::new(
        resolver,
        status.clone(),
        cache.clone(),
        Settings::new("oa@example.org"),
        renderer.clone(),
    );

    Harness {
        pipeline,
        cache,
        store,
        catalog,
        status,
        renderer,
    }
}

#[tokio::test]
async fn full_batch_mixes_page_dois_catalog_matches_and_misses() {
    let h = harness();

    h.catalog
        .set_results(vec![fixtures::catalog_work(
            "W1",
            "https://doi.org/10.5555/matched",
            "Attention Is All You Need",
        )])
        .await;
    h.status
        .set_record("10.1234/frompage", fixtures::oa_record(OaStatus::Green))
        .await;
    h.status
        .set_record("10.5555/matched", fixtures::oa_record(OaStatus::Gold))
        .await;

    let outcomes = h
        .pipeline
        .process_page(&[
            PageItem::new("a", "Some Paywalled Paper").with_doi("10.1234/frompage"),
            PageItem::new("b", "Attention is all you need"),
            PageItem::new("c", "An Entirely Unindexed Manuscript"),
        ])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);

    // Item a: page-sourced DOI, no catalog involvement.
    assert_eq!(outcomes[0].doi_record.source, DoiSource::Page);
    assert_eq!(outcomes[0].state, ItemState::Done);
    assert_eq!(
        outcomes[0].oa_record.as_ref().unwrap().status,
        OaStatus::Green
    );

    // Item b: fuzzy-matched against the catalog, DOI URL prefix stripped.
    assert_eq!(outcomes[1].doi_record.doi.as_deref(), Some("10.5555/matched"));
    assert_eq!(outcomes[1].doi_record.source, DoiSource::Catalog);
    assert!(outcomes[1].doi_record.match_score.unwrap() > 0.8);

    // Item c: clean negative, no status fetch for it.
    assert!(!outcomes[2].doi_record.found);
    assert!(outcomes[2].oa_record.is_none());
    assert_eq!(outcomes[2].state, ItemState::Done);

    // One catalog call for the two unresolved titles, one status fetch per
    // unique DOI.
    assert_eq!(h.catalog.call_count().await, 1);
    assert_eq!(h.catalog.recorded_calls().await[0].len(), 2);
    assert_eq!(h.status.fetch_count().await, 2);

    assert_eq!(h.renderer.started_count(), 3);
    let mut resolved = h.renderer.resolved_ids();
    resolved.sort();
    assert_eq!(resolved, vec!["a", "b"]);
    assert_eq!(h.renderer.not_found_ids(), vec!["c"]);
}

#[tokio::test]
async fn second_pass_is_served_entirely_from_cache() {
    let h = harness();

    h.catalog
        .set_results(vec![fixtures::catalog_work(
            "W1",
            "10.5555/matched",
            "Graph Neural Networks",
        )])
        .await;
    h.status
        .set_record("10.5555/matched", fixtures::oa_record(OaStatus::Hybrid))
        .await;

    let items = [
        PageItem::new("a", "Graph Neural Networks"),
        PageItem::new("b", "A Paper Nobody Indexed"),
    ];

    h.pipeline.process_page(&items).await.unwrap();
    let outcomes = h.pipeline.process_page(&items).await.unwrap();

    // Both the match and the negative were cached; the status was TTL-valid.
    assert_eq!(h.catalog.call_count().await, 1);
    assert_eq!(h.status.fetch_count().await, 1);
    assert!(outcomes[0].doi_record.found);
    assert!(!outcomes[1].doi_record.found);
}

#[tokio::test]
async fn expired_status_entry_triggers_refetch() {
    let h = harness();
    h.status
        .set_record("10.1/a", fixtures::oa_record(OaStatus::Bronze))
        .await;

    // Six days old: still valid, no fetch.
    let fresh = CacheEntry {
        data: fixtures::oa_record(OaStatus::Gold),
        timestamp: Utc::now() - Duration::days(6),
    };
    h.store
        .set("oa_cache_10.1/a", serde_json::to_value(&fresh).unwrap())
        .await
        .unwrap();

    let item = PageItem::new("a", "Paper").with_doi("10.1/a");
    let outcomes = h.pipeline.process_batch(&[item.clone()]).await.unwrap();
    assert_eq!(h.status.fetch_count().await, 0);
    assert_eq!(outcomes[0].oa_record.as_ref().unwrap().status, OaStatus::Gold);

    // Eight days old: stale, fetched and overwritten.
    let stale = CacheEntry {
        data: fixtures::oa_record(OaStatus::Gold),
        timestamp: Utc::now() - Duration::days(8),
    };
    h.store
        .set("oa_cache_10.1/a", serde_json::to_value(&stale).unwrap())
        .await
        .unwrap();

    let outcomes = h.pipeline.process_batch(&[item]).await.unwrap();
    assert_eq!(h.status.fetch_count().await, 1);
    assert_eq!(
        outcomes[0].oa_record.as_ref().unwrap().status,
        OaStatus::Bronze
    );
}

#[tokio::test]
async fn pages_are_processed_in_batches_of_ten() {
    let h = harness();

    let items: Vec<PageItem> = (0..12)
        .map(|i| PageItem::new(format!("item-{i}"), format!("Unique Title Number {i}")))
        .collect();

    let outcomes = h.pipeline.process_page(&items).await.unwrap();
    assert_eq!(outcomes.len(), 12);

    // 12 items with no page DOI split into a 10-title and a 2-title query.
    let calls = h.catalog.recorded_calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].len(), 10);
    assert_eq!(calls[1].len(), 2);
    assert_eq!(h.renderer.finished_sizes(), vec![10, 2]);
}

#[tokio::test]
async fn cache_admin_clear_and_stats() {
    let h = harness();

    h.catalog
        .set_results(vec![fixtures::catalog_work(
            "W1",
            "10.5555/matched",
            "Graph Neural Networks",
        )])
        .await;
    h.status
        .set_record("10.5555/matched", fixtures::oa_record(OaStatus::Gold))
        .await;

    h.pipeline
        .process_batch(&[
            PageItem::new("a", "Graph Neural Networks"),
            PageItem::new("b", "A Paper Nobody Indexed"),
        ])
        .await
        .unwrap();

    // Two identifier entries (one positive, one negative) and one status entry.
    let stats = h.cache.stats().await.unwrap();
    assert_eq!(stats.doi_entries, 2);
    assert_eq!(stats.status_entries, 1);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.valid, 3);
    assert_eq!(stats.expired, 0);

    let cleared = h.cache.clear_all().await.unwrap();
    assert_eq!(cleared, 3);
    assert_eq!(h.cache.stats().await.unwrap().total, 0);

    // A fresh lookup goes back to the services.
    h.pipeline
        .process_batch(&[PageItem::new("a", "Graph Neural Networks")])
        .await
        .unwrap();
    assert_eq!(h.catalog.call_count().await, 2);
    assert_eq!(h.status.fetch_count().await, 2);
}
