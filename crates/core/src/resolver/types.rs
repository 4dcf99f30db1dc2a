//! Types for DOI resolution.

use serde::{Deserialize, Serialize};

/// Sentinel matched-title for records built from a page-extracted DOI.
pub const MATCHED_FROM_PAGE: &str = "(from page)";

/// Sentinel matched-title for records migrated from the legacy cache shape.
pub const MATCHED_FROM_CACHE: &str = "(cached)";

/// Where a DOI came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoiSource {
    /// Scraped directly from the results page.
    Page,
    /// Recovered via fuzzy title match against the works catalog.
    Catalog,
}

/// Result of resolving one title to a canonical DOI. Immutable once built;
/// non-error records are persisted into the identifier cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoiRecord {
    pub found: bool,
    /// Present iff `found`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// The catalog title judged equivalent, or a sentinel for page-sourced
    /// and legacy-cached records. Absent when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    /// The original input title.
    pub searched_title: String,
    pub source: DoiSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DoiRecord {
    /// Record for a DOI extracted directly from the page.
    pub fn from_page(searched_title: impl Into<String>, doi: impl Into<String>) -> Self {
        Self {
            found: true,
            doi: Some(doi.into()),
            matched_title: Some(MATCHED_FROM_PAGE.to_string()),
            match_score: Some(1.0),
            searched_title: searched_title.into(),
            source: DoiSource::Page,
            error: None,
        }
    }

    /// Record for a catalog work bound to a title by the matcher.
    pub fn matched(
        searched_title: impl Into<String>,
        doi: impl Into<String>,
        matched_title: impl Into<String>,
        match_score: f64,
    ) -> Self {
        Self {
            found: true,
            doi: Some(doi.into()),
            matched_title: Some(matched_title.into()),
            match_score: Some(match_score),
            searched_title: searched_title.into(),
            source: DoiSource::Catalog,
            error: None,
        }
    }

    /// Legitimate negative result: the catalog answered but nothing cleared
    /// the match threshold. Cached so the same title is not re-queried.
    pub fn not_found(searched_title: impl Into<String>) -> Self {
        Self {
            found: false,
            doi: None,
            matched_title: None,
            match_score: None,
            searched_title: searched_title.into(),
            source: DoiSource::Catalog,
            error: None,
        }
    }

    /// Negative result caused by a catalog service error. Never cached.
    pub fn lookup_failed(searched_title: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            found: false,
            doi: None,
            matched_title: None,
            match_score: None,
            searched_title: searched_title.into(),
            source: DoiSource::Catalog,
            error: Some(error.into()),
        }
    }

    /// Reconstruct a record from the legacy cache shape (a bare DOI string).
    pub fn from_legacy_cached(searched_title: impl Into<String>, doi: impl Into<String>) -> Self {
        Self {
            found: true,
            doi: Some(doi.into()),
            matched_title: Some(MATCHED_FROM_CACHE.to_string()),
            match_score: Some(1.0),
            searched_title: searched_title.into(),
            source: DoiSource::Catalog,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_iff_doi_present() {
        let records = [
            DoiRecord::from_page("t", "10.1/a"),
            DoiRecord::matched("t", "10.1/a", "T", 0.95),
            DoiRecord::not_found("t"),
            DoiRecord::lookup_failed("t", "HTTP 503"),
            DoiRecord::from_legacy_cached("t", "10.1/a"),
        ];
        for r in records {
            assert_eq!(r.found, r.doi.is_some(), "invariant broken: {:?}", r);
        }
    }

    #[test]
    fn test_page_record_sentinel() {
        let r = DoiRecord::from_page("Some Title", "10.1/a");
        assert_eq!(r.matched_title.as_deref(), Some(MATCHED_FROM_PAGE));
        assert_eq!(r.match_score, Some(1.0));
        assert_eq!(r.source, DoiSource::Page);
    }

    #[test]
    fn test_serde_skips_absent_fields() {
        let json = serde_json::to_value(DoiRecord::not_found("t")).unwrap();
        assert!(json.get("doi").is_none());
        assert!(json.get("match_score").is_none());
        assert_eq!(json["found"], false);
        assert_eq!(json["source"], "catalog");
    }
}
