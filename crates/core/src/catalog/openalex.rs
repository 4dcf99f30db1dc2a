//! OpenAlex works API client.
//!
//! One GET covers a whole batch of titles: the `title.search` filter takes an
//! OR-combination (`|`-separated) of search terms, so the resolver pays a
//! single network round trip per batch regardless of how many titles miss the
//! cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metrics;

use super::types::{CatalogError, CatalogWork};
use super::WorksCatalog;

const DEFAULT_BASE_URL: &str = "https://api.openalex.org/works";

/// Maximum results requested per query.
const DEFAULT_PER_PAGE: u32 = 50;

/// OpenAlex works API client.
pub struct OpenAlexClient {
    client: Client,
    base_url: String,
    per_page: u32,
}

impl OpenAlexClient {
    /// Create a new client. `base_url` defaults to the public OpenAlex works
    /// endpoint when `None`.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    fn build_query_url(&self, titles: &[String], mailto: &str) -> String {
        let search_terms = titles
            .iter()
            .map(|t| urlencoding::encode(&clean_search_term(t)).into_owned())
            .collect::<Vec<_>>()
            // The | is the filter OR operator and must stay unencoded.
            .join("|");

        format!(
            "{}?filter=title.search:{}&select=id,doi,title&per_page={}&mailto={}",
            self.base_url,
            search_terms,
            self.per_page,
            urlencoding::encode(mailto)
        )
    }
}

/// Strip characters that collide with the OpenAlex filter syntax (`:` starts
/// a filter clause, `|` is the OR operator, and the rest confuse the search
/// parser) and collapse the leftovers into single spaces.
fn clean_search_term(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_space = false;

    for c in title.chars() {
        let is_breaking = matches!(
            c,
            ':' | '(' | ')' | '[' | ']' | '&' | '|' | '\\' | ',' | ';' | '\'' | '"'
        ) || c.is_whitespace();

        if is_breaking {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }

    out
}

#[async_trait]
impl WorksCatalog for OpenAlexClient {
    async fn search_titles(
        &self,
        titles: &[String],
        mailto: &str,
    ) -> Result<Vec<CatalogWork>, CatalogError> {
        let url = self.build_query_url(titles, mailto);
        debug!(titles = titles.len(), "Querying works catalog");

        let timer = metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["openalex"])
            .start_timer();
        let result = self.client.get(&url).send().await;
        timer.observe_duration();

        let response = result.map_err(|e| {
            metrics::CATALOG_LOOKUPS.with_label_values(&["error"]).inc();
            CatalogError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Catalog API error");
            metrics::CATALOG_LOOKUPS.with_label_values(&["error"]).inc();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: OpenAlexResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        metrics::CATALOG_LOOKUPS
            .with_label_values(&["success"])
            .inc();

        debug!(
            results = body.results.len(),
            titles = titles.len(),
            "Catalog query complete"
        );

        Ok(body
            .results
            .into_iter()
            .map(|w| CatalogWork {
                id: w.id.unwrap_or_default(),
                doi: w.doi,
                title: w.title,
            })
            .collect())
    }
}

// OpenAlex API response types (private)

#[derive(Debug, Deserialize)]
struct OpenAlexResponse {
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_search_term() {
        assert_eq!(
            clean_search_term("Deep Learning: A Survey (2nd ed)"),
            "Deep Learning A Survey 2nd ed"
        );
        assert_eq!(clean_search_term("a|b&c"), "a b c");
        assert_eq!(clean_search_term("  padded  "), "padded");
    }

    #[test]
    fn test_build_query_url_joins_with_raw_pipe() {
        let client = OpenAlexClient::new(
            Some("https://openalex.test/works".into()),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = client.build_query_url(
            &["Deep Learning".to_string(), "Graph: Nets".to_string()],
            "oa@example.org",
        );

        assert!(url.starts_with("https://openalex.test/works?filter=title.search:"));
        // Terms are encoded individually; the OR separator stays raw.
        assert!(url.contains("Deep%20Learning|Graph%20Nets"), "url: {}", url);
        assert!(url.contains("select=id,doi,title"));
        assert!(url.contains("per_page=50"));
        assert!(url.contains("mailto=oa%40example.org"));
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let body = r#"{
            "results": [
                {"id": "https://openalex.org/W1", "doi": "https://doi.org/10.1/a", "title": "A"},
                {"id": "https://openalex.org/W2"},
                {}
            ]
        }"#;
        let parsed: OpenAlexResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 3);
        assert_eq!(parsed.results[1].doi, None);
        assert_eq!(parsed.results[2].id, None);
    }
}
