//! Unpaywall API client.
//!
//! One GET per DOI. The DOI is embedded raw in the path - Unpaywall routes on
//! the internal slashes, so it must never be percent-encoded. A 404 means
//! "DOI not known to Unpaywall" and is an expected condition.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::metrics;

use super::types::{OaLocation, OaRecord, OaStatus, StatusError};
use super::OaStatusService;

const DEFAULT_BASE_URL: &str = "https://api.unpaywall.org/v2";

/// Unpaywall API client.
pub struct UnpaywallClient {
    client: Client,
    base_url: String,
}

impl UnpaywallClient {
    /// Create a new client. `base_url` defaults to the public Unpaywall v2
    /// endpoint when `None`.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, StatusError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatusError::Transport(e.to_string()))?;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { client, base_url })
    }

    fn build_url(&self, doi: &str, email: &str) -> String {
        // DOI stays raw; only the email query parameter is encoded.
        format!(
            "{}/{}?email={}",
            self.base_url,
            doi,
            urlencoding::encode(email)
        )
    }
}

#[async_trait]
impl OaStatusService for UnpaywallClient {
    async fn fetch(&self, doi: &str, email: &str) -> Result<OaRecord, StatusError> {
        let url = self.build_url(doi, email);
        debug!(doi = doi, "Fetching OA status");

        let timer = metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["unpaywall"])
            .start_timer();

        let result = self.client.get(&url).send().await;
        timer.observe_duration();

        let response = result.map_err(|e| {
            metrics::STATUS_FETCHES.with_label_values(&["error"]).inc();
            StatusError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            debug!(doi = doi, "DOI not known to status service");
            metrics::STATUS_FETCHES
                .with_label_values(&["not_found"])
                .inc();
            return Ok(OaRecord::unknown("DOI not found"));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(doi = doi, status = status.as_u16(), "Status service error");
            metrics::STATUS_FETCHES.with_label_values(&["error"]).inc();
            return Err(StatusError::Api {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: UnpaywallResponse = response
            .json()
            .await
            .map_err(|e| StatusError::Parse(e.to_string()))?;

        metrics::STATUS_FETCHES
            .with_label_values(&["success"])
            .inc();
        Ok(body.into())
    }
}

// Unpaywall API response types (private)

#[derive(Debug, Deserialize)]
struct UnpaywallResponse {
    #[serde(default)]
    oa_status: Option<String>,
    #[serde(default)]
    is_oa: Option<bool>,
    #[serde(default)]
    best_oa_location: Option<UnpaywallLocation>,
    #[serde(default)]
    journal_is_oa: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UnpaywallLocation {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_for_pdf: Option<String>,
    #[serde(default)]
    host_type: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl From<UnpaywallResponse> for OaRecord {
    fn from(r: UnpaywallResponse) -> Self {
        OaRecord {
            status: r
                .oa_status
                .as_deref()
                .map(OaStatus::parse_or_closed)
                .unwrap_or(OaStatus::Closed),
            is_oa: r.is_oa.unwrap_or(false),
            best_oa_location: r.best_oa_location.map(|l| OaLocation {
                url: l.url,
                url_for_pdf: l.url_for_pdf,
                host_type: l.host_type,
                license: l.license,
                version: l.version,
            }),
            journal_is_oa: r.journal_is_oa.unwrap_or(false),
            error: None,
        }
    }
}
