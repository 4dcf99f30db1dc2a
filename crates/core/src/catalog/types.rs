//! Types for the works catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One work returned by the catalog. Title and DOI are both optional in the
/// upstream data; the resolver only considers works that carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogWork {
    /// Catalog-internal identifier (e.g. an OpenAlex work URL).
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Errors from the works catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Non-2xx response.
    #[error("Catalog API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}
