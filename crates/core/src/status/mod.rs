//! OA status lookup.
//!
//! `OaStatusService` abstracts the per-DOI status lookup so the pipeline can
//! run against a mock; `UnpaywallClient` is the production implementation.

mod types;
mod unpaywall;

pub use types::{OaLocation, OaRecord, OaStatus, StatusError};
pub use unpaywall::UnpaywallClient;

use async_trait::async_trait;

/// Trait for OA status lookup backends.
#[async_trait]
pub trait OaStatusService: Send + Sync {
    /// Look up the OA status for one DOI.
    ///
    /// A "DOI not found" response from the service is an expected condition
    /// and yields an `Unknown` record, never an error. Errors are reserved
    /// for transport failures and unexpected non-2xx responses.
    async fn fetch(&self, doi: &str, email: &str) -> Result<OaRecord, StatusError>;
}
