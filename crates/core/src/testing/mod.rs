//! Testing utilities and mock implementations.
//!
//! Mocks for the external-service traits plus a recording renderer, so the
//! whole pipeline can be exercised without network or a real page.

mod mock_catalog;
mod mock_status;
mod recording_renderer;

pub use mock_catalog::MockCatalog;
pub use mock_status::MockStatusService;
pub use recording_renderer::{RecordingRenderer, ResolvedNotification};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogWork;
    use crate::status::{OaLocation, OaRecord, OaStatus};

    /// Create a catalog work with a bare DOI.
    pub fn catalog_work(id: &str, doi: &str, title: &str) -> CatalogWork {
        CatalogWork {
            id: id.to_string(),
            doi: Some(doi.to_string()),
            title: Some(title.to_string()),
        }
    }

    /// Create an open-access record with a best location.
    pub fn oa_record(status: OaStatus) -> OaRecord {
        let is_oa = status.is_open();
        OaRecord {
            status,
            is_oa,
            best_oa_location: is_oa.then(|| OaLocation {
                url: Some("https://repository.example.org/article.pdf".to_string()),
                url_for_pdf: Some("https://repository.example.org/article.pdf".to_string()),
                host_type: Some("repository".to_string()),
                license: Some("cc-by".to_string()),
                version: Some("publishedVersion".to_string()),
            }),
            journal_is_oa: status == OaStatus::Gold,
            error: None,
        }
    }
}
