//! Works catalog - external bibliographic search used to recover DOIs for
//! titles the page itself did not expose one for.

mod openalex;
mod types;

pub use openalex::OpenAlexClient;
pub use types::{CatalogError, CatalogWork};

use async_trait::async_trait;

/// Trait for works-catalog backends.
#[async_trait]
pub trait WorksCatalog: Send + Sync {
    /// Search the catalog for works matching any of the given titles.
    ///
    /// One call covers the whole batch; returned works are in catalog
    /// relevance order, which the resolver relies on for tie-breaking.
    async fn search_titles(
        &self,
        titles: &[String],
        mailto: &str,
    ) -> Result<Vec<CatalogWork>, CatalogError>;
}
