//! Types for the lookup pipeline.

use serde::{Deserialize, Serialize};

use crate::resolver::DoiRecord;
use crate::status::OaRecord;

/// One item on a results page: a title plus, when the page exposed one, a
/// DOI extracted from its links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_doi: Option<String>,
}

impl PageItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            extracted_doi: None,
        }
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.extracted_doi = Some(doi.into());
        self
    }
}

/// Lifecycle of an item within one batch. Every item reaches `Done` or
/// `Failed` before the batch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Pending,
    Resolving,
    Fetching,
    Done,
    Failed,
}

/// Terminal result for one item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub item_id: String,
    pub doi_record: DoiRecord,
    /// Present iff a DOI was found for the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oa_record: Option<OaRecord>,
    pub state: ItemState,
}

impl ItemOutcome {
    /// An outcome is a failure when either phase recorded an error.
    pub fn is_failure(&self) -> bool {
        self.doi_record.error.is_some()
            || self
                .oa_record
                .as_ref()
                .is_some_and(|r| r.status == crate::status::OaStatus::Error)
    }
}
