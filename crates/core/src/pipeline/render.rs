//! Renderer collaborator.
//!
//! The pipeline pushes per-item progress to a renderer instead of returning
//! only a final vector, so a caller can surface results as they land. The
//! default is a no-op.

use crate::resolver::DoiRecord;
use crate::status::OaRecord;

use super::types::{ItemOutcome, PageItem};

/// Receives per-item progress during a batch. Implementations must be cheap;
/// calls happen inline on the pipeline task.
///
/// An item whose status is filtered out by the visibility settings gets no
/// per-item notification; it is still present in the outcomes passed to
/// `lookup_finished`.
pub trait Renderer: Send + Sync {
    /// A batch item is about to be processed.
    fn lookup_started(&self, item: &PageItem) {
        let _ = item;
    }

    /// An item resolved to a DOI with a visible status.
    fn item_resolved(&self, item_id: &str, doi_record: &DoiRecord, oa_record: &OaRecord) {
        let _ = (item_id, doi_record, oa_record);
    }

    /// No DOI was found for an item (legitimate negative or failure).
    fn item_not_found(&self, item_id: &str, doi_record: &DoiRecord) {
        let _ = (item_id, doi_record);
    }

    /// The batch finished; outcomes are terminal.
    fn lookup_finished(&self, outcomes: &[ItemOutcome]) {
        let _ = outcomes;
    }
}

/// Renderer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {}
