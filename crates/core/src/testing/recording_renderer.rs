//! Renderer that records every notification for test assertions.

use std::sync::Mutex;

use crate::pipeline::{ItemOutcome, PageItem, Renderer};
use crate::resolver::DoiRecord;
use crate::status::{OaRecord, OaStatus};

/// A recorded `item_resolved` notification.
#[derive(Debug, Clone)]
pub struct ResolvedNotification {
    pub item_id: String,
    pub doi: Option<String>,
    pub status: OaStatus,
}

/// Mock Renderer that records calls. Accessors are synchronous since the
/// trait itself is.
#[derive(Default)]
pub struct RecordingRenderer {
    started: Mutex<Vec<String>>,
    resolved: Mutex<Vec<ResolvedNotification>>,
    not_found: Mutex<Vec<String>>,
    finished: Mutex<Vec<usize>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item ids passed to `item_resolved`, in call order.
    pub fn resolved_ids(&self) -> Vec<String> {
        self.resolved
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.item_id.clone())
            .collect()
    }

    /// Full resolved notifications.
    pub fn resolved(&self) -> Vec<ResolvedNotification> {
        self.resolved.lock().unwrap().clone()
    }

    /// Item ids passed to `item_not_found`, in call order.
    pub fn not_found_ids(&self) -> Vec<String> {
        self.not_found.lock().unwrap().clone()
    }

    /// How many items were announced via `lookup_started`.
    pub fn started_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    /// How many batches reached `lookup_finished`.
    pub fn finished_batches(&self) -> usize {
        self.finished.lock().unwrap().len()
    }

    /// Outcome counts per finished batch.
    pub fn finished_sizes(&self) -> Vec<usize> {
        self.finished.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn lookup_started(&self, item: &PageItem) {
        self.started.lock().unwrap().push(item.id.clone());
    }

    fn item_resolved(&self, item_id: &str, doi_record: &DoiRecord, oa_record: &OaRecord) {
        self.resolved.lock().unwrap().push(ResolvedNotification {
            item_id: item_id.to_string(),
            doi: doi_record.doi.clone(),
            status: oa_record.status,
        });
    }

    fn item_not_found(&self, item_id: &str, _doi_record: &DoiRecord) {
        self.not_found.lock().unwrap().push(item_id.to_string());
    }

    fn lookup_finished(&self, outcomes: &[ItemOutcome]) {
        self.finished.lock().unwrap().push(outcomes.len());
    }
}
