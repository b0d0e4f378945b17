//! Per-collection import results.

use chrono::{DateTime, Utc};

use crate::errors::ReindexError;
use search_import_shared::IndexCounts;

/// How the import of one collection ended.
#[derive(Debug)]
pub enum ImportState {
    /// Written into a temporary index that then replaced the source index.
    Swapped,
    /// Written straight into the source index.
    WrittenDirect,
    /// Not imported, for the given reason.
    Skipped(String),
    /// Failed; in atomic mode the source index is untouched.
    Aborted(ReindexError),
}

impl ImportState {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportState::Swapped | ImportState::WrittenDirect)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ImportState::Aborted(_))
    }
}

/// Result of importing one requested collection.
#[derive(Debug)]
pub struct ImportOutcome {
    /// Collection name as requested.
    pub collection: String,
    /// Records written, per destination index.
    pub counts: IndexCounts,
    /// Final state.
    pub state: ImportState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportOutcome {
    pub(crate) fn new(
        collection: impl Into<String>,
        counts: IndexCounts,
        state: ImportState,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            collection: collection.into(),
            counts,
            state,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Outcome of a collection that was never started.
    pub(crate) fn skipped(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            collection,
            IndexCounts::new(),
            ImportState::Skipped(reason.into()),
            Utc::now(),
        )
    }

    /// Time spent on the collection.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
