//! Reindex job state.
//!
//! One job exists per atomic import of a collection. It owns the temporary
//! index, the write tasks submitted against it, and the per-page counts.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::aggregator::ResponseAggregator;
use search_import_repository::WriteTask;
use search_import_shared::IndexCounts;

/// Where an atomic reindex job stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Nothing done yet.
    Idle,
    /// The temporary index exists with the source index's configuration.
    TempIndexProvisioned,
    /// Pages are being written into the temporary index.
    Writing,
    /// Waiting for every submitted write to complete.
    Barrier,
    /// The temporary index replaced the source index.
    Swapped,
    /// Nothing was written, so there was nothing to swap in. The source index
    /// is untouched and the empty temporary index is left behind.
    Skipped,
    /// The job failed; the source index is untouched.
    Aborted,
}

impl JobState {
    /// Whether the job can move from `self` to `next`.
    pub fn can_advance_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Idle, TempIndexProvisioned)
                | (TempIndexProvisioned, Writing)
                | (Writing, Barrier)
                | (Barrier, Swapped)
                | (Writing, Skipped)
        ) || (next == Aborted && !self.is_terminal())
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Swapped | JobState::Skipped | JobState::Aborted
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::TempIndexProvisioned => "temp_index_provisioned",
            JobState::Writing => "writing",
            JobState::Barrier => "barrier",
            JobState::Swapped => "swapped",
            JobState::Skipped => "skipped",
            JobState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// An atomic reindex of one (possibly aggregate) collection.
#[derive(Debug)]
pub struct ReindexJob {
    id: Uuid,
    collection: String,
    source_index: String,
    temporary_index: String,
    state: JobState,
    tasks: Vec<WriteTask>,
    page_counts: Vec<IndexCounts>,
    started_at: DateTime<Utc>,
}

impl ReindexJob {
    pub fn new(
        collection: impl Into<String>,
        source_index: impl Into<String>,
        temporary_index: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            collection: collection.into(),
            source_index: source_index.into(),
            temporary_index: temporary_index.into(),
            state: JobState::Idle,
            tasks: Vec::new(),
            page_counts: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn source_index(&self) -> &str {
        &self.source_index
    }

    pub fn temporary_index(&self) -> &str {
        &self.temporary_index
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Number of write tasks still owned by the job.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Move to `next`.
    pub(crate) fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid job transition {} -> {}",
            self.state,
            next
        );
        debug!(job_id = %self.id, from = %self.state, to = %next, "Job state change");
        self.state = next;
    }

    /// Take ownership of a submitted write.
    ///
    /// Records written into the temporary index are counted against the
    /// source index they will end up in.
    pub(crate) fn record(&mut self, task: WriteTask) {
        self.page_counts
            .push(task.counts().renamed(&self.temporary_index, &self.source_index));
        self.tasks.push(task);
    }

    /// Hand the outstanding tasks to the barrier.
    pub(crate) fn take_tasks(&mut self) -> Vec<WriteTask> {
        std::mem::take(&mut self.tasks)
    }

    /// Records acknowledged so far, per destination index.
    pub fn counts(&self) -> IndexCounts {
        ResponseAggregator::reduce(&self.page_counts)
    }

    /// End the job in failure, dropping any tasks that were never awaited.
    ///
    /// The temporary index is left in place.
    pub(crate) fn abort(&mut self) {
        if !self.tasks.is_empty() {
            warn!(
                job_id = %self.id,
                pending = self.tasks.len(),
                "Abandoning write tasks of aborted job"
            );
        }
        self.tasks.clear();
        self.advance(JobState::Aborted);
    }
}
