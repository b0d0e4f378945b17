//! Reindexer module for the search import pipeline.
//!
//! Writes every page of a collection into the search backend, either directly
//! into the source index or through a temporary index that replaces the source
//! index once every write has completed.

mod job;
mod outcome;

pub use job::{JobState, ReindexJob};
pub use outcome::{ImportOutcome, ImportState};

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info, instrument, warn};

use crate::aggregator::ResponseAggregator;
use crate::config::ImportConfig;
use crate::errors::ReindexError;
use crate::pager::Pager;
use search_import_repository::{DataSource, SearchBackend, WriteTask};
use search_import_shared::{CollectionDescriptor, IndexCounts, SimpleCollection};

/// Reason recorded when an atomic job wrote nothing and therefore did not swap.
pub const NO_RECORDS: &str = "no records";

/// Drives the paged writes of one collection at a time.
///
/// In atomic mode the job goes through
/// `Idle -> TempIndexProvisioned -> Writing -> Barrier -> Swapped`. It ends in
/// `Skipped` right after writing when nothing was written, and in `Aborted` on
/// the first failure. The source index only changes at the swap,
/// and the swap is only issued after every write task has resolved
/// successfully. On failure the temporary index is left behind for inspection.
pub struct AtomicReindexer {
    backend: Arc<dyn SearchBackend>,
    pager: Pager,
    config: ImportConfig,
}

impl AtomicReindexer {
    pub fn new(
        source: Arc<dyn DataSource>,
        backend: Arc<dyn SearchBackend>,
        config: ImportConfig,
    ) -> Self {
        Self {
            backend,
            pager: Pager::new(source, config.batch_size),
            config,
        }
    }

    /// Import `descriptor`, atomically or directly.
    ///
    /// Never fails: errors end up in the outcome's state.
    pub async fn reindex(&self, descriptor: &CollectionDescriptor, atomic: bool) -> ImportOutcome {
        if atomic {
            self.reindex_atomic(descriptor).await
        } else {
            self.reindex_direct(descriptor).await
        }
    }

    /// Write every page straight into the source index.
    ///
    /// Writes become visible as they complete; nothing is awaited.
    #[instrument(
        skip(self, descriptor),
        fields(collection = %descriptor.name(), index = %descriptor.index())
    )]
    pub async fn reindex_direct(&self, descriptor: &CollectionDescriptor) -> ImportOutcome {
        let started_at = Utc::now();
        let mut page_counts = Vec::new();

        let result = self
            .write_targets(&descriptor.targets(), descriptor.index(), |task| {
                page_counts.push(task.counts().clone());
            })
            .await;

        let counts = ResponseAggregator::reduce(&page_counts);
        let state = match result {
            Ok(()) => ImportState::WrittenDirect,
            Err(e) => {
                error!(error = %e, "Direct import failed");
                ImportState::Aborted(e)
            }
        };

        ImportOutcome::new(descriptor.name(), counts, state, started_at)
    }

    /// Write every page into a temporary index and swap it in.
    #[instrument(
        skip(self, descriptor),
        fields(collection = %descriptor.name(), index = %descriptor.index())
    )]
    pub async fn reindex_atomic(&self, descriptor: &CollectionDescriptor) -> ImportOutcome {
        let source_index = descriptor.index();
        let temporary_index = self.config.temporary_index_name(source_index);
        let mut job = ReindexJob::new(descriptor.name(), source_index, temporary_index);

        debug!(job_id = %job.id(), source_index = %source_index, "Starting atomic reindex");

        let state = match self.run_job(&mut job, descriptor).await {
            Ok(state) => state,
            Err(e) => {
                error!(
                    job_id = %job.id(),
                    state = %job.state(),
                    temporary_index = %job.temporary_index(),
                    error = %e,
                    "Atomic reindex aborted, temporary index left for inspection"
                );
                job.abort();
                ImportState::Aborted(e)
            }
        };

        ImportOutcome::new(descriptor.name(), job.counts(), state, job.started_at())
    }

    async fn run_job(
        &self,
        job: &mut ReindexJob,
        descriptor: &CollectionDescriptor,
    ) -> Result<ImportState, ReindexError> {
        info!(temporary_index = %job.temporary_index(), "Creating temporary index");
        self.backend
            .copy_index_config(
                job.source_index(),
                job.temporary_index(),
                self.config.copy_scope,
            )
            .await
            .map_err(ReindexError::Provisioning)?;
        job.advance(JobState::TempIndexProvisioned);

        job.advance(JobState::Writing);
        let temporary_index = job.temporary_index().to_string();
        self.write_targets(&descriptor.targets(), &temporary_index, |task| job.record(task))
            .await?;

        if job.counts().is_empty() {
            // Nothing to swap in; the source index keeps serving its records.
            warn!(
                temporary_index = %job.temporary_index(),
                "No records written, skipping swap"
            );
            job.advance(JobState::Skipped);
            return Ok(ImportState::Skipped(NO_RECORDS.to_string()));
        }

        job.advance(JobState::Barrier);
        info!(tasks = job.pending_tasks(), "Waiting for indexing tasks to finalize");
        Self::barrier(job.take_tasks()).await?;

        info!(
            from = %job.temporary_index(),
            to = %job.source_index(),
            "Moving {} -> {}",
            job.temporary_index(),
            job.source_index()
        );
        self.backend
            .move_index(job.temporary_index(), job.source_index())
            .await
            .map_err(ReindexError::Swap)?;
        job.advance(JobState::Swapped);

        Ok(ImportState::Swapped)
    }

    /// Wait for every task, then fail if any of them failed.
    ///
    /// All tasks are awaited even after one has failed, so nothing is still in
    /// flight when this returns.
    async fn barrier(tasks: Vec<WriteTask>) -> Result<(), ReindexError> {
        let submitted = tasks.len();
        let results = join_all(tasks.into_iter().map(WriteTask::wait)).await;
        let mut failures = results.into_iter().filter_map(Result::err);

        match failures.next() {
            None => {
                debug!(tasks = submitted, "All write tasks completed");
                Ok(())
            }
            Some(first) => {
                let failed = 1 + failures.count();
                warn!(failed, tasks = submitted, "Write tasks failed");
                Err(ReindexError::BackendWrite(first))
            }
        }
    }

    /// Page through every target and write each page into `index`.
    ///
    /// Each accepted write is handed to `on_task`. Stops at the first error.
    async fn write_targets<F>(
        &self,
        targets: &[SimpleCollection],
        index: &str,
        mut on_task: F,
    ) -> Result<(), ReindexError>
    where
        F: FnMut(WriteTask),
    {
        for target in targets {
            debug!(collection = %target.name, "Indexing {} entities", target.name);

            let mut page_index = 0;
            loop {
                let _scope = self.pager.scope();
                let page = self.pager.next_page(&target.name, page_index).await?;
                debug!(count = page.len(), "Entity count to export: {}", page.len());

                let counts = if page.is_empty() {
                    IndexCounts::new()
                } else {
                    let task = self
                        .backend
                        .write(index, &page.documents)
                        .await
                        .map_err(ReindexError::BackendWrite)?;
                    let counts = task.counts().clone();
                    on_task(task);
                    counts
                };

                if counts.is_empty() {
                    warn!(collection = %target.name, "No records to index for {}", target.name);
                }
                for (written_index, count) in counts.iter() {
                    info!(
                        collection = %target.name,
                        index = %written_index,
                        page = page_index,
                        count = count,
                        "Indexed {} / {} {} entities into {} index",
                        count,
                        page.len(),
                        target.name,
                        written_index
                    );
                }

                if page.is_last {
                    break;
                }
                page_index += 1;
            }
        }

        Ok(())
    }
}
