//! Orchestrator module for the search import pipeline.
//!
//! Runs the import for a set of collections, one collection at a time.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::config::ImportConfig;
use crate::coordinator::IndexingCoordinator;
use crate::errors::ReindexError;
use crate::reindexer::AtomicReindexer;
use search_import_repository::{CollectionRegistry, DataSource, SearchBackend};
use search_import_shared::IndexCounts;

pub use crate::reindexer::{ImportOutcome, ImportState};

/// Per-collection results of one import run, in processing order.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    /// Collections that were swapped in or written directly.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.state.is_success()).count()
    }

    /// Collections that ended `Aborted`.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.state.is_aborted()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.state, ImportState::Skipped(_)))
            .count()
    }

    /// Records written across every collection and index.
    pub fn total_records(&self) -> usize {
        self.outcomes.iter().map(|o| o.counts.total()).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn outcome(&self, collection: &str) -> Option<&ImportOutcome> {
        self.outcomes.iter().find(|o| o.collection == collection)
    }
}

/// Entry point of the pipeline.
///
/// Collections are processed sequentially. A failed collection is recorded in
/// the report and does not stop the rest of the run.
pub struct ImportOrchestrator {
    coordinator: IndexingCoordinator,
    reindexer: AtomicReindexer,
}

impl ImportOrchestrator {
    /// Create a new orchestrator, validating `config`.
    pub fn new(
        registry: Arc<dyn CollectionRegistry>,
        source: Arc<dyn DataSource>,
        backend: Arc<dyn SearchBackend>,
        config: ImportConfig,
    ) -> Result<Self, ReindexError> {
        config.validate()?;

        Ok(Self {
            coordinator: IndexingCoordinator::new(registry, config.clone()),
            reindexer: AtomicReindexer::new(source, backend, config),
        })
    }

    pub fn coordinator(&self) -> &IndexingCoordinator {
        &self.coordinator
    }

    /// Searchable collections writing into any of `index_names`; every
    /// searchable collection if the list is empty.
    pub fn select_collections(&self, index_names: &[String]) -> Vec<String> {
        self.coordinator.select_collections(index_names)
    }

    /// Import every collection in `collections`.
    ///
    /// Duplicate names are imported once. Unknown or excluded collections end
    /// up `Skipped`.
    #[instrument(skip(self, collections), fields(collections = collections.len()))]
    pub async fn run_import(&self, collections: &[String], atomic: bool) -> ImportReport {
        let mut seen = HashSet::new();
        let mut report = ImportReport::default();

        for name in collections {
            if !seen.insert(name.as_str()) {
                continue;
            }

            let outcome = match self.coordinator.describe(name) {
                Ok(descriptor) => self.reindexer.reindex(&descriptor, atomic).await,
                Err(e) if e.is_skip() => {
                    warn!(collection = %name, "{} is not indexable. Skipping...", name);
                    ImportOutcome::skipped(name.as_str(), e.to_string())
                }
                Err(e) => {
                    error!(collection = %name, error = %e, "Failed to resolve collection");
                    ImportOutcome::new(
                        name.as_str(),
                        IndexCounts::new(),
                        ImportState::Aborted(e),
                        Utc::now(),
                    )
                }
            };

            Self::log_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            records = report.total_records(),
            "Done!"
        );

        report
    }

    fn log_outcome(outcome: &ImportOutcome) {
        let elapsed_ms = outcome.elapsed().num_milliseconds();
        match &outcome.state {
            ImportState::Swapped | ImportState::WrittenDirect => info!(
                collection = %outcome.collection,
                records = outcome.counts.total(),
                elapsed_ms,
                state = ?outcome.state,
                "Imported {}",
                outcome.collection
            ),
            ImportState::Skipped(reason) => info!(
                collection = %outcome.collection,
                reason = %reason,
                "Skipped {}",
                outcome.collection
            ),
            ImportState::Aborted(e) => error!(
                collection = %outcome.collection,
                records = outcome.counts.total(),
                elapsed_ms,
                error = %e,
                "Import of {} aborted",
                outcome.collection
            ),
        }
    }
}
