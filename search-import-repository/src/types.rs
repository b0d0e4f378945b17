//! Types exchanged with the search backend.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::errors::SearchError;
use search_import_shared::IndexCounts;

/// Which parts of an index configuration to copy onto a temporary index.
///
/// Records are never copied; only configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigScope {
    /// Index settings and field mappings.
    pub settings: bool,
    /// Synonym definitions.
    pub synonyms: bool,
    /// Query rules.
    pub rules: bool,
}

impl ConfigScope {
    /// Settings, synonyms and rules.
    pub fn all() -> Self {
        Self {
            settings: true,
            synonyms: true,
            rules: true,
        }
    }

    /// Settings only.
    pub fn settings_only() -> Self {
        Self {
            settings: true,
            synonyms: false,
            rules: false,
        }
    }
}

impl Default for ConfigScope {
    fn default() -> Self {
        Self::all()
    }
}

/// Handle for one submitted write.
///
/// Submission returns as soon as the backend has accepted the write; the
/// records may not be searchable yet. [`WriteTask::wait`] resolves once the
/// backend reports the write as complete, or with the error that ended it.
pub struct WriteTask {
    index: String,
    counts: IndexCounts,
    completion: BoxFuture<'static, Result<(), SearchError>>,
}

impl WriteTask {
    /// Create a task that completes when `completion` resolves.
    pub fn new<F>(index: impl Into<String>, counts: IndexCounts, completion: F) -> Self
    where
        F: Future<Output = Result<(), SearchError>> + Send + 'static,
    {
        Self {
            index: index.into(),
            counts,
            completion: completion.boxed(),
        }
    }

    /// Create a task that is already complete.
    pub fn completed(index: impl Into<String>, counts: IndexCounts) -> Self {
        Self::new(index, counts, futures::future::ready(Ok(())))
    }

    /// The index the write was submitted against.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Records acknowledged by the backend, per destination index.
    pub fn counts(&self) -> &IndexCounts {
        &self.counts
    }

    /// Wait for the backend to finish the write.
    pub async fn wait(self) -> Result<(), SearchError> {
        self.completion.await
    }
}

impl fmt::Debug for WriteTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteTask")
            .field("index", &self.index)
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}
