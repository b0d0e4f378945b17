//! Error types for the search import pipeline.

use search_import_repository::{DataSourceError, SearchError};
use thiserror::Error;

/// Errors that end the import of one collection.
///
/// None of these stop the rest of an import run: the orchestrator records the
/// error against the collection and moves on to the next one.
#[derive(Error, Debug)]
pub enum ReindexError {
    /// The collection is unknown or excluded from indexing. Skipped, not aborted.
    #[error("{0} is not indexable")]
    NotSearchable(String),

    /// A page could not be read from the data source.
    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    /// A page write was rejected or a write task resolved with a failure.
    #[error("Backend write error: {0}")]
    BackendWrite(#[source] SearchError),

    /// The temporary index could not be provisioned. Nothing was written.
    #[error("Provisioning error: {0}")]
    Provisioning(#[source] SearchError),

    /// Moving the temporary index onto the source index failed.
    /// The source index is untouched and the data remains in the temporary index.
    #[error("Swap error: {0}")]
    Swap(#[source] SearchError),

    /// The import configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReindexError {
    /// Create a not searchable error.
    pub fn not_searchable(collection: impl Into<String>) -> Self {
        Self::NotSearchable(collection.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the collection should be skipped rather than reported as failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::NotSearchable(_))
    }
}
