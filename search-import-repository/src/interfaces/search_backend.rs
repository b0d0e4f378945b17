//! Search backend trait definition.
//!
//! This module defines the abstract interface the import pipeline needs from a
//! search engine: paged writes, index configuration copies, and atomic moves.

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::types::{ConfigScope, WriteTask};
use search_import_shared::SearchDocument;

/// Abstract interface for search backend operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, SearchError>`. Implementations never retry.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Submit one write of `documents` into `index`.
    ///
    /// Returns once the backend has accepted the write. The returned task
    /// carries the acknowledged record counts and resolves when the write is
    /// complete.
    ///
    /// # Returns
    ///
    /// * `Ok(WriteTask)` - Handle for the accepted write
    /// * `Err(SearchError)` - If the write was rejected
    async fn write(&self, index: &str, documents: &[SearchDocument])
        -> Result<WriteTask, SearchError>;

    /// Create `to` with the configuration of `from` restricted to `scope`.
    ///
    /// Records are never copied.
    async fn copy_index_config(
        &self,
        from: &str,
        to: &str,
        scope: ConfigScope,
    ) -> Result<(), SearchError>;

    /// Atomically replace the contents of `to` with those of `from`.
    ///
    /// After a successful move `from` no longer exists and readers of `to`
    /// see the new contents without any gap.
    async fn move_index(&self, from: &str, to: &str) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
