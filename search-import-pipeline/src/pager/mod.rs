//! Pager module for the search import pipeline.
//!
//! Reads a collection from the data source in fixed-size pages.

use std::sync::Arc;

use tracing::{debug, instrument};

use search_import_repository::{DataSource, DataSourceError};
use search_import_shared::SearchDocument;

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Zero-based page index.
    pub index: usize,
    /// Entities of the page, in source order. Never more than the batch size.
    pub documents: Vec<SearchDocument>,
    /// True on the first page holding fewer entities than the batch size.
    pub is_last: bool,
}

impl Page {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Releases the data source's per-page resources when dropped.
///
/// Hold one for the lifetime of each page iteration: the release then happens
/// before the next page starts, whether the page was written or not.
#[must_use = "the page resources are released as soon as the scope is dropped"]
pub struct PageScope<'a> {
    source: &'a dyn DataSource,
}

impl Drop for PageScope<'_> {
    fn drop(&mut self) {
        self.source.release_page_resources();
    }
}

/// Pages through a collection `batch_size` entities at a time.
pub struct Pager {
    source: Arc<dyn DataSource>,
    batch_size: usize,
}

impl Pager {
    /// Create a pager. `batch_size` must be greater than zero.
    pub fn new(source: Arc<dyn DataSource>, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0, "batch size must be greater than zero");
        Self { source, batch_size }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Open the resource scope for one page iteration.
    pub fn scope(&self) -> PageScope<'_> {
        PageScope {
            source: self.source.as_ref(),
        }
    }

    /// Read page `page_index` of `collection`.
    ///
    /// Data source errors are returned as-is; nothing is retried.
    #[instrument(skip(self), fields(batch_size = self.batch_size))]
    pub async fn next_page(
        &self,
        collection: &str,
        page_index: usize,
    ) -> Result<Page, DataSourceError> {
        let offset = page_index * self.batch_size;
        let mut documents = self
            .source
            .page(collection, offset, self.batch_size)
            .await?;

        // A source returning more than asked must not break the page bound.
        documents.truncate(self.batch_size);
        let is_last = documents.len() < self.batch_size;

        debug!(
            collection = %collection,
            page = page_index,
            count = documents.len(),
            is_last = is_last,
            "Fetched page"
        );

        Ok(Page {
            index: page_index,
            documents,
            is_last,
        })
    }
}
