//! Data source trait definition.

use async_trait::async_trait;

use crate::errors::DataSourceError;
use search_import_shared::SearchDocument;

/// Source of the entities to import, read page by page.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Read up to `limit` entities of `collection`, skipping the first `offset`.
    ///
    /// Successive calls with increasing offsets must partition the collection
    /// (no duplicates, no gaps) as long as it is not modified concurrently.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SearchDocument>)` - The entities of the page, possibly empty
    /// * `Err(DataSourceError)` - If the page could not be read
    async fn page(
        &self,
        collection: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, DataSourceError>;

    /// Release whatever the source holds on behalf of the page just read.
    ///
    /// Called once after every page, whether or not the page was written
    /// successfully.
    fn release_page_resources(&self) {}
}
