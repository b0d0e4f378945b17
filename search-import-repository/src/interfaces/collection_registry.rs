//! Collection registry trait definition.

use crate::errors::RegistryError;

/// Knows which collections exist, whether they are searchable, and where they
/// are indexed.
pub trait CollectionRegistry: Send + Sync {
    /// Whether `name` is declared and not excluded from indexing.
    fn is_searchable(&self, name: &str) -> bool;

    /// Destination index name of `name`, without any prefix applied.
    fn destination_index_name(&self, name: &str) -> Result<String, RegistryError>;

    /// Whether `name` is an aggregate collection.
    fn is_aggregate(&self, name: &str) -> bool;

    /// Ordered member collections of the aggregate `name`.
    fn members(&self, name: &str) -> Result<Vec<String>, RegistryError>;

    /// Every searchable collection, in declaration order.
    fn searchables(&self) -> Vec<String>;
}
