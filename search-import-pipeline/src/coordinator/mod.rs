//! Coordinator module for the search import pipeline.
//!
//! Resolves collection names into destination indices and, for aggregates,
//! into the member collections that are paged individually.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ImportConfig;
use crate::errors::ReindexError;
use search_import_repository::CollectionRegistry;
use search_import_shared::{CollectionDescriptor, SimpleCollection};

/// Maps collection names onto what has to be indexed, and where.
pub struct IndexingCoordinator {
    registry: Arc<dyn CollectionRegistry>,
    config: ImportConfig,
}

impl IndexingCoordinator {
    pub fn new(registry: Arc<dyn CollectionRegistry>, config: ImportConfig) -> Self {
        Self { registry, config }
    }

    /// Look up `name` and resolve it into a descriptor with the final
    /// destination index name.
    ///
    /// Fails with `NotSearchable` if the collection is unknown or excluded.
    pub fn describe(&self, name: &str) -> Result<CollectionDescriptor, ReindexError> {
        if !self.registry.is_searchable(name) {
            return Err(ReindexError::not_searchable(name));
        }

        let index = self
            .registry
            .destination_index_name(name)
            .map_err(|e| {
                warn!(collection = %name, error = %e, "Registry lookup failed");
                ReindexError::not_searchable(name)
            })?;
        let index = self.config.index_name(&index);

        if !self.registry.is_aggregate(name) {
            return Ok(CollectionDescriptor::Simple {
                name: name.to_string(),
                index,
            });
        }

        let members = self.registry.members(name).map_err(|e| {
            warn!(collection = %name, error = %e, "Registry lookup failed");
            ReindexError::not_searchable(name)
        })?;

        debug!(collection = %name, members = ?members, "Resolved aggregate");

        Ok(CollectionDescriptor::Aggregate {
            name: name.to_string(),
            index,
            members,
        })
    }

    /// The simple collections to page for `name`, in declaration order.
    ///
    /// A simple collection resolves to itself; an aggregate to its members,
    /// all writing into the aggregate's index.
    pub fn resolve_targets(&self, name: &str) -> Result<Vec<SimpleCollection>, ReindexError> {
        Ok(self.describe(name)?.targets())
    }

    /// Searchable collections writing into any of `index_names`.
    ///
    /// Index names may be given with or without the configured prefix. An
    /// empty list selects every searchable collection. Results follow
    /// declaration order.
    pub fn select_collections(&self, index_names: &[String]) -> Vec<String> {
        let searchables = self.registry.searchables();
        if index_names.is_empty() {
            return searchables;
        }

        let mut matched = vec![false; index_names.len()];
        let mut selected = Vec::new();

        for name in searchables {
            let Ok(index) = self.registry.destination_index_name(&name) else {
                continue;
            };
            let prefixed = self.config.index_name(&index);

            let mut hit = false;
            for (position, wanted) in index_names.iter().enumerate() {
                if *wanted == index || *wanted == prefixed {
                    matched[position] = true;
                    hit = true;
                }
            }
            if hit {
                selected.push(name);
            }
        }

        for (wanted, found) in index_names.iter().zip(matched) {
            if !found {
                warn!(index = %wanted, "No searchable collection writes to this index");
            }
        }

        selected
    }
}
