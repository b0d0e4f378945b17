//! # Search Import Pipeline
//!
//! This crate streams paginated entity collections from a data source into a
//! search backend, optionally swapping the result in atomically.
//!
//! ## Architecture
//!
//! 1. **Pager**: Reads fixed-size pages of a collection until it is exhausted
//! 2. **Aggregator**: Reduces per-page write acknowledgements into per-index counts
//! 3. **Coordinator**: Resolves collection names into destination indices and members
//! 4. **Reindexer**: Writes pages directly, or through a temporary index that is
//!    swapped in once every write has completed
//! 5. **Orchestrator**: Runs the import for a set of collections, one at a time

pub mod aggregator;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod orchestrator;
pub mod pager;
pub mod reindexer;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::ResponseAggregator;
pub use config::ImportConfig;
pub use coordinator::IndexingCoordinator;
pub use errors::ReindexError;
pub use orchestrator::{ImportOrchestrator, ImportReport};
pub use pager::{Page, PageScope, Pager};
pub use reindexer::{AtomicReindexer, ImportOutcome, ImportState, JobState, ReindexJob};
