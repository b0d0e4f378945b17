//! # Search Import Shared
//!
//! Shared types used across the search import crates: the documents that flow
//! from a data source into the search backend, the collection descriptors the
//! registry hands out, and the per-index record counts reported by writes.

mod collection;
mod counts;
mod document;

pub use collection::{CollectionDescriptor, SimpleCollection};
pub use counts::IndexCounts;
pub use document::SearchDocument;
