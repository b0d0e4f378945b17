//! Interface definitions for the import collaborators.
//!
//! The pipeline only talks to these traits, so the data source, the search
//! backend and the collection registry can be swapped freely (and mocked in
//! tests).

mod collection_registry;
mod data_source;
mod search_backend;

pub use collection_registry::CollectionRegistry;
pub use data_source::DataSource;
pub use search_backend::SearchBackend;
