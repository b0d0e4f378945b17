//! Error types for the search import repository.

mod data_source_error;
mod registry_error;
mod search_error;

pub use data_source_error::DataSourceError;
pub use registry_error::RegistryError;
pub use search_error::SearchError;
