//! # Search Import
//!
//! Entry point and configuration for importing entity collections into the
//! search backend.

pub mod config;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur while setting up or running an import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Collection registry could not be loaded.
    #[error("Registry error: {0}")]
    RegistryError(#[from] search_import_repository::RegistryError),

    /// Search backend error.
    #[error("Search error: {0}")]
    SearchError(#[from] search_import_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ImportError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<search_import_pipeline::ReindexError> for ImportError {
    fn from(e: search_import_pipeline::ReindexError) -> Self {
        Self::ConfigError(e.to_string())
    }
}
