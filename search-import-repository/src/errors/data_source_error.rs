//! Data source error types.

use thiserror::Error;

/// Errors that can occur while reading pages from a data source.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// The data source has no collection with this name.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Reading from the underlying storage failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be decoded.
    #[error("Parse error in {collection} at record {position}: {message}")]
    Parse {
        collection: String,
        position: usize,
        message: String,
    },
}

impl DataSourceError {
    /// Create an unknown collection error.
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection(name.into())
    }

    /// Create a parse error for the record at `position`.
    pub fn parse(
        collection: impl Into<String>,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            collection: collection.into(),
            position,
            message: message.into(),
        }
    }
}
