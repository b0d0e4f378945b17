//! Search backend error types.
//!
//! This module defines the errors a search backend can surface while writing
//! pages, provisioning temporary indices, or moving an index into place.

use thiserror::Error;

/// Errors that can occur during search backend operations.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A write request could not be submitted.
    #[error("Write error: {0}")]
    WriteError(String),

    /// A bulk write was accepted but some items were rejected.
    #[error("Bulk write error: {0}")]
    BulkWriteError(String),

    /// A write task resolved with a failure.
    #[error("Task error: {0}")]
    TaskError(String),

    /// Reading or copying index configuration failed.
    #[error("Index configuration error: {0}")]
    IndexConfigError(String),

    /// Moving an index onto another name failed.
    #[error("Move error: {0}")]
    MoveError(String),

    /// Failed to parse response from search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }

    /// Create a bulk write error.
    pub fn bulk_write(msg: impl Into<String>) -> Self {
        Self::BulkWriteError(msg.into())
    }

    /// Create a task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::TaskError(msg.into())
    }

    /// Create an index configuration error.
    pub fn index_config(msg: impl Into<String>) -> Self {
        Self::IndexConfigError(msg.into())
    }

    /// Create a move error.
    pub fn move_index(msg: impl Into<String>) -> Self {
        Self::MoveError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}
