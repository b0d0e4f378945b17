//! Collection registry error types.

use thiserror::Error;

/// Errors raised while loading or querying a collection registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry has no collection with this name.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// The registry definition could not be read or decoded.
    #[error("Failed to load registry: {0}")]
    Load(String),

    /// The registry definition is inconsistent.
    #[error("Invalid registry: {0}")]
    Invalid(String),
}

impl RegistryError {
    /// Create a load error.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Create an invalid registry error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
