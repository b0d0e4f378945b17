//! Import configuration.

use search_import_repository::ConfigScope;

use crate::errors::ReindexError;

/// Default number of entities read and written per page.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default suffix appended to a source index name to name its temporary index.
pub const DEFAULT_TEMPORARY_SUFFIX: &str = "_tmp";

/// Settings shared by every component of an import run.
///
/// Built once and handed to each component at construction; never modified
/// while a job is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Number of entities per page.
    pub batch_size: usize,
    /// Prepended to every destination index name.
    pub index_prefix: String,
    /// Appended to a source index name to form its temporary index name.
    pub temporary_suffix: String,
    /// Configuration copied onto temporary indices.
    pub copy_scope: ConfigScope,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            index_prefix: String::new(),
            temporary_suffix: DEFAULT_TEMPORARY_SUFFIX.to_string(),
            copy_scope: ConfigScope::all(),
        }
    }
}

impl ImportConfig {
    /// Default configuration with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    /// Set the index prefix.
    pub fn index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.index_prefix = prefix.into();
        self
    }

    /// Set the temporary index suffix.
    pub fn temporary_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.temporary_suffix = suffix.into();
        self
    }

    /// Reject configurations no job could run with.
    pub fn validate(&self) -> Result<(), ReindexError> {
        if self.batch_size == 0 {
            return Err(ReindexError::invalid_config("batch size must be greater than zero"));
        }
        if self.temporary_suffix.is_empty() {
            return Err(ReindexError::invalid_config(
                "temporary index suffix must not be empty",
            ));
        }
        Ok(())
    }

    /// Full destination index name for a registry index name.
    pub fn index_name(&self, index: &str) -> String {
        format!("{}{}", self.index_prefix, index)
    }

    /// Temporary index name for a (prefixed) source index name.
    pub fn temporary_index_name(&self, source_index: &str) -> String {
        format!("{}{}", source_index, self.temporary_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.temporary_index_name("products"), "products_tmp");
        assert_eq!(config.index_name("products"), "products");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefix_applies_to_temporary_index() {
        let config = ImportConfig::default().index_prefix("staging_");
        let source = config.index_name("products");

        assert_eq!(source, "staging_products");
        assert_eq!(config.temporary_index_name(&source), "staging_products_tmp");
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let err = ImportConfig::with_batch_size(0).validate().unwrap_err();
        assert!(matches!(err, ReindexError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_empty_suffix() {
        let config = ImportConfig::default().temporary_suffix("");
        assert!(config.validate().is_err());
    }
}
