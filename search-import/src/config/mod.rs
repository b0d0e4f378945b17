//! Environment-driven settings for the import command.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::path::PathBuf;

use crate::ImportError;
use search_import_pipeline::config::{DEFAULT_BATCH_SIZE, DEFAULT_TEMPORARY_SUFFIX};
use search_import_pipeline::ImportConfig;
use search_import_repository::SearchBackendConfig;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default directory holding one `<collection>.ndjson` file per collection.
const DEFAULT_DATA_DIR: &str = "./data";

/// Default collection registry file.
const DEFAULT_REGISTRY: &str = "./collections.json";

/// Everything the import command reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub opensearch_url: String,
    pub data_dir: PathBuf,
    pub registry_path: PathBuf,
    pub batch_size: usize,
    pub index_prefix: String,
    pub temporary_suffix: String,
    /// Collection names requested explicitly.
    pub collections: Vec<String>,
    /// Destination index names whose collections should be imported.
    pub indices: Vec<String>,
    pub atomic: bool,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `IMPORT_DATA_DIR`: NDJSON data directory (default: ./data)
    /// - `IMPORT_REGISTRY`: collection registry file (default: ./collections.json)
    /// - `IMPORT_BATCH_SIZE`: records per page (default: 500)
    /// - `IMPORT_INDEX_PREFIX`: prefix for every destination index (default: none)
    /// - `IMPORT_TEMPORARY_SUFFIX`: temporary index suffix (default: _tmp)
    /// - `IMPORT_COLLECTIONS`: comma-separated collection names
    /// - `IMPORT_INDICES`: comma-separated destination index names
    /// - `IMPORT_ATOMIC`: `true` or `1` to swap in a temporary index
    pub fn from_env() -> Result<Self, ImportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ImportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let batch_size = match get("IMPORT_BATCH_SIZE") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                ImportError::config(format!("Invalid IMPORT_BATCH_SIZE '{}': {}", raw, e))
            })?,
            None => DEFAULT_BATCH_SIZE,
        };

        let settings = Self {
            opensearch_url: get("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            data_dir: get("IMPORT_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            registry_path: get("IMPORT_REGISTRY")
                .unwrap_or_else(|| DEFAULT_REGISTRY.to_string())
                .into(),
            batch_size,
            index_prefix: get("IMPORT_INDEX_PREFIX").unwrap_or_default(),
            temporary_suffix: get("IMPORT_TEMPORARY_SUFFIX")
                .unwrap_or_else(|| DEFAULT_TEMPORARY_SUFFIX.to_string()),
            collections: split_list(get("IMPORT_COLLECTIONS")),
            indices: split_list(get("IMPORT_INDICES")),
            atomic: get("IMPORT_ATOMIC")
                .map(|raw| parse_flag(&raw))
                .transpose()?
                .unwrap_or(false),
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ImportError> {
        if let Some(max) = self.backend_config().max_batch_size {
            if self.batch_size > max {
                return Err(ImportError::config(format!(
                    "IMPORT_BATCH_SIZE {} exceeds the backend limit of {}",
                    self.batch_size, max
                )));
            }
        }
        self.import_config().validate()?;
        Ok(())
    }

    pub fn import_config(&self) -> ImportConfig {
        ImportConfig::with_batch_size(self.batch_size)
            .index_prefix(self.index_prefix.clone())
            .temporary_suffix(self.temporary_suffix.clone())
    }

    pub fn backend_config(&self) -> SearchBackendConfig {
        SearchBackendConfig::default()
    }

    /// Collections to import.
    ///
    /// Explicit collection names come first, followed by the collections
    /// `select` finds for the requested indices. With neither set, `select`
    /// is asked for every searchable collection.
    pub fn collections_to_import<F>(&self, select: F) -> Vec<String>
    where
        F: FnOnce(&[String]) -> Vec<String>,
    {
        let mut names = self.collections.clone();
        if names.is_empty() || !self.indices.is_empty() {
            names.extend(select(&self.indices));
        }
        names
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: &str) -> Result<bool, ImportError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ImportError::config(format!(
            "Invalid IMPORT_ATOMIC '{}': expected true or false",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ImportError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.opensearch_url, DEFAULT_OPENSEARCH_URL);
        assert_eq!(settings.data_dir, PathBuf::from("./data"));
        assert_eq!(settings.registry_path, PathBuf::from("./collections.json"));
        assert_eq!(settings.batch_size, 500);
        assert_eq!(settings.temporary_suffix, "_tmp");
        assert!(settings.collections.is_empty());
        assert!(!settings.atomic);
    }

    #[test]
    fn test_reads_lists_and_flags() {
        let settings = settings(&[
            ("IMPORT_COLLECTIONS", "Product, User,,"),
            ("IMPORT_INDICES", "catalog"),
            ("IMPORT_ATOMIC", "1"),
            ("IMPORT_BATCH_SIZE", "3"),
            ("IMPORT_INDEX_PREFIX", "staging_"),
        ])
        .unwrap();

        assert_eq!(settings.collections, vec!["Product", "User"]);
        assert_eq!(settings.indices, vec!["catalog"]);
        assert!(settings.atomic);

        let config = settings.import_config();
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.temporary_index_name("staging_products"), "staging_products_tmp");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            settings(&[("IMPORT_BATCH_SIZE", "many")]),
            Err(ImportError::ConfigError(_))
        ));
        assert!(settings(&[("IMPORT_BATCH_SIZE", "0")]).is_err());
        assert!(settings(&[("IMPORT_BATCH_SIZE", "5000")]).is_err());
        assert!(settings(&[("IMPORT_ATOMIC", "sometimes")]).is_err());
    }

    #[test]
    fn test_collections_to_import() {
        let all = |indices: &[String]| {
            assert!(indices.is_empty());
            vec!["Product".to_string(), "Catalog".to_string()]
        };
        assert_eq!(settings(&[]).unwrap().collections_to_import(all), vec!["Product", "Catalog"]);

        let explicit = settings(&[("IMPORT_COLLECTIONS", "User")]).unwrap();
        assert_eq!(
            explicit.collections_to_import(|_| panic!("no index selection")),
            vec!["User"]
        );

        let both = settings(&[("IMPORT_COLLECTIONS", "User"), ("IMPORT_INDICES", "catalog")])
            .unwrap();
        assert_eq!(
            both.collections_to_import(|_| vec!["Catalog".to_string()]),
            vec!["User", "Catalog"]
        );
    }
}
