//! Static collection registry.
//!
//! Collections are declared once, usually in a JSON file loaded at startup:
//!
//! ```json
//! {
//!   "collections": [
//!     { "name": "Product", "index": "products" },
//!     { "name": "Draft", "index": "drafts", "searchable": false },
//!     { "name": "Catalog", "index": "catalog", "members": ["Post", "Comment"] }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::RegistryError;
use crate::interfaces::CollectionRegistry;

/// Declaration of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionDefinition {
    /// Collection identifier.
    pub name: String,
    /// Destination index name.
    pub index: String,
    /// Set to false to exclude the collection from indexing.
    #[serde(default = "default_searchable")]
    pub searchable: bool,
    /// Member collections; a non-empty list makes this an aggregate.
    #[serde(default)]
    pub members: Vec<String>,
}

fn default_searchable() -> bool {
    true
}

impl CollectionDefinition {
    /// A searchable collection read from one source.
    pub fn simple(name: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: index.into(),
            searchable: true,
            members: Vec::new(),
        }
    }

    /// A searchable aggregate over `members`.
    pub fn aggregate<I, S>(name: impl Into<String>, index: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            index: index.into(),
            searchable: true,
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark the collection as excluded from indexing.
    pub fn excluded(mut self) -> Self {
        self.searchable = false;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    collections: Vec<CollectionDefinition>,
}

/// Registry backed by a fixed list of declarations.
#[derive(Debug, Clone)]
pub struct StaticCollectionRegistry {
    definitions: Vec<CollectionDefinition>,
    by_name: HashMap<String, usize>,
}

impl StaticCollectionRegistry {
    /// Build a registry, validating the declarations.
    ///
    /// Names must be non-empty and unique. An aggregate's members must be
    /// declared simple collections; they may be excluded from indexing on
    /// their own.
    pub fn new(definitions: Vec<CollectionDefinition>) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::with_capacity(definitions.len());

        for (position, definition) in definitions.iter().enumerate() {
            if definition.name.trim().is_empty() {
                return Err(RegistryError::invalid(format!(
                    "collection #{} has an empty name",
                    position
                )));
            }
            if definition.index.trim().is_empty() {
                return Err(RegistryError::invalid(format!(
                    "collection {} has an empty index name",
                    definition.name
                )));
            }
            if by_name.insert(definition.name.clone(), position).is_some() {
                return Err(RegistryError::invalid(format!(
                    "collection {} is declared twice",
                    definition.name
                )));
            }
        }

        for definition in &definitions {
            let mut seen = HashSet::new();
            for member in &definition.members {
                if !seen.insert(member.as_str()) {
                    return Err(RegistryError::invalid(format!(
                        "aggregate {} lists member {} twice",
                        definition.name, member
                    )));
                }
                let Some(&position) = by_name.get(member) else {
                    return Err(RegistryError::invalid(format!(
                        "aggregate {} lists undeclared member {}",
                        definition.name, member
                    )));
                };
                if !definitions[position].members.is_empty() {
                    return Err(RegistryError::invalid(format!(
                        "aggregate {} cannot contain aggregate {}",
                        definition.name, member
                    )));
                }
            }
        }

        debug!(collections = definitions.len(), "Built collection registry");

        Ok(Self {
            definitions,
            by_name,
        })
    }

    /// Parse a registry from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile =
            serde_json::from_str(json).map_err(|e| RegistryError::load(e.to_string()))?;
        Self::new(file.collections)
    }

    /// Load a registry from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RegistryError::load(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    fn definition(&self, name: &str) -> Result<&CollectionDefinition, RegistryError> {
        self.by_name
            .get(name)
            .map(|&position| &self.definitions[position])
            .ok_or_else(|| RegistryError::UnknownCollection(name.to_string()))
    }
}

impl CollectionRegistry for StaticCollectionRegistry {
    fn is_searchable(&self, name: &str) -> bool {
        self.definition(name)
            .map(|definition| definition.searchable)
            .unwrap_or(false)
    }

    fn destination_index_name(&self, name: &str) -> Result<String, RegistryError> {
        Ok(self.definition(name)?.index.clone())
    }

    fn is_aggregate(&self, name: &str) -> bool {
        self.definition(name)
            .map(|definition| !definition.members.is_empty())
            .unwrap_or(false)
    }

    fn members(&self, name: &str) -> Result<Vec<String>, RegistryError> {
        Ok(self.definition(name)?.members.clone())
    }

    fn searchables(&self) -> Vec<String> {
        self.definitions
            .iter()
            .filter(|definition| definition.searchable)
            .map(|definition| definition.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY_JSON: &str = r#"{
        "collections": [
            { "name": "Product", "index": "products" },
            { "name": "Draft", "index": "drafts", "searchable": false },
            { "name": "Post", "index": "posts", "searchable": false },
            { "name": "Comment", "index": "comments", "searchable": false },
            { "name": "Catalog", "index": "catalog", "members": ["Post", "Comment"] }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let registry = StaticCollectionRegistry::from_json(REGISTRY_JSON).unwrap();

        assert!(registry.is_searchable("Product"));
        assert!(!registry.is_searchable("Draft"));
        assert!(!registry.is_searchable("Unknown"));
        assert!(registry.is_aggregate("Catalog"));
        assert!(!registry.is_aggregate("Product"));
        assert_eq!(
            registry.members("Catalog").unwrap(),
            vec!["Post".to_string(), "Comment".to_string()]
        );
        assert_eq!(registry.destination_index_name("Product").unwrap(), "products");
        assert_eq!(
            registry.searchables(),
            vec!["Product".to_string(), "Catalog".to_string()]
        );
    }

    #[test]
    fn test_unknown_collection_lookup() {
        let registry = StaticCollectionRegistry::from_json(REGISTRY_JSON).unwrap();
        let err = registry.destination_index_name("Nope").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCollection(name) if name == "Nope"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = StaticCollectionRegistry::new(vec![
            CollectionDefinition::simple("Product", "products"),
            CollectionDefinition::simple("Product", "other"),
        ]);
        assert!(matches!(result, Err(RegistryError::Invalid(_))));
    }

    #[test]
    fn test_nested_aggregate_rejected() {
        let result = StaticCollectionRegistry::new(vec![
            CollectionDefinition::simple("A", "a"),
            CollectionDefinition::aggregate("Inner", "inner", ["A"]),
            CollectionDefinition::aggregate("Outer", "outer", ["Inner"]),
        ]);
        assert!(matches!(result, Err(RegistryError::Invalid(_))));
    }

    #[test]
    fn test_undeclared_member_rejected() {
        let result = StaticCollectionRegistry::new(vec![CollectionDefinition::aggregate(
            "Catalog",
            "catalog",
            ["Ghost"],
        )]);

        match result {
            Err(RegistryError::Invalid(msg)) => assert!(msg.contains("Ghost")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_excluded_member_is_accepted() {
        let registry = StaticCollectionRegistry::new(vec![
            CollectionDefinition::simple("Post", "posts").excluded(),
            CollectionDefinition::aggregate("Catalog", "catalog", ["Post"]),
        ])
        .unwrap();

        assert!(!registry.is_searchable("Post"));
        assert_eq!(registry.members("Catalog").unwrap(), vec!["Post".to_string()]);
    }

    #[test]
    fn test_malformed_json() {
        let result = StaticCollectionRegistry::from_json("{ not json");
        assert!(matches!(result, Err(RegistryError::Load(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = StaticCollectionRegistry::load("/nonexistent/collections.json").await;
        assert!(matches!(result, Err(RegistryError::Load(_))));
    }
}
