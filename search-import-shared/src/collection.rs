//! Collection descriptors.
//!
//! A collection is a named logical entity type mapped to one destination index.
//! Aggregate collections fan out to several member collections that are read
//! from independent sources but share the aggregate's destination index.

use serde::{Deserialize, Serialize};

/// A collection read from exactly one physical source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleCollection {
    /// Collection identifier used when paging the data source.
    pub name: String,
    /// Destination index name (prefix already applied).
    pub index: String,
}

impl SimpleCollection {
    pub fn new(name: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: index.into(),
        }
    }
}

/// A searchable collection as resolved from the registry.
///
/// Resolved once at lookup time so that nothing downstream has to inspect what
/// kind of collection it is dealing with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionDescriptor {
    /// One physical source.
    Simple { name: String, index: String },
    /// Ordered member collections sharing one destination index.
    Aggregate {
        name: String,
        index: String,
        members: Vec<String>,
    },
}

impl CollectionDescriptor {
    /// The collection's own name.
    pub fn name(&self) -> &str {
        match self {
            Self::Simple { name, .. } | Self::Aggregate { name, .. } => name,
        }
    }

    /// The destination index every member writes into.
    pub fn index(&self) -> &str {
        match self {
            Self::Simple { index, .. } | Self::Aggregate { index, .. } => index,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate { .. })
    }

    /// Expand into the simple collections to page, in declaration order.
    ///
    /// Members of an aggregate inherit the aggregate's destination index.
    pub fn targets(&self) -> Vec<SimpleCollection> {
        match self {
            Self::Simple { name, index } => vec![SimpleCollection::new(name, index)],
            Self::Aggregate { index, members, .. } => members
                .iter()
                .map(|member| SimpleCollection::new(member, index))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_targets() {
        let descriptor = CollectionDescriptor::Simple {
            name: "Product".to_string(),
            index: "products".to_string(),
        };

        assert!(!descriptor.is_aggregate());
        assert_eq!(
            descriptor.targets(),
            vec![SimpleCollection::new("Product", "products")]
        );
    }

    #[test]
    fn test_aggregate_targets_keep_order_and_index() {
        let descriptor = CollectionDescriptor::Aggregate {
            name: "Catalog".to_string(),
            index: "catalog".to_string(),
            members: vec!["Post".to_string(), "Comment".to_string()],
        };

        let targets = descriptor.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0], SimpleCollection::new("Post", "catalog"));
        assert_eq!(targets[1], SimpleCollection::new("Comment", "catalog"));
        assert_eq!(descriptor.name(), "Catalog");
    }
}
