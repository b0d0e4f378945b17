//! Search document type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record read from a data source and written into a search index.
///
/// The `object_id` becomes the document id in the destination index. All other
/// fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Unique identifier of the record within its collection.
    #[serde(rename = "objectID", alias = "id")]
    pub object_id: String,

    /// Remaining record attributes.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SearchDocument {
    /// Create a document with no attributes.
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            fields: Map::new(),
        }
    }

    /// Set an attribute on the document.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The body sent to the search engine (attributes only, the id travels separately).
    pub fn source(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_object_id() {
        let doc: SearchDocument =
            serde_json::from_value(json!({"objectID": "42", "name": "Lamp", "price": 12})).unwrap();

        assert_eq!(doc.object_id, "42");
        assert_eq!(doc.fields.get("name"), Some(&json!("Lamp")));
        assert_eq!(doc.fields.len(), 2);
    }

    #[test]
    fn test_deserialize_with_id_alias() {
        let doc: SearchDocument = serde_json::from_value(json!({"id": "7"})).unwrap();
        assert_eq!(doc.object_id, "7");
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn test_source_excludes_id() {
        let doc = SearchDocument::new("1").with_field("name", "Chair");
        assert_eq!(doc.source(), json!({"name": "Chair"}));
    }
}
