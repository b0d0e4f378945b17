//! Index configuration handling.
//!
//! Builds the bodies for creating a temporary index from an existing index's
//! configuration and for the alias actions that move one index onto another.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::errors::SearchError;
use crate::types::ConfigScope;

/// Index settings that describe a particular concrete index and cannot be set
/// on a new one.
const NON_COPYABLE_SETTINGS: &[&str] = &[
    "uuid",
    "creation_date",
    "provided_name",
    "version",
    "routing",
    "resize",
];

const SYNONYM_FILTER_TYPES: &[&str] = &["synonym", "synonym_graph"];

/// What a name currently refers to on the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IndexTarget {
    /// An alias over these concrete indices.
    Alias(Vec<String>),
    /// A concrete index.
    Concrete,
    /// Nothing.
    Missing,
}

/// Build the body creating a new index with alias `alias` from the source
/// index description returned by `GET /<index>`.
///
/// `source` is `None` when the source index does not exist yet, in which case
/// the new index gets default settings.
pub(crate) fn create_index_body(source: Option<&Value>, alias: &str, scope: ConfigScope) -> Value {
    let mut body = Map::new();

    if let Some(source) = source {
        let mut index_settings = source["settings"]["index"]
            .as_object()
            .cloned()
            .unwrap_or_default();

        for key in NON_COPYABLE_SETTINGS {
            index_settings.remove(*key);
        }

        let analysis = index_settings.remove("analysis");
        if !scope.settings {
            index_settings.clear();
        }
        if let Some(mut analysis) = analysis {
            if !scope.synonyms {
                strip_synonyms(&mut analysis);
            }
            if scope.settings || scope.synonyms {
                index_settings.insert("analysis".to_string(), analysis);
            }
        }

        if !index_settings.is_empty() {
            body.insert("settings".to_string(), json!({ "index": index_settings }));
        }

        if scope.settings {
            if let Some(mappings) = source.get("mappings").filter(|m| !is_empty_object(m)) {
                body.insert("mappings".to_string(), mappings.clone());
            }
        }
    }

    body.insert("aliases".to_string(), json!({ alias: {} }));
    Value::Object(body)
}

/// Remove synonym filters and every analyzer reference to them.
fn strip_synonyms(analysis: &mut Value) {
    let mut removed = HashSet::new();

    if let Some(filters) = analysis.get_mut("filter").and_then(Value::as_object_mut) {
        filters.retain(|name, filter| {
            let is_synonym = filter["type"]
                .as_str()
                .map(|t| SYNONYM_FILTER_TYPES.contains(&t))
                .unwrap_or(false);
            if is_synonym {
                removed.insert(name.clone());
            }
            !is_synonym
        });
    }

    if removed.is_empty() {
        return;
    }

    if let Some(analyzers) = analysis.get_mut("analyzer").and_then(Value::as_object_mut) {
        for analyzer in analyzers.values_mut() {
            if let Some(chain) = analyzer.get_mut("filter").and_then(Value::as_array_mut) {
                chain.retain(|f| f.as_str().map(|f| !removed.contains(f)).unwrap_or(true));
            }
        }
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().map(Map::is_empty).unwrap_or(false)
}

/// Check that nothing on the cluster answers to `name` yet.
///
/// A leftover temporary index from an aborted run must be removed by the
/// operator first; provisioning next to it would leave an alias over two
/// indices.
pub(crate) fn ensure_absent(name: &str, target: &IndexTarget) -> Result<(), SearchError> {
    match target {
        IndexTarget::Missing => Ok(()),
        IndexTarget::Alias(indices) => Err(SearchError::index_config(format!(
            "temporary index {} already exists (alias over {}); delete it before re-running",
            name,
            indices.join(", ")
        ))),
        IndexTarget::Concrete => Err(SearchError::index_config(format!(
            "temporary index {} already exists; delete it before re-running",
            name
        ))),
    }
}

/// Alias actions moving `from` onto `to` in one atomic request.
///
/// The concrete indices behind `from` lose alias `from` and gain alias `to`;
/// whatever served `to` before is deleted.
pub(crate) fn move_actions(
    from: &str,
    to: &str,
    source: &IndexTarget,
    destination: &IndexTarget,
) -> Result<Value, SearchError> {
    let concrete = match source {
        IndexTarget::Alias(indices) if !indices.is_empty() => indices,
        IndexTarget::Alias(_) | IndexTarget::Missing => {
            return Err(SearchError::move_index(format!(
                "source index {} does not exist",
                from
            )))
        }
        IndexTarget::Concrete => {
            return Err(SearchError::move_index(format!(
                "source index {} is not an alias created by copy_index_config",
                from
            )))
        }
    };

    let mut actions = Vec::new();
    for index in concrete {
        actions.push(json!({ "remove": { "index": index, "alias": from } }));
        actions.push(json!({ "add": { "index": index, "alias": to } }));
    }

    match destination {
        IndexTarget::Alias(previous) => {
            for index in previous.iter().filter(|index| !concrete.contains(*index)) {
                actions.push(json!({ "remove_index": { "index": index } }));
            }
        }
        IndexTarget::Concrete => {
            actions.push(json!({ "remove_index": { "index": to } }));
        }
        IndexTarget::Missing => {}
    }

    Ok(json!({ "actions": actions }))
}
