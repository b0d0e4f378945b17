//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use chrono::Utc;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesExistsParts, IndicesGetAliasParts, IndicesGetParts,
        IndicesRefreshParts,
    },
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::SearchBackendConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchBackend;
use crate::opensearch::index_config::{
    create_index_body, ensure_absent, move_actions, IndexTarget,
};
use crate::types::{ConfigScope, WriteTask};
use search_import_shared::{IndexCounts, SearchDocument};

/// OpenSearch backend.
///
/// # Example
///
/// ```ignore
/// let config = SearchBackendConfig::default();
/// let backend = OpenSearchBackend::new("http://localhost:9200", config).await?;
///
/// backend.copy_index_config("products", "products_tmp", ConfigScope::all()).await?;
/// let task = backend.write("products_tmp", &documents).await?;
/// task.wait().await?;
/// backend.move_index("products_tmp", "products").await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
    config: SearchBackendConfig,
}

impl OpenSearchBackend {
    /// Create a new backend connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `config` - Write limits and completion behaviour
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchError)` - If connection setup fails
    pub async fn new(url: &str, config: SearchBackendConfig) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            max_batch_size = ?config.max_batch_size,
            "Created OpenSearch backend"
        );

        Ok(Self { client, config })
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Name of a fresh concrete index to put behind `alias`.
    fn versioned_name(alias: &str) -> String {
        format!("{}_v{}", alias, Utc::now().timestamp_millis())
    }

    /// Build the `_bulk` body: one action line and one source line per document.
    fn bulk_body(index: &str, documents: &[SearchDocument]) -> Vec<JsonBody<Value>> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            body.push(json!({"index": {"_index": index, "_id": document.object_id}}).into());
            body.push(document.source().into());
        }
        body
    }

    /// Count the acknowledged items of a `_bulk` response.
    ///
    /// Any rejected item fails the whole write.
    fn acknowledged_count(response: &Value) -> Result<usize, SearchError> {
        let items = response["items"]
            .as_array()
            .ok_or_else(|| SearchError::parse("bulk response has no items"))?;

        let mut acknowledged = 0;
        let mut failures = Vec::new();

        for item in items {
            let result = item
                .as_object()
                .and_then(|item| item.values().next())
                .ok_or_else(|| SearchError::parse("malformed bulk response item"))?;

            let status = result["status"].as_u64().unwrap_or(0);
            if (200..300).contains(&status) && result.get("error").is_none() {
                acknowledged += 1;
            } else {
                let reason = result["error"]["reason"]
                    .as_str()
                    .unwrap_or("unknown reason")
                    .to_string();
                failures.push(format!("{}: {}", result["_id"], reason));
            }
        }

        if !failures.is_empty() {
            return Err(SearchError::bulk_write(format!(
                "{} of {} items failed, first: {}",
                failures.len(),
                items.len(),
                failures[0]
            )));
        }

        Ok(acknowledged)
    }

    /// Read the error body of a failed response.
    async fn failure_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }

    /// Resolve what `name` refers to on the cluster.
    async fn resolve(&self, name: &str) -> Result<IndexTarget, SearchError> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::Name(&[name]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|e| SearchError::parse(e.to_string()))?;
            let indices: Vec<String> = body
                .as_object()
                .map(|indices| indices.keys().cloned().collect())
                .unwrap_or_default();
            if !indices.is_empty() {
                return Ok(IndexTarget::Alias(indices));
            }
        }

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        if response.status_code().is_success() {
            Ok(IndexTarget::Concrete)
        } else {
            Ok(IndexTarget::Missing)
        }
    }

    /// Fetch the settings and mappings of `name`, if it exists.
    async fn read_index(&self, name: &str) -> Result<Option<Value>, SearchError> {
        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = Self::failure_body(response).await;
            return Err(SearchError::index_config(format!(
                "Reading {} failed with status {}: {}",
                name, status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        // Keyed by concrete index name; an alias resolves to its indices.
        Ok(body
            .as_object()
            .and_then(|indices| indices.values().next())
            .cloned())
    }
}

/// Make everything written to `index` searchable.
async fn refresh(client: OpenSearch, index: String) -> Result<(), SearchError> {
    let response = client
        .indices()
        .refresh(IndicesRefreshParts::Index(&[index.as_str()]))
        .send()
        .await
        .map_err(|e| SearchError::task(e.to_string()))?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SearchError::task(format!(
            "Refresh of {} failed with status {}: {}",
            index, status, body
        )));
    }

    debug!(index = %index, "Index refreshed");
    Ok(())
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    /// Write a page with one `_bulk` request.
    ///
    /// The returned task resolves once the index has been refreshed, which
    /// runs on a spawned task so that the next page can be submitted meanwhile.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    async fn write(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<WriteTask, SearchError> {
        if documents.is_empty() {
            return Ok(WriteTask::completed(index, IndexCounts::new()));
        }

        self.validate_batch_size(documents.len())?;

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(Self::bulk_body(index, documents))
            .send()
            .await
            .map_err(|e| SearchError::write(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = Self::failure_body(response).await;
            error!(status = %status, body = %body, "Bulk request failed");
            return Err(SearchError::write(format!(
                "Bulk request failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;
        let acknowledged = Self::acknowledged_count(&body)?;
        let counts = IndexCounts::single(index, acknowledged);

        if !self.config.refresh_on_wait {
            return Ok(WriteTask::completed(index, counts));
        }

        let handle = tokio::spawn(refresh(self.client.clone(), index.to_string()));
        Ok(WriteTask::new(index, counts, async move {
            handle
                .await
                .map_err(|e| SearchError::task(format!("Refresh task aborted: {}", e)))?
        }))
    }

    #[instrument(skip(self))]
    async fn copy_index_config(
        &self,
        from: &str,
        to: &str,
        scope: ConfigScope,
    ) -> Result<(), SearchError> {
        ensure_absent(to, &self.resolve(to).await?)?;

        let source = self.read_index(from).await?;
        if source.is_none() {
            warn!(from = %from, "Source index does not exist, creating with default settings");
        }
        if scope.rules {
            debug!("Query rules have no OpenSearch counterpart, nothing to copy");
        }

        let concrete = Self::versioned_name(to);
        let body = create_index_body(source.as_ref(), to, scope);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&concrete))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::index_config(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = Self::failure_body(response).await;
            error!(status = %status, body = %body, "Index creation failed");
            return Err(SearchError::index_config(format!(
                "Creating {} failed with status {}: {}",
                concrete, status, body
            )));
        }

        info!(from = %from, to = %to, concrete = %concrete, "Copied index configuration");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn move_index(&self, from: &str, to: &str) -> Result<(), SearchError> {
        let source = self.resolve(from).await?;
        let destination = self.resolve(to).await?;
        let actions = move_actions(from, to, &source, &destination)?;

        let response = self
            .client
            .indices()
            .update_aliases()
            .body(actions)
            .send()
            .await
            .map_err(|e| SearchError::move_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = Self::failure_body(response).await;
            error!(status = %status, body = %body, "Alias update failed");
            return Err(SearchError::move_index(format!(
                "Moving {} to {} failed with status {}: {}",
                from, to, status, body
            )));
        }

        info!(from = %from, to = %to, "Moved index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let status = body["status"].as_str().unwrap_or("red");
        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_name() {
        let name = OpenSearchBackend::versioned_name("products_tmp");
        assert!(name.starts_with("products_tmp_v"));
        assert!(name["products_tmp_v".len()..].parse::<i64>().is_ok());
    }

    #[test]
    fn test_bulk_body_pairs_actions_and_sources() {
        let documents = vec![
            SearchDocument::new("1").with_field("name", "Lamp"),
            SearchDocument::new("2").with_field("name", "Chair"),
        ];

        let body = OpenSearchBackend::bulk_body("products", &documents);
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn test_acknowledged_count() {
        let response = json!({
            "took": 3,
            "errors": false,
            "items": [
                { "index": { "_index": "products_v1", "_id": "1", "status": 201 } },
                { "index": { "_index": "products_v1", "_id": "2", "status": 200 } }
            ]
        });

        assert_eq!(OpenSearchBackend::acknowledged_count(&response).unwrap(), 2);
    }

    #[test]
    fn test_acknowledged_count_with_failure() {
        let response = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": { "_id": "2", "status": 400,
                    "error": {
                        "type": "mapper_parsing_exception",
                        "reason": "failed to parse field [price]"
                    } } }
            ]
        });

        let err = OpenSearchBackend::acknowledged_count(&response).unwrap_err();
        match err {
            SearchError::BulkWriteError(msg) => {
                assert!(msg.contains("1 of 2"));
                assert!(msg.contains("failed to parse field [price]"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_acknowledged_count_malformed() {
        let result = OpenSearchBackend::acknowledged_count(&json!({ "errors": false }));
        assert!(matches!(result, Err(SearchError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_url() {
        let result = OpenSearchBackend::new("not a url", SearchBackendConfig::default()).await;
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_write_rejects_oversized_batch() {
        let backend = OpenSearchBackend::new(
            "http://localhost:9200",
            SearchBackendConfig::with_max_batch_size(1),
        )
        .await
        .unwrap();
        let documents = vec![SearchDocument::new("1"), SearchDocument::new("2")];

        let err = backend.write("products", &documents).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::BatchSizeExceeded { provided: 2, max: 1 }
        ));
    }
}
