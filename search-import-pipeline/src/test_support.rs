//! In-memory collaborators for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use search_import_repository::{
    CollectionDefinition, ConfigScope, DataSource, DataSourceError, SearchBackend, SearchError,
    StaticCollectionRegistry, WriteTask,
};
use search_import_shared::{IndexCounts, SearchDocument};

/// `count` documents with ids `<prefix>-0 .. <prefix>-<count-1>`.
pub fn documents(prefix: &str, count: usize) -> Vec<SearchDocument> {
    (0..count)
        .map(|i| {
            SearchDocument::new(format!("{}-{}", prefix, i))
                .with_field("name", serde_json::json!(format!("{} {}", prefix, i)))
        })
        .collect()
}

pub fn ids(documents: &[SearchDocument]) -> Vec<String> {
    documents.iter().map(|d| d.object_id.clone()).collect()
}

/// Registry with `Product`, `User`, an excluded `Draft`, and the `Catalog`
/// aggregate over the excluded `Post` and `Comment`.
pub fn registry() -> Arc<StaticCollectionRegistry> {
    Arc::new(
        StaticCollectionRegistry::new(vec![
            CollectionDefinition::simple("Product", "products"),
            CollectionDefinition::simple("User", "users"),
            CollectionDefinition::simple("Draft", "drafts").excluded(),
            CollectionDefinition::simple("Post", "posts").excluded(),
            CollectionDefinition::simple("Comment", "comments").excluded(),
            CollectionDefinition::aggregate("Catalog", "catalog", ["Post", "Comment"]),
        ])
        .unwrap(),
    )
}

/// Data source serving fixed in-memory collections.
#[derive(Default)]
pub struct MemoryDataSource {
    collections: HashMap<String, Vec<SearchDocument>>,
    fail_at_offset: Option<(String, usize)>,
    pub reads: Mutex<Vec<(String, usize, usize)>>,
    pub releases: AtomicUsize,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, documents: Vec<SearchDocument>) -> Self {
        self.collections.insert(name.to_string(), documents);
        self
    }

    /// Fail the read of `collection` starting at `offset`.
    pub fn failing_at(mut self, collection: &str, offset: usize) -> Self {
        self.fail_at_offset = Some((collection.to_string(), offset));
        self
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> Vec<(String, usize, usize)> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn page(
        &self,
        collection: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchDocument>, DataSourceError> {
        self.reads
            .lock()
            .unwrap()
            .push((collection.to_string(), offset, limit));

        if let Some((failing, at)) = &self.fail_at_offset {
            if failing == collection && *at == offset {
                return Err(DataSourceError::Io(std::io::Error::other("disk on fire")));
            }
        }

        let documents = self
            .collections
            .get(collection)
            .ok_or_else(|| DataSourceError::unknown_collection(collection))?;

        Ok(documents.iter().skip(offset).take(limit).cloned().collect())
    }

    fn release_page_resources(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Something the mock backend was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    CopyConfig { from: String, to: String },
    Write { task: usize, index: String, count: usize },
    TaskResolved { task: usize, ok: bool },
    Move { from: String, to: String },
}

#[derive(Default)]
struct BackendState {
    indices: HashMap<String, Vec<SearchDocument>>,
    events: Vec<BackendEvent>,
    writes: usize,
}

/// Search backend keeping index contents in memory.
///
/// Accepted writes become part of the index immediately; writes whose task is
/// configured to fail are dropped. Like the OpenSearch backend, provisioning
/// refuses to reuse an existing index name.
#[derive(Default)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
    task_delays: HashMap<usize, Duration>,
    reject_write: Option<usize>,
    fail_task: Option<usize>,
    fail_copy: bool,
    fail_move: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an index.
    pub fn with_index(self, index: &str, documents: Vec<SearchDocument>) -> Self {
        self.state
            .lock()
            .unwrap()
            .indices
            .insert(index.to_string(), documents);
        self
    }

    /// Delay the completion of write number `task` (1-based).
    pub fn delaying_task(mut self, task: usize, delay: Duration) -> Self {
        self.task_delays.insert(task, delay);
        self
    }

    /// Reject write number `task` at submission.
    pub fn rejecting_write(mut self, task: usize) -> Self {
        self.reject_write = Some(task);
        self
    }

    /// Accept write number `task` but resolve its task with a failure.
    pub fn failing_task(mut self, task: usize) -> Self {
        self.fail_task = Some(task);
        self
    }

    pub fn failing_copy(mut self) -> Self {
        self.fail_copy = true;
        self
    }

    pub fn failing_move(mut self) -> Self {
        self.fail_move = true;
        self
    }

    pub fn events(&self) -> Vec<BackendEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Ids stored in `index`, or `None` if the index does not exist.
    pub fn index_ids(&self, index: &str) -> Option<Vec<String>> {
        self.state.lock().unwrap().indices.get(index).map(|d| ids(d))
    }

    pub fn moves(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, BackendEvent::Move { .. }))
            .count()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn write(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<WriteTask, SearchError> {
        let task = {
            let mut state = self.state.lock().unwrap();
            state.writes += 1;
            let task = state.writes;
            if self.reject_write == Some(task) {
                return Err(SearchError::write("rejected by mock"));
            }
            state.events.push(BackendEvent::Write {
                task,
                index: index.to_string(),
                count: documents.len(),
            });
            if self.fail_task != Some(task) {
                state
                    .indices
                    .entry(index.to_string())
                    .or_default()
                    .extend(documents.iter().cloned());
            }
            task
        };

        let ok = self.fail_task != Some(task);
        let delay = self.task_delays.get(&task).copied().unwrap_or_default();
        let state = Arc::clone(&self.state);

        Ok(WriteTask::new(
            index,
            IndexCounts::single(index, documents.len()),
            async move {
                tokio::time::sleep(delay).await;
                state
                    .lock()
                    .unwrap()
                    .events
                    .push(BackendEvent::TaskResolved { task, ok });
                if ok {
                    Ok(())
                } else {
                    Err(SearchError::task(format!("task {} failed", task)))
                }
            },
        ))
    }

    async fn copy_index_config(
        &self,
        from: &str,
        to: &str,
        _scope: ConfigScope,
    ) -> Result<(), SearchError> {
        if self.fail_copy {
            return Err(SearchError::index_config("copy refused by mock"));
        }
        let mut state = self.state.lock().unwrap();
        if state.indices.contains_key(to) {
            return Err(SearchError::index_config(format!("{} already exists", to)));
        }
        state.events.push(BackendEvent::CopyConfig {
            from: from.to_string(),
            to: to.to_string(),
        });
        state.indices.insert(to.to_string(), Vec::new());
        Ok(())
    }

    async fn move_index(&self, from: &str, to: &str) -> Result<(), SearchError> {
        if self.fail_move {
            return Err(SearchError::move_index("move refused by mock"));
        }
        let mut state = self.state.lock().unwrap();
        let contents = state
            .indices
            .remove(from)
            .ok_or_else(|| SearchError::move_index(format!("{} does not exist", from)))?;
        state.indices.insert(to.to_string(), contents);
        state.events.push(BackendEvent::Move {
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}
