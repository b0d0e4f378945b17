//! Configuration types for the search backend.

/// Configuration for the OpenSearch backend.
#[derive(Debug, Clone)]
pub struct SearchBackendConfig {
    /// Largest page accepted by a single `_bulk` write; `None` accepts any size.
    pub max_batch_size: Option<usize>,
    /// Refresh the written index when a write task is waited on, so the
    /// records are searchable once the task resolves.
    pub refresh_on_wait: bool,
}

impl Default for SearchBackendConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            refresh_on_wait: true,
        }
    }
}

impl SearchBackendConfig {
    /// No limit on page size.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Accept pages of at most `max_batch_size` documents.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }
}
