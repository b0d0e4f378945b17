//! Dependency initialization and wiring for the import command.

use std::sync::Arc;
use tracing::info;

use crate::{ImportError, Settings};
use search_import_pipeline::ImportOrchestrator;
use search_import_repository::{
    NdjsonDataSource, OpenSearchBackend, SearchBackend, StaticCollectionRegistry,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: ImportOrchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from `settings`.
    ///
    /// Loads the collection registry, connects to OpenSearch and verifies the
    /// cluster is healthy before anything is imported.
    pub async fn new(settings: &Settings) -> Result<Self, ImportError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            data_dir = %settings.data_dir.display(),
            registry = %settings.registry_path.display(),
            batch_size = settings.batch_size,
            atomic = settings.atomic,
            "Initializing dependencies"
        );

        let registry = StaticCollectionRegistry::load(&settings.registry_path).await?;

        info!("Collection registry loaded");

        if !settings.data_dir.is_dir() {
            return Err(ImportError::config(format!(
                "Data directory {} does not exist",
                settings.data_dir.display()
            )));
        }
        let source = NdjsonDataSource::new(&settings.data_dir);

        let backend = OpenSearchBackend::new(&settings.opensearch_url, settings.backend_config())
            .await
            .map_err(|e| {
                ImportError::config(format!("Failed to create OpenSearch client: {}", e))
            })?;

        // Verify OpenSearch is reachable
        let healthy = backend
            .health_check()
            .await
            .map_err(|e| ImportError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(ImportError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let orchestrator = ImportOrchestrator::new(
            Arc::new(registry),
            Arc::new(source),
            Arc::new(backend),
            settings.import_config(),
        )?;

        Ok(Self { orchestrator })
    }
}
