//! Import entity collections into the search backend.
//!
//! Configured through environment variables (see [`Settings::from_env`]).
//! Exits non-zero when configuration fails or any collection was aborted.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use search_import::{Dependencies, ImportError, Settings};
use search_import_pipeline::{ImportReport, ImportState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run() -> Result<ImportReport, ImportError> {
    let settings = Settings::from_env()?;
    let dependencies = Dependencies::new(&settings).await?;
    let orchestrator = dependencies.orchestrator;

    let collections =
        settings.collections_to_import(|indices| orchestrator.select_collections(indices));
    if collections.is_empty() {
        return Err(ImportError::config("No collections selected for import"));
    }

    info!(
        collections = ?collections,
        atomic = settings.atomic,
        "Starting import"
    );

    Ok(orchestrator.run_import(&collections, settings.atomic).await)
}

fn summarize(report: &ImportReport) -> Result<(), ImportError> {
    for outcome in &report.outcomes {
        let counts = serde_json::to_string(&outcome.counts)
            .map_err(|e| ImportError::config(format!("Failed to encode counts: {}", e)))?;
        let state = match &outcome.state {
            ImportState::Swapped => "swapped".to_string(),
            ImportState::WrittenDirect => "written".to_string(),
            ImportState::Skipped(reason) => format!("skipped ({})", reason),
            ImportState::Aborted(e) => format!("aborted ({})", e),
        };
        info!(
            collection = %outcome.collection,
            counts = %counts,
            state = %state,
            "{}: {}",
            outcome.collection,
            state
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    let report = match run().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Import failed");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = summarize(&report) {
        error!(error = %e, "Failed to summarize import");
    }

    if report.has_failures() {
        error!(failed = report.failed(), "Some collections were not imported");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
