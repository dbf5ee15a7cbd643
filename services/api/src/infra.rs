use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use lead_qa::config::{AppConfig, StorageConfig};
use lead_qa::error::AppError;
use lead_qa::screening::SqliteResultStore;
use lead_qa::telemetry;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads configuration and installs logging for a CLI command.
pub(crate) fn bootstrap() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

/// Opens the result store, preferring a path given on the command line.
/// A store that cannot be opened or initialized ends the run.
pub(crate) fn open_store(
    storage: &StorageConfig,
    database: Option<PathBuf>,
) -> Result<Arc<SqliteResultStore>, AppError> {
    let storage = match database {
        Some(database_path) => StorageConfig { database_path },
        None => storage.clone(),
    };
    Ok(Arc::new(SqliteResultStore::from_config(&storage)?))
}
