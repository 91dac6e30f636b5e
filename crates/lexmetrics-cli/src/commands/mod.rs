pub mod analyze;
pub mod batch;
pub mod init;
pub mod user_report;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use lexmetrics_core::batch::BatchOrchestrator;
use lexmetrics_core::service::AnalysisService;
use lexmetrics_store::config::{create_store, load_config_from, StoreConfig};

/// Build the analysis service from config, with `--data` taking precedence
/// over the configured store.
pub(crate) fn build_service(config_path: Option<&Path>, data: Option<PathBuf>) -> Result<AnalysisService> {
    let mut config = load_config_from(config_path)?;
    if let Some(path) = data {
        config.store = StoreConfig::File {
            path: path.to_string_lossy().into_owned(),
        };
    }

    let store = create_store(&config.store)?;
    tracing::debug!(store = store.name(), "using resource store");
    Ok(AnalysisService::new(store, BatchOrchestrator::from_config(config.metrics)))
}

pub(crate) fn check_format(format: &str, allowed: &[&str]) -> Result<()> {
    anyhow::ensure!(
        allowed.contains(&format),
        "unknown format '{format}' (expected one of: {})",
        allowed.join(", ")
    );
    Ok(())
}
