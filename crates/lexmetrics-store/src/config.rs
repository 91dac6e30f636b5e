//! Configuration loading and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lexmetrics_core::config::MetricsConfig;
use lexmetrics_core::model::Resource;
use lexmetrics_core::traits::ResourceStore;

use crate::file::FileStore;
use crate::memory::InMemoryStore;

/// Environment variable that overrides the file store path.
pub const DATA_ENV_VAR: &str = "LEXMETRICS_DATA";

/// Where resources come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// A `.json`/`.toml` file or a directory of them.
    File { path: String },
    /// Resources listed inline in the config file.
    Memory {
        #[serde(default)]
        resources: Vec<Resource>,
        #[serde(default)]
        denied: Vec<String>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> String {
    "./resources".to_string()
}

/// Top-level lexmetrics configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexmetricsConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lexmetrics.toml` in the current directory
/// 2. `~/.config/lexmetrics/config.toml`
///
/// `LEXMETRICS_DATA` overrides the store with a file store at that path.
pub fn load_config() -> Result<LexmetricsConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LexmetricsConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("lexmetrics.toml");
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LexmetricsConfig::default(),
    };

    Ok(apply_overrides(config, std::env::var(DATA_ENV_VAR).ok()))
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<LexmetricsConfig> {
    Ok(toml::from_str(content)?)
}

/// Apply the data-path override, then resolve `${VAR}` references in the store path.
fn apply_overrides(mut config: LexmetricsConfig, data_override: Option<String>) -> LexmetricsConfig {
    if let Some(path) = data_override.filter(|p| !p.trim().is_empty()) {
        config.store = StoreConfig::File { path };
    }
    if let StoreConfig::File { path } = &mut config.store {
        *path = resolve_env_vars(path);
    }
    config
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lexmetrics"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ResourceStore>> {
    match config {
        StoreConfig::File { path } => {
            if path.trim().is_empty() {
                anyhow::bail!("file store path is empty");
            }
            Ok(Arc::new(FileStore::new(path)))
        }
        StoreConfig::Memory { resources, denied } => Ok(Arc::new(
            InMemoryStore::new(resources.clone()).with_denied(denied.iter().cloned()),
        )),
    }
}
