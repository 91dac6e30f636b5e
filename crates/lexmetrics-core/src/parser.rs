//! Resource file loader.
//!
//! Loads resources from JSON or TOML files and directories, and validates
//! them. JSON files hold either an array of resources or an object with a
//! `resources` array; TOML files use `[[resources]]` tables.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::extract::ExtractorRegistry;
use crate::model::Resource;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonResourceFile {
    List(Vec<Resource>),
    Wrapped { resources: Vec<Resource> },
}

#[derive(Debug, Deserialize)]
struct TomlResourceFile {
    #[serde(default)]
    resources: Vec<Resource>,
}

/// Parse a single `.json` or `.toml` resource file.
pub fn load_resource_file(path: &Path) -> Result<Vec<Resource>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read resource file: {}", path.display()))?;

    parse_resources_str(&content, path)
}

/// Parse resource file content; the format is chosen by `source_path`'s extension.
pub fn parse_resources_str(content: &str, source_path: &Path) -> Result<Vec<Resource>> {
    match source_path.extension().and_then(|e| e.to_str()) {
        Some("json") => {
            let parsed: JsonResourceFile = serde_json::from_str(content)
                .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
            Ok(match parsed {
                JsonResourceFile::List(resources) => resources,
                JsonResourceFile::Wrapped { resources } => resources,
            })
        }
        Some("toml") => {
            let parsed: TomlResourceFile = toml::from_str(content)
                .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
            Ok(parsed.resources)
        }
        _ => anyhow::bail!(
            "unsupported resource file (expected .json or .toml): {}",
            source_path.display()
        ),
    }
}

/// Load resources from a file, or recursively from every `.json`/`.toml`
/// file in a directory. Unreadable files inside a directory are skipped.
pub fn load_resources(path: &Path) -> Result<Vec<Resource>> {
    if path.is_file() {
        return load_resource_file(path);
    }
    if !path.is_dir() {
        anyhow::bail!("no such file or directory: {}", path.display());
    }

    let mut entries: Vec<_> = std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    let mut resources = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            resources.extend(load_resources(&entry)?);
        } else if entry
            .extension()
            .is_some_and(|ext| ext == "json" || ext == "toml")
        {
            match load_resource_file(&entry) {
                Ok(found) => resources.extend(found),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", entry.display(), e);
                }
            }
        }
    }

    Ok(resources)
}

/// A warning from resource validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The resource ID (if applicable).
    pub resource_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check loaded resources for problems that would make them fail or skew a batch.
pub fn validate_resources(
    resources: &[Resource],
    extractors: &ExtractorRegistry,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for resource in resources {
        if !seen_ids.insert(resource.id.as_str()) {
            warnings.push(ValidationWarning {
                resource_id: Some(resource.id.clone()),
                message: format!("duplicate resource ID: {}", resource.id),
            });
        }
    }

    for resource in resources {
        let warn = |message: String| ValidationWarning {
            resource_id: Some(resource.id.clone()),
            message,
        };

        if resource.id.trim().is_empty() {
            warnings.push(warn("resource ID is empty".into()));
        }
        if !extractors.supports(&resource.resource_type) {
            warnings.push(warn(format!(
                "unknown resource type '{}' will be skipped",
                resource.resource_type
            )));
            continue;
        }
        if resource.owner.is_none() {
            warnings.push(warn("resource has no owner".into()));
        }
        if let Err(e) = extractors.try_extract(resource) {
            warnings.push(warn(e.to_string()));
        }
    }

    warnings
}
