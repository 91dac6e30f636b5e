//! The `lexmetrics validate` command.

use std::path::PathBuf;

use anyhow::Result;

use lexmetrics_core::extract::ExtractorRegistry;
use lexmetrics_core::parser::{load_resources, validate_resources};

pub fn execute(data: PathBuf) -> Result<()> {
    let resources = load_resources(&data)?;
    println!("Loaded {} resource(s) from {}", resources.len(), data.display());

    let warnings = validate_resources(&resources, &ExtractorRegistry::default());
    for w in &warnings {
        let prefix = w
            .resource_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All resources valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
