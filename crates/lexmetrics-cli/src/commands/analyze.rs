//! The `lexmetrics analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexmetrics_core::analysis::ResourceReport;

use super::{build_service, check_format};

pub async fn execute(
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
    id: String,
    format: String,
) -> Result<()> {
    check_format(&format, &["text", "json"])?;
    let service = build_service(config_path.as_deref(), data)?;
    let response = service.analyze_resource(&id).await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !response.success {
            anyhow::bail!(
                "{}",
                response.message.unwrap_or_else(|| "analysis failed".into())
            );
        }
        return Ok(());
    }

    let report = response.into_result()?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ResourceReport) {
    let grammar = &report.grammatical_correctness;
    let lexical = &report.lexical_richness;

    println!("Resource: {} ({})", report.resource_id, report.resource_type);
    println!(
        "Quality: {} (score {:.2})",
        report.quality_level, report.quality_score
    );
    println!(
        "Grammar: {}/{} sentences correct ({:.1}%)",
        grammar.correct_sentences, grammar.total_sentences, grammar.percentage
    );
    println!(
        "Lexical richness: TTR {:.3} ({}), {} tokens, {} types",
        lexical.average_ttr, lexical.richness_band, lexical.total_tokens, lexical.unique_types
    );
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Unit", "Tokens", "Types", "TTR"]);
    for detail in &lexical.details {
        table.add_row(vec![
            Cell::new(format!("{:?}", detail.kind)),
            Cell::new(detail.total_tokens),
            Cell::new(detail.unique_types),
            Cell::new(format!("{:.3}", detail.ttr)),
        ]);
    }
    println!("{table}");

    let flagged: Vec<_> = grammar.details.iter().filter(|d| !d.is_correct).collect();
    if !flagged.is_empty() {
        println!("\nFlagged sentences:");
        for record in flagged {
            println!(
                "  [{}] {}",
                record.violated_rule.as_deref().unwrap_or("unknown"),
                record.text
            );
        }
    }
}
