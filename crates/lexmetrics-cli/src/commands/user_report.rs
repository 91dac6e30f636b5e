//! The `lexmetrics user-report` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lexmetrics_core::report::UserReport;

use super::{build_service, check_format};

pub async fn execute(
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
    user_id: String,
    user_name: Option<String>,
    format: String,
) -> Result<()> {
    check_format(&format, &["text", "json"])?;
    let service = build_service(config_path.as_deref(), data)?;
    let user = user_name.unwrap_or_else(|| user_id.clone());
    let response = service.user_report(&user, &user_id).await;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
        response.into_result()?;
        return Ok(());
    }

    print_report(&response.into_result()?);
    Ok(())
}

fn print_report(report: &UserReport) {
    println!("User: {} ({})", report.user, report.user_id);
    println!("Resources: {}", report.total_resources);
    if let Some(note) = &report.note {
        println!("Note: {note}");
    }
    println!("Overall quality: {}", report.metrics.overall_quality);
    if report.total_resources == 0 {
        return;
    }
    println!(
        "Average grammar: {:.1}% | Average TTR: {:.3}",
        report.metrics.average_grammar, report.metrics.average_ttr
    );
    println!();

    let b = &report.breakdown;
    let mut table = Table::new();
    table.set_header(vec!["Excellent", "Good", "Regular", "Poor"]);
    table.add_row(vec![
        Cell::new(b.excellent),
        Cell::new(b.good),
        Cell::new(b.regular),
        Cell::new(b.poor),
    ]);
    println!("{table}");

    println!("\nBy type:");
    for (resource_type, count) in &report.type_distribution {
        println!("  {resource_type}: {count}");
    }
}
