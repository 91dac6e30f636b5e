//! The `lexmetrics batch` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use lexmetrics_core::aggregate::BatchAnalysis;
use lexmetrics_core::analysis::ResourceAnalysis;
use lexmetrics_core::batch::BatchObserver;
use lexmetrics_core::error::AnalysisError;
use lexmetrics_core::model::{ResourceFilter, ResourceType};

use super::{build_service, check_format};

pub struct BatchArgs {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub resource_type: Option<String>,
    pub owner: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub parallel: bool,
}

/// Console progress observer.
struct ConsoleObserver;

impl BatchObserver for ConsoleObserver {
    fn on_batch_start(&self, selected: usize) {
        eprintln!("Analyzing {selected} resource(s)");
    }

    fn on_resource_complete(&self, analysis: &ResourceAnalysis) {
        eprintln!(
            "  Done: {} [{}] {:.2}",
            analysis.resource_id, analysis.quality_level, analysis.combined_score
        );
    }

    fn on_resource_error(&self, resource_id: &str, error: &AnalysisError) {
        eprintln!("  SKIPPED: {resource_id}: {error}");
    }

    fn on_batch_complete(&self, analyzed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "Complete: {analyzed} analyzed, {failed} skipped ({}ms)\n",
            elapsed.as_millis()
        );
    }
}

pub async fn execute(args: BatchArgs) -> Result<()> {
    check_format(&args.format, &["text", "json", "markdown", "md"])?;

    let resource_type = args
        .resource_type
        .as_deref()
        .map(|t| t.parse::<ResourceType>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid --type: {e}"))?;
    let filter = ResourceFilter {
        resource_type,
        owner_id: args.owner,
        limit: args.limit,
        offset: args.offset,
    };

    let service = build_service(args.config.as_deref(), args.data)?.parallel(args.parallel);
    let response = service.analyze_batch_with(&filter, &ConsoleObserver).await;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    let batch = response.into_result()?;

    if let Some(path) = &args.output {
        batch
            .save_json(path)
            .with_context(|| format!("failed to save analysis to {}", path.display()))?;
        eprintln!("Results saved to: {}", path.display());
    }

    match args.format.as_str() {
        "json" => {}
        "markdown" | "md" => println!("{}", batch.to_markdown()),
        _ => print_summary(&batch),
    }

    Ok(())
}

fn print_summary(batch: &BatchAnalysis) {
    println!(
        "Resources analyzed: {} | Overall quality: {}",
        batch.total_resources_analyzed, batch.summary.overall_quality
    );
    if let Some(note) = &batch.note {
        println!("Note: {note}");
    }
    if batch.is_empty() {
        println!("No resources matched the filter.");
        return;
    }

    let m = &batch.aggregated_metrics;
    println!(
        "Average grammar: {:.1}% | Average TTR: {:.3} | Global TTR: {:.3}",
        batch.summary.avg_grammar, batch.summary.avg_ttr, m.global_ttr
    );
    println!(
        "Corpus: {} texts, {} sentences, {} tokens, {} types",
        m.total_texts, m.total_sentences, m.total_tokens, m.total_unique_types
    );
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Resource", "Type", "Grammar", "TTR", "Score", "Quality"]);
    for r in &batch.resources {
        table.add_row(vec![
            Cell::new(&r.resource_id),
            Cell::new(&r.resource_type),
            Cell::new(format!("{:.1}%", r.grammatical_percentage)),
            Cell::new(format!("{:.3}", r.ttr)),
            Cell::new(format!("{:.2}", r.combined_score)),
            Cell::new(r.quality_level),
        ]);
    }
    println!("{table}");

    if !batch.errors.is_empty() {
        println!("\nSkipped:");
        for e in &batch.errors {
            println!("  {}: {}", e.resource_id, e.message);
        }
    }

    if !batch.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &batch.recommendations {
            println!("  [{}/{}] {}", rec.kind, rec.priority, rec.message);
        }
    }
}
