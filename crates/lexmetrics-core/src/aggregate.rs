//! Folding per-resource analyses into batch-level results.
//!
//! Two families of numbers are reported side by side:
//! - `summary` holds arithmetic means of the per-resource values;
//! - `aggregated_metrics` holds corpus-level values computed from pooled
//!   sentence and token counts.
//!
//! `summary.avg_ttr` and `aggregated_metrics.global_ttr` differ whenever
//! resources share vocabulary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::ResourceAnalysis;
use crate::classify::{QualityClassifier, QualityLevel};
use crate::config::MetricsConfig;
use crate::error::ErrorKind;
use crate::grammar::grammar_percentage;
use crate::lexical::TokenTally;
use crate::model::ResourceType;
use crate::recommend::{recommend, Recommendation};

/// A complete batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAnalysis {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub total_resources_analyzed: usize,
    /// How many resources matched the filter before the cap.
    pub total_matched: usize,
    /// Whether the resource cap cut the input.
    pub truncated: bool,
    pub summary: Summary,
    pub aggregated_metrics: AggregatedMetrics,
    pub resource_type_breakdown: BTreeMap<String, TypeBreakdown>,
    pub quality_distribution: QualityDistribution,
    pub recommendations: Vec<Recommendation>,
    pub resources: Vec<ResourceAnalysis>,
    /// Resources that were skipped because they could not be processed.
    #[serde(default)]
    pub errors: Vec<ResourceError>,
    /// Set when the batch was filtered to a single resource type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    /// Set when the input was truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub duration_ms: u64,
}

/// Means over the analyzed resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub avg_grammar: f64,
    #[serde(rename = "avgTTR")]
    pub avg_ttr: f64,
    pub overall_quality: QualityLevel,
}

/// Corpus-level metrics from pooled counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    pub total_texts: usize,
    pub total_sentences: usize,
    pub total_correct_sentences: usize,
    pub total_tokens: usize,
    pub total_unique_types: usize,
    pub global_grammatical_percentage: f64,
    #[serde(rename = "globalTTR")]
    pub global_ttr: f64,
}

/// Per-resource-type counts and averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub count: usize,
    pub avg_grammar: f64,
    pub avg_lexical_richness: f64,
}

/// How many resources fall in each quality level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityDistribution {
    #[serde(rename = "Excelente")]
    pub excelente: usize,
    #[serde(rename = "Buena")]
    pub buena: usize,
    #[serde(rename = "Regular")]
    pub regular: usize,
    #[serde(rename = "Deficiente")]
    pub deficiente: usize,
}

impl QualityDistribution {
    pub fn record(&mut self, level: QualityLevel) {
        match level {
            QualityLevel::Excelente => self.excelente += 1,
            QualityLevel::Buena => self.buena += 1,
            QualityLevel::Regular => self.regular += 1,
            QualityLevel::Deficiente => self.deficiente += 1,
            QualityLevel::SinDatos | QualityLevel::SinRecursos => {}
        }
    }

    pub fn total(&self) -> usize {
        self.excelente + self.buena + self.regular + self.deficiente
    }
}

/// A resource that was skipped during a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceError {
    pub resource_id: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl BatchAnalysis {
    pub fn is_empty(&self) -> bool {
        self.total_resources_analyzed == 0
    }
}

/// Fold per-resource analyses into a batch analysis.
///
/// Only the aggregation fields are filled in; the orchestrator adds
/// truncation, errors and timing.
pub fn aggregate(analyses: Vec<ResourceAnalysis>, config: &MetricsConfig) -> BatchAnalysis {
    let n = analyses.len();
    let classifier = QualityClassifier::new(config.scoring.clone());

    let summary = if n == 0 {
        Summary {
            avg_grammar: 0.0,
            avg_ttr: 0.0,
            overall_quality: QualityLevel::SinDatos,
        }
    } else {
        let avg_grammar = analyses.iter().map(|a| a.grammatical_percentage).sum::<f64>() / n as f64;
        let avg_ttr = analyses.iter().map(|a| a.ttr).sum::<f64>() / n as f64;
        Summary {
            avg_grammar,
            avg_ttr,
            overall_quality: classifier.classify(avg_grammar, avg_ttr).quality_level,
        }
    };

    let mut pooled = TokenTally::default();
    let mut total_texts = 0usize;
    let mut total_sentences = 0usize;
    let mut total_correct = 0usize;
    let mut distribution = QualityDistribution::default();
    let mut by_type: BTreeMap<String, Vec<&ResourceAnalysis>> = BTreeMap::new();

    for analysis in &analyses {
        pooled.merge(&analysis.tally);
        total_texts += analysis.total_texts;
        total_sentences += analysis.total_sentences;
        total_correct += analysis.correct_sentences;
        distribution.record(analysis.quality_level);
        by_type
            .entry(analysis.resource_type.to_string())
            .or_default()
            .push(analysis);
    }

    let resource_type_breakdown = by_type
        .into_iter()
        .map(|(resource_type, group)| {
            let count = group.len();
            let avg_grammar =
                group.iter().map(|a| a.grammatical_percentage).sum::<f64>() / count as f64;
            let avg_lexical_richness = group.iter().map(|a| a.ttr).sum::<f64>() / count as f64;
            (
                resource_type,
                TypeBreakdown {
                    count,
                    avg_grammar,
                    avg_lexical_richness,
                },
            )
        })
        .collect();

    let aggregated_metrics = AggregatedMetrics {
        total_texts,
        total_sentences,
        total_correct_sentences: total_correct,
        total_tokens: pooled.total_tokens,
        total_unique_types: pooled.unique_type_count(),
        global_grammatical_percentage: grammar_percentage(total_correct, total_sentences),
        global_ttr: pooled.ttr(),
    };

    let recommendations = recommend(&summary, &config.recommendations);

    BatchAnalysis {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        total_resources_analyzed: n,
        total_matched: n,
        truncated: false,
        summary,
        aggregated_metrics,
        resource_type_breakdown,
        quality_distribution: distribution,
        recommendations,
        resources: analyses,
        errors: Vec::new(),
        resource_type: None,
        note: None,
        duration_ms: 0,
    }
}
