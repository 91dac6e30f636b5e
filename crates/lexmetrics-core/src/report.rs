//! Outward-facing result types: the response envelope, user reports, and
//! JSON/markdown output for batch analyses.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::aggregate::BatchAnalysis;
use crate::classify::QualityLevel;
use crate::error::{AnalysisError, ErrorKind};

/// Response envelope returned by the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            kind: None,
            message: None,
            data: Some(data),
        }
    }

    /// A success that still carries an outcome kind, e.g. an empty result set.
    pub fn ok_with(kind: ErrorKind, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            kind: Some(kind),
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn failure(error: &AnalysisError) -> Self {
        Self {
            success: false,
            kind: Some(error.kind()),
            message: Some(error.to_string()),
            data: None,
        }
    }

    /// Convert back into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => anyhow::bail!(
                "{}",
                self.message.unwrap_or_else(|| "request failed".to_string())
            ),
        }
    }
}

/// Quality report for one user's resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub user: String,
    pub user_id: String,
    pub total_resources: usize,
    /// How many of the user's resources matched before the cap.
    pub total_matched: usize,
    /// Whether the report covers only part of the user's resources.
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub metrics: UserMetrics,
    pub breakdown: QualityBreakdown,
    pub type_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub average_grammar: f64,
    #[serde(rename = "averageTTR")]
    pub average_ttr: f64,
    pub overall_quality: QualityLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub excellent: usize,
    pub good: usize,
    pub regular: usize,
    pub poor: usize,
}

impl UserReport {
    /// Build a user report from the batch over that user's resources.
    pub fn from_batch(user: impl Into<String>, user_id: impl Into<String>, batch: &BatchAnalysis) -> Self {
        let overall_quality = if batch.is_empty() {
            QualityLevel::SinRecursos
        } else {
            batch.summary.overall_quality
        };
        let dist = &batch.quality_distribution;
        Self {
            user: user.into(),
            user_id: user_id.into(),
            total_resources: batch.total_resources_analyzed,
            total_matched: batch.total_matched,
            truncated: batch.truncated,
            note: batch.note.clone(),
            metrics: UserMetrics {
                average_grammar: batch.summary.avg_grammar,
                average_ttr: batch.summary.avg_ttr,
                overall_quality,
            },
            breakdown: QualityBreakdown {
                excellent: dist.excelente,
                good: dist.buena,
                regular: dist.regular,
                poor: dist.deficiente,
            },
            type_distribution: batch
                .resource_type_breakdown
                .iter()
                .map(|(t, b)| (t.clone(), b.count))
                .collect(),
        }
    }
}

impl BatchAnalysis {
    /// Save the analysis as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize analysis")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write analysis to {}", path.display()))?;
        Ok(())
    }

    /// Load an analysis from a JSON file.
    ///
    /// Per-resource token tallies are not persisted, so a loaded analysis
    /// cannot be re-aggregated.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis from {}", path.display()))?;
        let analysis: BatchAnalysis =
            serde_json::from_str(&content).context("failed to parse analysis JSON")?;
        Ok(analysis)
    }

    /// Format the analysis as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Linguistic quality\n\n");
        md.push_str(&format!(
            "**Resources analyzed:** {} | **Overall quality:** {} | **Avg grammar:** {:.1}% | **Avg TTR:** {:.3}\n\n",
            self.total_resources_analyzed,
            self.summary.overall_quality,
            self.summary.avg_grammar,
            self.summary.avg_ttr
        ));
        if let Some(note) = &self.note {
            md.push_str(&format!("> {note}\n\n"));
        }

        if self.is_empty() {
            return md;
        }

        let m = &self.aggregated_metrics;
        md.push_str(&format!(
            "**Corpus:** {} texts, {} sentences ({:.1}% correct), {} tokens, global TTR {:.3}\n\n",
            m.total_texts,
            m.total_sentences,
            m.global_grammatical_percentage,
            m.total_tokens,
            m.global_ttr
        ));

        md.push_str("### By resource type\n\n");
        md.push_str("| Type | Count | Avg grammar | Avg TTR |\n");
        md.push_str("|------|-------|-------------|---------|\n");
        for (resource_type, b) in &self.resource_type_breakdown {
            md.push_str(&format!(
                "| {} | {} | {:.1}% | {:.3} |\n",
                resource_type, b.count, b.avg_grammar, b.avg_lexical_richness
            ));
        }
        md.push('\n');

        md.push_str("### Resources\n\n");
        md.push_str("| Resource | Type | Grammar | TTR | Score | Quality |\n");
        md.push_str("|----------|------|---------|-----|-------|---------|\n");
        for r in &self.resources {
            md.push_str(&format!(
                "| {} | {} | {:.1}% | {:.3} | {:.2} | {} |\n",
                r.resource_id,
                r.resource_type,
                r.grammatical_percentage,
                r.ttr,
                r.combined_score,
                r.quality_level
            ));
        }
        md.push('\n');

        if !self.errors.is_empty() {
            md.push_str("### Skipped\n\n");
            for e in &self.errors {
                md.push_str(&format!("- `{}`: {}\n", e.resource_id, e.message));
            }
            md.push('\n');
        }

        if !self.recommendations.is_empty() {
            md.push_str("### Recommendations\n\n");
            for rec in &self.recommendations {
                md.push_str(&format!("- **{}** ({}): {}\n", rec.kind, rec.priority, rec.message));
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchOrchestrator;
    use crate::model::{Resource, ResourceFilter, ResourceType};
    use serde_json::json;

    fn resources() -> Vec<Resource> {
        vec![
            Resource {
                id: "c1".into(),
                resource_type: ResourceType::Comprension,
                owner: Some("u1".into()),
                title: None,
                content: Some(json!({"texto": "El gato subió al árbol. El perro ladró al gato."})),
            },
            Resource {
                id: "e1".into(),
                resource_type: ResourceType::Escritura,
                owner: Some("u1".into()),
                title: None,
                content: Some(json!({"consigna": "Los perros es grandes. Describe tu casa ideal."})),
            },
            Resource {
                id: "x1".into(),
                resource_type: ResourceType::Oral,
                owner: Some("u2".into()),
                title: None,
                content: None,
            },
        ]
    }

    fn batch() -> BatchAnalysis {
        BatchOrchestrator::default()
            .run(&resources(), &ResourceFilter::default())
            .unwrap()
    }

    #[test]
    fn failure_response_has_no_data() {
        let response: ApiResponse<BatchAnalysis> =
            ApiResponse::failure(&AnalysisError::ResourceNotFound("nope".into()));
        assert!(!response.success);
        assert_eq!(response.kind, Some(ErrorKind::ResourceNotFound));
        assert!(response.message.unwrap().contains("nope"));
        assert!(response.data.is_none());
    }

    #[test]
    fn into_result_surfaces_the_message() {
        let response: ApiResponse<u32> =
            ApiResponse::failure(&AnalysisError::Unauthorized("r9".into()));
        let err = response.into_result().unwrap_err();
        assert!(err.to_string().contains("r9"));
        assert_eq!(ApiResponse::ok(7).into_result().unwrap(), 7);
    }

    #[test]
    fn user_report_counts() {
        let batch = BatchOrchestrator::default()
            .run(&resources(), &ResourceFilter::by_owner("u1"))
            .unwrap();
        let report = UserReport::from_batch("Ana", "u1", &batch);
        assert_eq!(report.total_resources, 2);
        assert_eq!(report.type_distribution["comprension"], 1);
        assert_eq!(report.type_distribution["escritura"], 1);
        assert_eq!(
            report.breakdown.excellent + report.breakdown.good + report.breakdown.regular + report.breakdown.poor,
            2
        );
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["metrics"]["averageTTR"].is_number());
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["truncated"], false);
        assert!(json.get("note").is_none());
    }

    #[test]
    fn capped_user_report_says_it_is_partial() {
        let resources: Vec<Resource> = (0..60)
            .map(|i| Resource {
                id: format!("r{i}"),
                resource_type: ResourceType::Comprension,
                owner: Some("u1".into()),
                title: None,
                content: Some(json!({"texto": "El gato come. El perro duerme."})),
            })
            .collect();
        let batch = BatchOrchestrator::default()
            .run(&resources, &ResourceFilter::by_owner("u1"))
            .unwrap();
        let report = UserReport::from_batch("Ana", "u1", &batch);
        assert_eq!(report.total_resources, 50);
        assert_eq!(report.total_matched, 60);
        assert!(report.truncated);
        assert!(report.note.as_deref().unwrap().contains("first 50 of 60"));
    }

    #[test]
    fn user_without_resources() {
        let batch = BatchOrchestrator::default()
            .run(&resources(), &ResourceFilter::by_owner("nobody"))
            .unwrap();
        let report = UserReport::from_batch("Nadie", "nobody", &batch);
        assert_eq!(report.total_resources, 0);
        assert_eq!(report.metrics.overall_quality, QualityLevel::SinRecursos);
        assert!(report.type_distribution.is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let batch = batch();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("batch.json");

        batch.save_json(&path).unwrap();
        let loaded = BatchAnalysis::load_json(&path).unwrap();

        assert_eq!(loaded.id, batch.id);
        assert_eq!(loaded.summary, batch.summary);
        assert_eq!(loaded.errors, batch.errors);
        assert_eq!(loaded.resources.len(), 2);
    }

    #[test]
    fn markdown_output() {
        let md = batch().to_markdown();
        assert!(md.contains("By resource type"));
        assert!(md.contains("| c1 |"));
        assert!(md.contains("Skipped"));
        assert!(md.contains("`x1`"));
    }

    #[test]
    fn markdown_for_empty_batch() {
        let empty = BatchOrchestrator::default()
            .run(&[], &ResourceFilter::default())
            .unwrap();
        let md = empty.to_markdown();
        assert!(md.contains("Sin datos"));
        assert!(!md.contains("### Resources"));
    }
}
