//! Advisory recommendations derived from batch summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::Summary;
use crate::config::RecommendationThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Grammar,
    Vocabulary,
    Congratulations,
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendationType::Grammar => write!(f, "grammar"),
            RecommendationType::Vocabulary => write!(f, "vocabulary"),
            RecommendationType::Congratulations => write!(f, "congratulations"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub message: String,
}

/// Derive recommendations from a summary. An empty summary yields none.
pub fn recommend(summary: &Summary, thresholds: &RecommendationThresholds) -> Vec<Recommendation> {
    if summary.overall_quality.is_sentinel() {
        return Vec::new();
    }

    let mut recommendations = Vec::new();

    if summary.avg_grammar < thresholds.grammar_min {
        let priority = if summary.avg_grammar < thresholds.grammar_critical {
            Priority::High
        } else {
            Priority::Medium
        };
        recommendations.push(Recommendation {
            kind: RecommendationType::Grammar,
            priority,
            message: format!(
                "La corrección gramatical media es del {:.1}%. Revise la concordancia y la puntuación de los textos generados.",
                summary.avg_grammar
            ),
        });
    }

    if summary.avg_ttr < thresholds.ttr_min {
        let priority = if summary.avg_ttr < thresholds.ttr_critical {
            Priority::High
        } else {
            Priority::Medium
        };
        recommendations.push(Recommendation {
            kind: RecommendationType::Vocabulary,
            priority,
            message: format!(
                "La riqueza léxica media (TTR {:.2}) es baja. Pida textos con vocabulario más variado y menos repeticiones.",
                summary.avg_ttr
            ),
        });
    }

    if summary.avg_grammar >= thresholds.congratulate_grammar
        && summary.avg_ttr >= thresholds.congratulate_ttr
    {
        recommendations.push(Recommendation {
            kind: RecommendationType::Congratulations,
            priority: Priority::Low,
            message: "Excelente trabajo: los recursos combinan buena gramática y vocabulario variado."
                .to_string(),
        });
    }

    recommendations
}
