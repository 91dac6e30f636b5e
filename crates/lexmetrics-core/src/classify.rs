//! Quality classification from grammar percentage and TTR.
//!
//! `combined = grammar * 0.6 + (ttr * 100) * 0.4`, rounded to two decimals,
//! then banded with inclusive lower bounds: `>= 90` Excelente, `>= 75` Buena,
//! `>= 60` Regular, otherwise Deficiente.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

/// Discrete quality level, serialized with its Spanish label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityLevel {
    Excelente,
    Buena,
    Regular,
    Deficiente,
    /// A batch with no analyzed resources.
    #[serde(rename = "Sin datos")]
    SinDatos,
    /// A user who owns no resources.
    #[serde(rename = "Sin recursos")]
    SinRecursos,
}

impl QualityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Excelente => "Excelente",
            QualityLevel::Buena => "Buena",
            QualityLevel::Regular => "Regular",
            QualityLevel::Deficiente => "Deficiente",
            QualityLevel::SinDatos => "Sin datos",
            QualityLevel::SinRecursos => "Sin recursos",
        }
    }

    /// `true` for the sentinels that stand in for "nothing to classify".
    pub fn is_sentinel(&self) -> bool {
        matches!(self, QualityLevel::SinDatos | QualityLevel::SinRecursos)
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A combined score and its level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub combined_score: f64,
    pub quality_level: QualityLevel,
}

#[derive(Debug, Clone, Default)]
pub struct QualityClassifier {
    config: ScoringConfig,
}

impl QualityClassifier {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Weighted blend of grammar (0–100) and TTR (0–1), rounded to two decimals.
    pub fn combined_score(&self, grammar_pct: f64, ttr: f64) -> f64 {
        let raw = grammar_pct * self.config.grammar_weight
            + (ttr * 100.0) * self.config.lexical_weight;
        (raw * 100.0).round() / 100.0
    }

    pub fn level(&self, combined_score: f64) -> QualityLevel {
        if combined_score >= self.config.excellent {
            QualityLevel::Excelente
        } else if combined_score >= self.config.good {
            QualityLevel::Buena
        } else if combined_score >= self.config.regular {
            QualityLevel::Regular
        } else {
            QualityLevel::Deficiente
        }
    }

    pub fn classify(&self, grammar_pct: f64, ttr: f64) -> Classification {
        let combined_score = self.combined_score(grammar_pct, ttr);
        Classification {
            combined_score,
            quality_level: self.level(combined_score),
        }
    }
}

/// Classify with the default weights and thresholds.
pub fn classify(grammar_pct: f64, ttr: f64) -> Classification {
    QualityClassifier::default().classify(grammar_pct, ttr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_table() {
        let cases = [
            (95.0, 0.85, 91.0, QualityLevel::Excelente),
            (85.0, 0.6, 75.0, QualityLevel::Buena),
            (70.0, 0.5, 62.0, QualityLevel::Regular),
            (50.0, 0.2, 38.0, QualityLevel::Deficiente),
        ];
        for (grammar, ttr, score, level) in cases {
            let c = classify(grammar, ttr);
            assert_eq!(c.combined_score, score, "({grammar}, {ttr})");
            assert_eq!(c.quality_level, level, "({grammar}, {ttr})");
        }
    }

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        let classifier = QualityClassifier::default();
        assert_eq!(classifier.level(90.0), QualityLevel::Excelente);
        assert_eq!(classifier.level(89.99), QualityLevel::Buena);
        assert_eq!(classifier.level(75.0), QualityLevel::Buena);
        assert_eq!(classifier.level(60.0), QualityLevel::Regular);
        assert_eq!(classifier.level(59.99), QualityLevel::Deficiente);
    }

    #[test]
    fn extremes() {
        assert_eq!(classify(100.0, 1.0).combined_score, 100.0);
        assert_eq!(classify(0.0, 0.0).quality_level, QualityLevel::Deficiente);
    }

    #[test]
    fn sentinel_labels_serialize_in_spanish() {
        assert_eq!(
            serde_json::to_string(&QualityLevel::SinDatos).unwrap(),
            "\"Sin datos\""
        );
        assert_eq!(QualityLevel::SinRecursos.to_string(), "Sin recursos");
        assert!(QualityLevel::SinDatos.is_sentinel());
        assert!(!QualityLevel::Buena.is_sentinel());
    }

    #[test]
    fn custom_weights() {
        let classifier = QualityClassifier::new(ScoringConfig {
            grammar_weight: 1.0,
            lexical_weight: 0.0,
            ..Default::default()
        });
        assert_eq!(classifier.classify(80.0, 0.0).combined_score, 80.0);
    }
}
