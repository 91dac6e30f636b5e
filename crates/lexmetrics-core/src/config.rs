//! Engine configuration.
//!
//! Every threshold the engine compares against lives here so that the
//! orchestrator, classifier, and recommendation rules read one object.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the metrics engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub richness: RichnessBands,
    #[serde(default)]
    pub recommendations: RecommendationThresholds,
    #[serde(default)]
    pub batch: BatchLimits,
    /// Extra abbreviations (with trailing dot) that must not end a sentence.
    #[serde(default)]
    pub abbreviations: Vec<String>,
}

/// Combined-score weights and quality thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_grammar_weight")]
    pub grammar_weight: f64,
    #[serde(default = "default_lexical_weight")]
    pub lexical_weight: f64,
    /// Minimum combined score for "Excelente".
    #[serde(default = "default_excellent")]
    pub excellent: f64,
    /// Minimum combined score for "Buena".
    #[serde(default = "default_good")]
    pub good: f64,
    /// Minimum combined score for "Regular".
    #[serde(default = "default_regular")]
    pub regular: f64,
}

fn default_grammar_weight() -> f64 {
    0.6
}
fn default_lexical_weight() -> f64 {
    0.4
}
fn default_excellent() -> f64 {
    90.0
}
fn default_good() -> f64 {
    75.0
}
fn default_regular() -> f64 {
    60.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            grammar_weight: default_grammar_weight(),
            lexical_weight: default_lexical_weight(),
            excellent: default_excellent(),
            good: default_good(),
            regular: default_regular(),
        }
    }
}

/// TTR display bands. Lower bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichnessBands {
    #[serde(default = "default_band_high")]
    pub high: f64,
    #[serde(default = "default_band_medium")]
    pub medium: f64,
}

fn default_band_high() -> f64 {
    0.8
}
fn default_band_medium() -> f64 {
    0.6
}

impl Default for RichnessBands {
    fn default() -> Self {
        Self {
            high: default_band_high(),
            medium: default_band_medium(),
        }
    }
}

/// Thresholds that drive recommendation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    /// Average grammar % below this emits a grammar recommendation.
    #[serde(default = "default_grammar_min")]
    pub grammar_min: f64,
    /// Below this the grammar recommendation is high priority.
    #[serde(default = "default_grammar_critical")]
    pub grammar_critical: f64,
    /// Average TTR below this emits a vocabulary recommendation.
    #[serde(default = "default_ttr_min")]
    pub ttr_min: f64,
    /// Below this the vocabulary recommendation is high priority.
    #[serde(default = "default_ttr_critical")]
    pub ttr_critical: f64,
    #[serde(default = "default_congratulate_grammar")]
    pub congratulate_grammar: f64,
    #[serde(default = "default_congratulate_ttr")]
    pub congratulate_ttr: f64,
}

fn default_grammar_min() -> f64 {
    80.0
}
fn default_grammar_critical() -> f64 {
    60.0
}
fn default_ttr_min() -> f64 {
    0.6
}
fn default_ttr_critical() -> f64 {
    0.4
}
fn default_congratulate_grammar() -> f64 {
    90.0
}
fn default_congratulate_ttr() -> f64 {
    0.7
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            grammar_min: default_grammar_min(),
            grammar_critical: default_grammar_critical(),
            ttr_min: default_ttr_min(),
            ttr_critical: default_ttr_critical(),
            congratulate_grammar: default_congratulate_grammar(),
            congratulate_ttr: default_congratulate_ttr(),
        }
    }
}

/// Cost bounds for batch analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchLimits {
    /// Hard cap on resources analyzed per batch.
    #[serde(default = "default_max_resources")]
    pub max_resources: usize,
    /// Soft latency budget; exceeding it only logs a warning.
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Maximum concurrent per-resource analyses in `run_parallel`.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_max_resources() -> usize {
    50
}
fn default_time_budget_ms() -> u64 {
    1000
}
fn default_parallelism() -> usize {
    4
}

impl BatchLimits {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_resources: default_max_resources(),
            time_budget_ms: default_time_budget_ms(),
            parallelism: default_parallelism(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_thresholds() {
        let config = MetricsConfig::default();
        assert_eq!(config.batch.max_resources, 50);
        assert_eq!(config.scoring.excellent, 90.0);
        assert_eq!(config.scoring.good, 75.0);
        assert_eq!(config.scoring.regular, 60.0);
        assert_eq!(config.scoring.grammar_weight, 0.6);
        assert_eq!(config.scoring.lexical_weight, 0.4);
        assert_eq!(config.batch.time_budget(), Duration::from_secs(1));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
abbreviations = ["Prof."]

[batch]
max_resources = 10

[scoring]
excellent = 95.0
"#;
        let config: MetricsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.batch.max_resources, 10);
        assert_eq!(config.batch.parallelism, 4);
        assert_eq!(config.scoring.excellent, 95.0);
        assert_eq!(config.scoring.good, 75.0);
        assert_eq!(config.richness, RichnessBands::default());
        assert_eq!(config.abbreviations, vec!["Prof."]);
    }
}
