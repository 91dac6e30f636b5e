//! Per-resource analysis.
//!
//! Runs one resource through extraction, segmentation, grammar checking,
//! lexical tallying and classification.

use serde::{Deserialize, Serialize};

use crate::classify::{QualityClassifier, QualityLevel};
use crate::config::{MetricsConfig, RichnessBands};
use crate::error::AnalysisError;
use crate::extract::ExtractorRegistry;
use crate::grammar::{self, GrammarChecker, GrammarSummary, RuleSet};
use crate::lexical::{self, RichnessBand, TokenTally};
use crate::model::{Resource, ResourceType, TextUnit, UnitKind};
use crate::segment::SentenceSegmenter;

/// Scores for one analyzed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAnalysis {
    pub resource_id: String,
    pub resource_type: ResourceType,
    pub total_texts: usize,
    pub total_sentences: usize,
    pub correct_sentences: usize,
    /// 0–100.
    pub grammatical_percentage: f64,
    pub total_tokens: usize,
    pub unique_type_count: usize,
    /// 0–1, pooled over this resource's text units.
    pub ttr: f64,
    pub richness_band: RichnessBand,
    pub combined_score: f64,
    pub quality_level: QualityLevel,
    /// Token tally kept for batch-level pooling.
    #[serde(skip)]
    pub tally: TokenTally,
}

/// Detailed single-resource result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReport {
    pub resource_id: String,
    pub resource_type: ResourceType,
    pub text_analysis: TextAnalysis,
    pub grammatical_correctness: GrammarSummary,
    pub lexical_richness: LexicalRichness,
    pub quality_score: f64,
    pub quality_level: QualityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub total_texts: usize,
    pub units: Vec<TextUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalRichness {
    pub total_tokens: usize,
    pub unique_types: usize,
    /// TTR over all of the resource's units pooled together.
    #[serde(rename = "averageTTR")]
    pub average_ttr: f64,
    pub richness_band: RichnessBand,
    pub details: Vec<UnitLexicalDetail>,
}

/// TTR of a single text unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitLexicalDetail {
    pub kind: UnitKind,
    pub total_tokens: usize,
    pub unique_types: usize,
    pub ttr: f64,
}

/// Analyzes single resources. Stateless apart from its configuration.
#[derive(Debug, Clone)]
pub struct ResourceAnalyzer {
    extractors: ExtractorRegistry,
    segmenter: SentenceSegmenter,
    checker: GrammarChecker,
    fragment_checker: GrammarChecker,
    classifier: QualityClassifier,
    bands: RichnessBands,
}

impl Default for ResourceAnalyzer {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}

impl ResourceAnalyzer {
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            extractors: ExtractorRegistry::default(),
            segmenter: SentenceSegmenter::new(&config.abbreviations),
            checker: GrammarChecker::default(),
            fragment_checker: GrammarChecker::new(RuleSet::default().for_fragments()),
            classifier: QualityClassifier::new(config.scoring.clone()),
            bands: config.richness.clone(),
        }
    }

    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.fragment_checker = GrammarChecker::new(rules.for_fragments());
        self.checker = GrammarChecker::new(rules);
        self
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    pub fn classifier(&self) -> &QualityClassifier {
        &self.classifier
    }

    /// Score one resource.
    pub fn analyze(&self, resource: &Resource) -> Result<ResourceAnalysis, AnalysisError> {
        self.analyze_detailed(resource).map(|(analysis, _)| analysis)
    }

    /// Score one resource and keep the per-sentence and per-unit details.
    #[tracing::instrument(skip(self, resource), fields(resource_id = %resource.id))]
    pub fn analyze_detailed(
        &self,
        resource: &Resource,
    ) -> Result<(ResourceAnalysis, ResourceReport), AnalysisError> {
        let units = self.extractors.try_extract(resource)?;

        let mut sentence_records = Vec::new();
        let mut tally = TokenTally::default();
        let mut unit_details = Vec::with_capacity(units.len());

        for unit in &units {
            let checker = if unit.kind.is_fragment() {
                &self.fragment_checker
            } else {
                &self.checker
            };
            for sentence in self.segmenter.segment(&unit.text) {
                sentence_records.push(checker.check(&sentence));
            }
            let unit_tally = lexical::tally(&unit.text);
            unit_details.push(UnitLexicalDetail {
                kind: unit.kind,
                total_tokens: unit_tally.total_tokens,
                unique_types: unit_tally.unique_type_count(),
                ttr: unit_tally.ttr(),
            });
            tally.merge(&unit_tally);
        }

        let grammar = grammar::summarize(sentence_records);
        let ttr = tally.ttr();
        let band = RichnessBand::from_ttr(ttr, &self.bands);
        let classification = self.classifier.classify(grammar.percentage, ttr);

        tracing::debug!(
            sentences = grammar.total_sentences,
            tokens = tally.total_tokens,
            score = classification.combined_score,
            "analyzed resource"
        );

        let analysis = ResourceAnalysis {
            resource_id: resource.id.clone(),
            resource_type: resource.resource_type.clone(),
            total_texts: units.len(),
            total_sentences: grammar.total_sentences,
            correct_sentences: grammar.correct_sentences,
            grammatical_percentage: grammar.percentage,
            total_tokens: tally.total_tokens,
            unique_type_count: tally.unique_type_count(),
            ttr,
            richness_band: band,
            combined_score: classification.combined_score,
            quality_level: classification.quality_level,
            tally: tally.clone(),
        };

        let report = ResourceReport {
            resource_id: resource.id.clone(),
            resource_type: resource.resource_type.clone(),
            text_analysis: TextAnalysis {
                total_texts: units.len(),
                units,
            },
            grammatical_correctness: grammar,
            lexical_richness: LexicalRichness {
                total_tokens: tally.total_tokens,
                unique_types: tally.unique_type_count(),
                average_ttr: ttr,
                richness_band: band,
                details: unit_details,
            },
            quality_score: classification.combined_score,
            quality_level: classification.quality_level,
        };

        Ok((analysis, report))
    }
}
