//! Lexical richness: tokenization and Type-Token Ratio.
//!
//! A token is a lowercased word occurrence with punctuation removed; a type
//! is a distinct token value. Per-resource TTR tallies one resource's text
//! units; global TTR pools a single tally across a whole batch, which is not
//! the same number as the mean of the per-resource ratios.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RichnessBands;

/// Token and type counts for some body of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTally {
    pub total_tokens: usize,
    pub unique_types: HashSet<String>,
}

impl TokenTally {
    /// Add every token of `text` to this tally.
    pub fn add_text(&mut self, text: &str) {
        for token in tokenize(text) {
            self.total_tokens += 1;
            self.unique_types.insert(token);
        }
    }

    /// Pool another tally into this one.
    pub fn merge(&mut self, other: &TokenTally) {
        self.total_tokens += other.total_tokens;
        self.unique_types.extend(other.unique_types.iter().cloned());
    }

    pub fn unique_type_count(&self) -> usize {
        self.unique_types.len()
    }

    pub fn ttr(&self) -> f64 {
        ttr(self)
    }
}

/// Lowercase, strip punctuation, split on whitespace, drop empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tally a single text unit.
pub fn tally(text: &str) -> TokenTally {
    let mut tally = TokenTally::default();
    tally.add_text(text);
    tally
}

/// `unique_types / total_tokens`, or `0` for an empty tally.
pub fn ttr(tally: &TokenTally) -> f64 {
    if tally.total_tokens == 0 {
        return 0.0;
    }
    tally.unique_types.len() as f64 / tally.total_tokens as f64
}

/// Display band for a TTR value. Not used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RichnessBand {
    Alta,
    Media,
    Baja,
}

impl RichnessBand {
    pub fn from_ttr(ttr: f64, bands: &RichnessBands) -> Self {
        if ttr >= bands.high {
            RichnessBand::Alta
        } else if ttr >= bands.medium {
            RichnessBand::Media
        } else {
            RichnessBand::Baja
        }
    }
}

impl fmt::Display for RichnessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RichnessBand::Alta => write!(f, "Alta"),
            RichnessBand::Media => write!(f, "Media"),
            RichnessBand::Baja => write!(f, "Baja"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIED: &str =
        "El gato subió al árbol. El perro ladró al gato. Los animales son interesantes.";
    const REPETITIVE: &str = "El gato come. El gato duerme. El gato juega. El gato camina.";

    #[test]
    fn tokenize_normalizes_case_and_punctuation() {
        assert_eq!(
            tokenize("¡Hola, MUNDO! ¿Qué tal?  —  bien."),
            vec!["hola", "mundo", "qué", "tal", "bien"]
        );
        assert!(tokenize("  ... , ; ").is_empty());
    }

    #[test]
    fn varied_text_ttr() {
        let t = tally(VARIED);
        assert_eq!(t.total_tokens, 14);
        assert_eq!(t.unique_type_count(), 11);
        assert!((t.ttr() - 0.786).abs() < 0.001, "got {}", t.ttr());
        assert_eq!(
            RichnessBand::from_ttr(t.ttr(), &RichnessBands::default()),
            RichnessBand::Media
        );
    }

    #[test]
    fn repetitive_text_ttr() {
        let t = tally(REPETITIVE);
        assert_eq!(t.total_tokens, 12);
        assert_eq!(t.unique_type_count(), 6);
        assert!(t.ttr() < 0.7);
        assert_eq!(
            RichnessBand::from_ttr(t.ttr(), &RichnessBands::default()),
            RichnessBand::Baja
        );
    }

    #[test]
    fn ttr_is_zero_without_tokens() {
        assert_eq!(ttr(&TokenTally::default()), 0.0);
        assert_eq!(tally("   ").ttr(), 0.0);
    }

    #[test]
    fn ttr_stays_within_bounds_and_matches_formula() {
        for text in [VARIED, REPETITIVE, "uno", "a a a a", "Sol, luna y estrellas."] {
            let t = tally(text);
            let value = t.ttr();
            assert!((0.0..=1.0).contains(&value), "{text}: {value}");
            assert_eq!(value, t.unique_types.len() as f64 / t.total_tokens as f64);
        }
    }

    #[test]
    fn merge_pools_tokens_and_types() {
        let mut pooled = tally(VARIED);
        pooled.merge(&tally(REPETITIVE));
        assert_eq!(pooled.total_tokens, 26);
        // el, gato shared: 11 + {come, duerme, juega, camina}
        assert_eq!(pooled.unique_type_count(), 15);
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        let bands = RichnessBands::default();
        assert_eq!(RichnessBand::from_ttr(0.8, &bands), RichnessBand::Alta);
        assert_eq!(RichnessBand::from_ttr(0.6, &bands), RichnessBand::Media);
        assert_eq!(RichnessBand::from_ttr(0.59, &bands), RichnessBand::Baja);
    }
}
