//! Heuristic grammatical correctness checking.
//!
//! The checker walks an ordered [`RuleSet`] and records the first rule a
//! sentence violates. Rules are plain data (a name, a description and a
//! predicate), so the set can be reordered, trimmed or extended without
//! touching [`GrammarChecker::check`].

use serde::{Deserialize, Serialize};

/// Returns `true` when the sentence violates the rule.
pub type RulePredicate = fn(&SentenceView<'_>) -> bool;

/// One grammar rule.
#[derive(Clone)]
pub struct GrammarRule {
    pub name: String,
    pub description: String,
    pub violated: RulePredicate,
}

impl GrammarRule {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        violated: RulePredicate,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            violated,
        }
    }
}

impl std::fmt::Debug for GrammarRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRule")
            .field("name", &self.name)
            .finish()
    }
}

const INITIAL_CAPITAL: &str = "initial_capital";
const TERMINAL_PUNCTUATION: &str = "terminal_punctuation";

/// An ordered list of rules; earlier rules win.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<GrammarRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: vec![
                GrammarRule::new(
                    "subject_verb_agreement",
                    "subject and verb must agree in number",
                    subject_verb_disagreement,
                ),
                GrammarRule::new(
                    "determiner_noun_agreement",
                    "determiner and noun must agree in number",
                    determiner_noun_disagreement,
                ),
                GrammarRule::new(
                    "repeated_word",
                    "the same word must not appear twice in a row",
                    has_repeated_word,
                ),
                GrammarRule::new(
                    INITIAL_CAPITAL,
                    "a sentence must start with a capital letter",
                    lacks_initial_capital,
                ),
                GrammarRule::new(
                    TERMINAL_PUNCTUATION,
                    "a sentence must end with terminal punctuation",
                    lacks_terminal_punctuation,
                ),
                GrammarRule::new(
                    "opening_question_mark",
                    "a question must open with '¿'",
                    lacks_opening_question_mark,
                ),
                GrammarRule::new(
                    "opening_exclamation_mark",
                    "an exclamation must open with '¡'",
                    lacks_opening_exclamation_mark,
                ),
                GrammarRule::new(
                    "space_before_punctuation",
                    "punctuation must not be preceded by a space",
                    has_space_before_punctuation,
                ),
            ],
        }
    }
}

impl RuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: GrammarRule) {
        self.rules.push(rule);
    }

    /// Drop a rule by name.
    pub fn without(mut self, name: &str) -> Self {
        self.rules.retain(|r| r.name != name);
        self
    }

    /// The rules that apply to fragments such as answer options, which need
    /// neither an initial capital nor a final period.
    pub fn for_fragments(&self) -> Self {
        self.clone()
            .without(INITIAL_CAPITAL)
            .without(TERMINAL_PUNCTUATION)
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The checked form of one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceRecord {
    pub text: String,
    pub is_correct: bool,
    #[serde(default)]
    pub violated_rule: Option<String>,
}

/// Grammar results over a list of sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarSummary {
    pub total_sentences: usize,
    pub correct_sentences: usize,
    pub percentage: f64,
    pub details: Vec<SentenceRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct GrammarChecker {
    rules: RuleSet,
}

impl GrammarChecker {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn check(&self, sentence: &str) -> SentenceRecord {
        let view = SentenceView::new(sentence);
        let violated = self.rules.rules.iter().find(|rule| (rule.violated)(&view));
        SentenceRecord {
            text: sentence.to_string(),
            is_correct: violated.is_none(),
            violated_rule: violated.map(|rule| rule.name.clone()),
        }
    }

    pub fn check_all<S: AsRef<str>>(&self, sentences: &[S]) -> GrammarSummary {
        let details: Vec<SentenceRecord> =
            sentences.iter().map(|s| self.check(s.as_ref())).collect();
        summarize(details)
    }
}

/// Build a summary from already-checked sentences.
pub fn summarize(details: Vec<SentenceRecord>) -> GrammarSummary {
    let total_sentences = details.len();
    let correct_sentences = details.iter().filter(|d| d.is_correct).count();
    GrammarSummary {
        total_sentences,
        correct_sentences,
        percentage: grammar_percentage(correct_sentences, total_sentences),
        details,
    }
}

/// `100 * correct / total`, or `0` when there are no sentences.
pub fn grammar_percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * correct as f64 / total as f64
}

// ---------------------------------------------------------------------------
// Sentence view
// ---------------------------------------------------------------------------

/// A word with punctuation removed, in original and lowercase form.
#[derive(Debug, Clone)]
pub struct Word {
    pub text: String,
    pub lower: String,
}

impl Word {
    fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    fn is_alphabetic(&self) -> bool {
        self.text.chars().all(char::is_alphabetic)
    }

    fn len(&self) -> usize {
        self.lower.chars().count()
    }
}

/// Precomputed views of a sentence shared by all rule predicates.
#[derive(Debug, Clone)]
pub struct SentenceView<'a> {
    /// The sentence, trimmed.
    pub text: &'a str,
    /// Whitespace-separated chunks, punctuation kept.
    pub raw_words: Vec<&'a str>,
    /// Words with punctuation removed; empty chunks dropped.
    pub words: Vec<Word>,
}

impl<'a> SentenceView<'a> {
    pub fn new(sentence: &'a str) -> Self {
        let text = sentence.trim();
        let raw_words: Vec<&str> = text.split_whitespace().collect();
        let words = raw_words
            .iter()
            .filter_map(|raw| {
                let text: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
                (!text.is_empty()).then(|| Word {
                    lower: text.to_lowercase(),
                    text,
                })
            })
            .collect();
        Self {
            text,
            raw_words,
            words,
        }
    }

    fn lower(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(|w| w.lower.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lexicons
// ---------------------------------------------------------------------------

const PLURAL_DETERMINERS: &[&str] = &[
    "los", "las", "unos", "unas", "estos", "estas", "esos", "esas", "aquellos", "aquellas", "mis",
    "tus", "sus", "nuestros", "nuestras",
];
const SINGULAR_DETERMINERS: &[&str] = &[
    "el", "la", "un", "una", "este", "esta", "ese", "esa", "aquel", "aquella", "mi", "tu", "su",
];
const PLURAL_PRONOUNS: &[&str] = &["ellos", "ellas", "nosotros", "nosotras", "ustedes"];
const SINGULAR_PRONOUNS: &[&str] = &["él", "ella", "usted"];
const SINGULAR_VERBS: &[&str] = &[
    "es", "está", "era", "fue", "estaba", "tiene", "tenía", "ha", "hace", "va", "puede", "quiere",
    "sabe", "vive", "juega", "come",
];
const PLURAL_VERBS: &[&str] = &[
    "son", "están", "eran", "fueron", "estaban", "tienen", "tenían", "han", "hacen", "van",
    "pueden", "quieren", "saben", "viven", "juegan", "comen",
];
const COORDINATORS: &[&str] = &["y", "e", "ni", "o", "u"];
const PREPOSITIONS: &[&str] = &[
    "a", "ante", "con", "contra", "de", "desde", "en", "entre", "hacia", "hasta", "para", "por",
    "sin", "sobre", "tras",
];
/// Words ending in -o/-a that legitimately follow a plural determiner.
const PLURAL_NOUN_EXCEPTIONS: &[&str] = &[
    "cuatro", "cinco", "siete", "ocho", "nueve", "once", "doce", "trece", "catorce", "quince",
    "veinte", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
    "ciento",
];
/// Singular nouns ending in -os/-as.
const SINGULAR_NOUN_EXCEPTIONS: &[&str] = &[
    "caos", "atlas", "cosmos", "lejos", "paraguas", "cumpleaños", "abrelatas", "lavaplatos",
    "rascacielos", "sacapuntas", "parabrisas", "matamoscas", "tocadiscos", "pararrayos",
];

// ---------------------------------------------------------------------------
// Rule predicates
// ---------------------------------------------------------------------------

fn subject_verb_disagreement(view: &SentenceView<'_>) -> bool {
    for (i, word) in view.words.iter().enumerate() {
        let w = word.lower.as_str();
        let previous = i.checked_sub(1).and_then(|p| view.lower(p));
        // A determiner inside a prepositional phrase is not the subject.
        if previous.is_some_and(|p| PREPOSITIONS.contains(&p)) {
            continue;
        }
        let after_coordinator = previous.is_some_and(|p| COORDINATORS.contains(&p));

        if PLURAL_DETERMINERS.contains(&w)
            && view.lower(i + 2).is_some_and(|v| SINGULAR_VERBS.contains(&v))
        {
            return true;
        }
        if PLURAL_PRONOUNS.contains(&w)
            && view.lower(i + 1).is_some_and(|v| SINGULAR_VERBS.contains(&v))
        {
            return true;
        }
        if after_coordinator {
            continue;
        }
        if SINGULAR_DETERMINERS.contains(&w)
            && view.lower(i + 2).is_some_and(|v| PLURAL_VERBS.contains(&v))
        {
            return true;
        }
        if SINGULAR_PRONOUNS.contains(&w)
            && view.lower(i + 1).is_some_and(|v| PLURAL_VERBS.contains(&v))
        {
            return true;
        }
    }
    false
}

fn determiner_noun_disagreement(view: &SentenceView<'_>) -> bool {
    for (i, pair) in view.words.windows(2).enumerate() {
        let (det, noun) = (pair[0].lower.as_str(), &pair[1]);
        if noun.is_capitalized() || !noun.is_alphabetic() {
            continue;
        }
        // "los"/"las"/"la" double as object pronouns; only trust them after a preposition.
        let after_preposition =
            i > 0 && view.lower(i - 1).is_some_and(|p| PREPOSITIONS.contains(&p));

        let plural = matches!(det, "unos" | "unas")
            || (matches!(det, "los" | "las") && after_preposition);
        if plural
            && noun.len() > 2
            && (noun.lower.ends_with('o') || noun.lower.ends_with('a'))
            && !PLURAL_NOUN_EXCEPTIONS.contains(&noun.lower.as_str())
        {
            return true;
        }

        let singular = matches!(det, "el" | "un" | "una") || (det == "la" && after_preposition);
        if singular
            && noun.len() > 3
            && (noun.lower.ends_with("os") || noun.lower.ends_with("as"))
            && !SINGULAR_NOUN_EXCEPTIONS.contains(&noun.lower.as_str())
        {
            return true;
        }
    }
    false
}

fn has_repeated_word(view: &SentenceView<'_>) -> bool {
    view.raw_words.windows(2).any(|pair| {
        pair[0].chars().all(char::is_alphabetic)
            && pair[1].chars().all(char::is_alphabetic)
            && pair[0].to_lowercase() == pair[1].to_lowercase()
    })
}

fn lacks_initial_capital(view: &SentenceView<'_>) -> bool {
    view.text
        .chars()
        .find(|c| c.is_alphanumeric())
        .is_some_and(char::is_lowercase)
}

fn lacks_terminal_punctuation(view: &SentenceView<'_>) -> bool {
    // Two-word fragments (answer options, labels) are not held to sentence punctuation.
    if view.words.len() < 3 {
        return false;
    }
    let last = view
        .text
        .trim_end_matches(|c: char| matches!(c, '"' | '\'' | '»' | '”' | '’' | ')' | ']'))
        .chars()
        .last();
    !matches!(last, Some('.' | '?' | '!' | '…' | ':'))
}

fn lacks_opening_question_mark(view: &SentenceView<'_>) -> bool {
    view.text.contains('?') && !view.text.contains('¿')
}

fn lacks_opening_exclamation_mark(view: &SentenceView<'_>) -> bool {
    view.text.contains('!') && !view.text.contains('¡')
}

fn has_space_before_punctuation(view: &SentenceView<'_>) -> bool {
    let chars: Vec<char> = view.text.chars().collect();
    chars.iter().enumerate().skip(1).any(|(i, &c)| {
        let spaced = chars[i - 1].is_whitespace();
        let ellipsis = c == '.' && chars.get(i + 1) == Some(&'.');
        spaced && !ellipsis && matches!(c, ',' | ';' | ':' | '?' | '!' | '.')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(sentence: &str) -> Option<String> {
        GrammarChecker::default().check(sentence).violated_rule
    }

    #[test]
    fn well_formed_sentences_pass() {
        for sentence in [
            "El gato subió al árbol.",
            "Los animales son interesantes.",
            "¿Dónde vive tu familia?",
            "¡Qué día tan bonito!",
            "El gato y el perro son amigos.",
            "Compré un paraguas nuevo.",
            "Los vi ayer en el parque.",
            "Los niños de la escuela son felices.",
            "Una de sus amigas es médica.",
            "El libro de los niños es azul.",
            "Al árbol",
        ] {
            let record = GrammarChecker::default().check(sentence);
            assert!(record.is_correct, "{sentence}: {:?}", record.violated_rule);
        }
    }

    #[test]
    fn agreement_violations() {
        assert_eq!(
            rule_of("Los perros es muy grandes.").as_deref(),
            Some("subject_verb_agreement")
        );
        assert_eq!(
            rule_of("Ellos tiene un coche rojo.").as_deref(),
            Some("subject_verb_agreement")
        );
        assert_eq!(
            rule_of("El niño son muy altos.").as_deref(),
            Some("subject_verb_agreement")
        );
        assert_eq!(
            rule_of("Tengo unos libro nuevos.").as_deref(),
            Some("determiner_noun_agreement")
        );
        assert_eq!(
            rule_of("Vimos un pájaros en el jardín.").as_deref(),
            Some("determiner_noun_agreement")
        );
    }

    #[test]
    fn punctuation_and_form_violations() {
        assert_eq!(rule_of("el sol brilla hoy.").as_deref(), Some("initial_capital"));
        assert_eq!(
            rule_of("El sol brilla mucho hoy").as_deref(),
            Some("terminal_punctuation")
        );
        assert_eq!(
            rule_of("Dónde está la biblioteca?").as_deref(),
            Some("opening_question_mark")
        );
        assert_eq!(
            rule_of("Qué sorpresa tan grande!").as_deref(),
            Some("opening_exclamation_mark")
        );
        assert_eq!(
            rule_of("Me gusta el el chocolate.").as_deref(),
            Some("repeated_word")
        );
        assert_eq!(
            rule_of("Hola , me llamo Ana.").as_deref(),
            Some("space_before_punctuation")
        );
    }

    #[test]
    fn first_violated_rule_wins() {
        // Both capitalization and terminal punctuation fail; capitalization comes first.
        assert_eq!(rule_of("el sol brilla mucho hoy").as_deref(), Some("initial_capital"));
        let rules = RuleSet::default().without("initial_capital");
        let record = GrammarChecker::new(rules).check("el sol brilla mucho hoy");
        assert_eq!(record.violated_rule.as_deref(), Some("terminal_punctuation"));
    }

    #[test]
    fn fragment_rules_skip_sentence_form_only() {
        let fragments = GrammarChecker::new(RuleSet::default().for_fragments());
        assert!(fragments.check("En un pueblo").is_correct);
        assert!(fragments.check("vivimos").is_correct);
        assert_eq!(
            fragments.check("Con con su abuelo").violated_rule.as_deref(),
            Some("repeated_word")
        );
        assert_eq!(
            fragments.check("Unos libro viejo").violated_rule.as_deref(),
            Some("determiner_noun_agreement")
        );
        assert_eq!(rule_of("En un pueblo pequeño").as_deref(), Some("terminal_punctuation"));
        assert_eq!(RuleSet::default().for_fragments().len(), 6);
    }

    #[test]
    fn rule_set_is_extensible() {
        fn too_long(view: &SentenceView<'_>) -> bool {
            view.words.len() > 5
        }
        let mut rules = RuleSet::empty();
        rules.push(GrammarRule::new("max_length", "at most five words", too_long));
        let checker = GrammarChecker::new(rules);
        assert!(checker.check("uno dos tres").is_correct);
        assert_eq!(
            checker.check("uno dos tres cuatro cinco seis").violated_rule.as_deref(),
            Some("max_length")
        );
        assert_eq!(RuleSet::default().len(), 8);
    }

    #[test]
    fn five_sentences_one_incorrect_is_eighty_percent() {
        let sentences = [
            "El gato duerme en el sofá.",
            "Mi hermana estudia medicina.",
            "Los perros es muy grandes.",
            "Nosotros vivimos cerca del mar.",
            "¿Te gusta leer novelas?",
        ];
        let summary = GrammarChecker::default().check_all(&sentences);
        assert_eq!(summary.total_sentences, 5);
        assert_eq!(summary.correct_sentences, 4);
        assert_eq!(summary.percentage, 80.0);
        assert!(!summary.details[2].is_correct);
    }

    #[test]
    fn percentage_is_zero_without_sentences() {
        let empty: [&str; 0] = [];
        let summary = GrammarChecker::default().check_all(&empty);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(grammar_percentage(0, 0), 0.0);
        assert_eq!(grammar_percentage(3, 4), 75.0);
    }
}
