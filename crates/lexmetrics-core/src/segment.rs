//! Sentence segmentation.
//!
//! Splits on `.`, `?`, `!` and `…`. A run of terminators (`...`, `?!`) ends
//! one sentence, and closing quotes or brackets that follow it stay with that
//! sentence. An ellipsis followed by a lowercase word continues the sentence. A period does not split when it sits inside a token (`3.5`,
//! `www.ejemplo.com`), ends a known abbreviation, or ends a single capital
//! initial.

use std::collections::HashSet;

/// Abbreviations (lowercase, with trailing dot) that never end a sentence.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "sr.", "sra.", "srta.", "sres.", "dr.", "dra.", "lic.", "ing.", "prof.", "profa.", "etc.",
    "p.", "ej.", "pág.", "págs.", "núm.", "vol.", "cap.", "aprox.", "av.", "avda.", "ee.",
    "uu.", "ud.", "uds.", "vd.", "vds.", "dto.", "depto.", "mr.", "mrs.", "ms.", "vs.", "e.g.",
    "i.e.", "a.m.", "p.m.",
];

/// Abbreviations that may also close a sentence when the next word is capitalized.
const SENTENCE_FINAL_ABBREVIATIONS: &[&str] = &["etc."];

#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    abbreviations: HashSet<String>,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SentenceSegmenter {
    /// Build a segmenter with the default abbreviations plus `extra`.
    pub fn new(extra: &[String]) -> Self {
        let abbreviations = DEFAULT_ABBREVIATIONS
            .iter()
            .map(|a| a.to_string())
            .chain(extra.iter().map(|a| normalize_abbreviation(a)))
            .collect();
        Self { abbreviations }
    }

    /// Split `text` into trimmed sentences. Whitespace-only input yields none.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;

        while i < chars.len() {
            let c = chars[i].1;
            if !is_terminator(c) || !self.is_boundary(text, &chars, i) {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && (is_terminator(chars[j].1) || is_closing(chars[j].1)) {
                j += 1;
            }
            if is_ellipsis(&chars[i..j]) && next_word_is_lowercase(&chars[j..]) {
                i = j;
                continue;
            }
            let end = chars.get(j).map_or(text.len(), |&(pos, _)| pos);
            push_fragment(&mut sentences, &text[start..end]);
            start = end;
            i = j;
        }

        push_fragment(&mut sentences, &text[start..]);
        sentences
    }

    fn is_boundary(&self, text: &str, chars: &[(usize, char)], i: usize) -> bool {
        let (pos, c) = chars[i];
        if c != '.' {
            return true;
        }

        let next = chars.get(i + 1).map(|&(_, n)| n);
        if next.is_some_and(char::is_alphanumeric) {
            return false;
        }

        let word_start = text[..pos]
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(p, ch)| p + ch.len_utf8());
        let word = text[word_start..=pos].trim_start_matches(|ch: char| !ch.is_alphanumeric());
        let lower = word.to_lowercase();

        if self.abbreviations.contains(&lower) {
            if SENTENCE_FINAL_ABBREVIATIONS.contains(&lower.as_str()) {
                return next_word_is_capitalized(&chars[i + 1..]);
            }
            return false;
        }

        let stem = word.trim_end_matches('.');
        let mut stem_chars = stem.chars();
        !matches!((stem_chars.next(), stem_chars.next()), (Some(first), None) if first.is_uppercase())
    }
}

/// Segment with the default abbreviation list.
pub fn segment(text: &str) -> Vec<String> {
    SentenceSegmenter::default().segment(text)
}

fn normalize_abbreviation(abbr: &str) -> String {
    let lower = abbr.trim().to_lowercase();
    if lower.ends_with('.') {
        lower
    } else {
        format!("{lower}.")
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '?' | '!' | '…')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '»' | '”' | '’' | ')' | ']')
}

fn next_word_is_capitalized(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_whitespace())
        .is_some_and(char::is_uppercase)
}

fn is_ellipsis(run: &[(usize, char)]) -> bool {
    run.iter().any(|&(_, c)| c == '…') || run.iter().filter(|&&(_, c)| c == '.').count() >= 2
}

fn next_word_is_lowercase(rest: &[(usize, char)]) -> bool {
    rest.iter()
        .map(|&(_, c)| c)
        .find(|c| !c.is_whitespace())
        .is_some_and(char::is_lowercase)
}

fn push_fragment(sentences: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        sentences.push(trimmed.to_string());
    }
}
