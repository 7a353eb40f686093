// src/nlp/normalizer.rs
// Text normalization applied before classification.
//
// Must match the preprocessing used when the classifier was trained:
// lowercase, drop every non-word non-space character, drop stop-words.

use regex::Regex;
use std::sync::LazyLock;

use super::stopwords::StopWords;

// Word characters are letters, digits and underscore only; combining marks
// and other connector punctuation are stripped. \x1C-\x1F count as whitespace.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_\s\x1C-\x1F]").expect("punctuation pattern is valid"));

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Lowercases, strips punctuation and removes stop-words
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    stop_words: StopWords,
}

impl TextNormalizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped = PUNCTUATION_RE.replace_all(&lowered, "");

        stripped
            .split(is_separator)
            .filter(|word| !word.is_empty() && !self.stop_words.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
