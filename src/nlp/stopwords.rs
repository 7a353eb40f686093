// src/nlp/stopwords.rs
// Stop-word sets used by the text normalizer

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// NLTK's Italian stop-word list, one word per line.
const ITALIAN: &str = include_str!("../../assets/stopwords/italian.txt");

/// Immutable set of words dropped before classification
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The Italian list the classifier was trained against
    pub fn italian() -> Self {
        Self::parse(ITALIAN)
    }

    /// Load a replacement list from disk (one word per line, `#` comments allowed)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::italian()
    }
}
