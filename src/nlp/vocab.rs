// src/nlp/vocab.rs
// Word-index vocabulary compatible with the Keras `Tokenizer` JSON export

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{ChatError, Result};

/// Sequence length the classifier was trained on
pub const DEFAULT_SEQUENCE_LENGTH: usize = 10;

/// Padding value written after short sequences
pub const PAD_INDEX: u32 = 0;

const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

#[derive(Deserialize)]
struct TokenizerJson {
    config: TokenizerConfigJson,
}

#[derive(Deserialize)]
struct TokenizerConfigJson {
    num_words: Option<usize>,
    #[serde(default = "default_filters")]
    filters: String,
    #[serde(default = "default_lower")]
    lower: bool,
    #[serde(default = "default_split")]
    split: String,
    oov_token: Option<String>,
    word_index: WordIndexField,
}

/// Keras stores `word_index` as a JSON-encoded string inside the config
#[derive(Deserialize)]
#[serde(untagged)]
enum WordIndexField {
    Encoded(String),
    Map(HashMap<String, u32>),
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_lower() -> bool {
    true
}

fn default_split() -> String {
    " ".to_string()
}

/// Fitted vocabulary mapping words to integer ids
#[derive(Debug, Clone)]
pub struct Vocabulary {
    word_index: HashMap<String, u32>,
    num_words: Option<usize>,
    oov_index: Option<u32>,
    lower: bool,
    filters: HashSet<char>,
    split: String,
}

impl Vocabulary {
    /// Load from a `tokenizer.to_json()` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: TokenizerJson = serde_json::from_str(raw)?;
        let config = parsed.config;

        let word_index = match config.word_index {
            WordIndexField::Map(map) => map,
            WordIndexField::Encoded(encoded) => serde_json::from_str(&encoded)?,
        };

        if config.split.is_empty() {
            return Err(ChatError::Artifact("tokenizer split string is empty".to_string()));
        }

        let oov_index = match &config.oov_token {
            Some(token) => Some(*word_index.get(token).ok_or_else(|| {
                ChatError::Artifact(format!("oov token {token:?} missing from word index"))
            })?),
            None => None,
        };

        Ok(Self {
            word_index,
            num_words: config.num_words,
            oov_index,
            lower: config.lower,
            filters: config.filters.chars().collect(),
            split: config.split,
        })
    }

    /// Build directly from a word list; index 1 is the first word
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>, oov_token: Option<&'a str>) -> Self {
        let mut word_index = HashMap::new();
        let mut next = 1u32;
        for word in oov_token.into_iter().chain(words) {
            word_index.entry(word.to_string()).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            });
        }
        let oov_index = oov_token.and_then(|t| word_index.get(t).copied());

        Self {
            word_index,
            num_words: None,
            oov_index,
            lower: true,
            filters: DEFAULT_FILTERS.chars().collect(),
            split: default_split(),
        }
    }

    /// Treat ids at or beyond `num_words` as unknown, as Keras does
    pub fn with_num_words(mut self, num_words: usize) -> Self {
        self.num_words = Some(num_words);
        self
    }

    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    pub fn oov_index(&self) -> Option<u32> {
        self.oov_index
    }

    /// Split text into words the way `text_to_word_sequence` does
    fn words(&self, text: &str) -> Vec<String> {
        let lowered = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let filtered: String = lowered
            .chars()
            .map(|c| {
                if self.filters.contains(&c) {
                    self.split.clone()
                } else {
                    c.to_string()
                }
            })
            .collect();

        filtered
            .split(self.split.as_str())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Convert text to word ids. Unknown words become the OOV id, or are dropped without one.
    pub fn text_to_sequence(&self, text: &str) -> Vec<u32> {
        let mut ids = Vec::new();
        for word in self.words(text) {
            match self.word_index.get(&word) {
                Some(&id) => {
                    let beyond_limit = self.num_words.is_some_and(|limit| id as usize >= limit);
                    if !beyond_limit {
                        ids.push(id);
                    } else if let Some(oov) = self.oov_index {
                        ids.push(oov);
                    }
                }
                None => {
                    if let Some(oov) = self.oov_index {
                        ids.push(oov);
                    }
                }
            }
        }
        ids
    }

    /// Ids padded or truncated to `maxlen`, both at the end
    pub fn encode(&self, text: &str, maxlen: usize) -> Vec<u32> {
        pad_sequence(self.text_to_sequence(text), maxlen)
    }
}

/// Post-padding and post-truncation to exactly `maxlen` entries
pub fn pad_sequence(mut ids: Vec<u32>, maxlen: usize) -> Vec<u32> {
    ids.truncate(maxlen);
    ids.resize(maxlen, PAD_INDEX);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    const KERAS_EXPORT: &str = r##"{
        "class_name": "Tokenizer",
        "config": {
            "num_words": 1000,
            "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": "<OOV>",
            "document_count": 3,
            "word_index": "{\"<OOV>\": 1, \"ciao\": 2, \"colore\": 3, \"preferito\": 4, \"va\": 5}"
        }
    }"##;

    #[test]
    fn test_loads_keras_encoded_word_index() {
        let vocab = Vocabulary::from_json(KERAS_EXPORT).unwrap();
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.oov_index(), Some(1));
        assert_eq!(vocab.text_to_sequence("ciao va"), vec![2, 5]);
    }

    #[test]
    fn test_loads_plain_object_word_index() {
        let raw = r#"{"config": {"num_words": null, "oov_token": null, "word_index": {"blu": 1}}}"#;
        let vocab = Vocabulary::from_json(raw).unwrap();
        assert_eq!(vocab.oov_index(), None);
        assert_eq!(vocab.text_to_sequence("blu"), vec![1]);
    }

    #[test]
    fn test_unknown_words_map_to_oov() {
        let vocab = Vocabulary::from_json(KERAS_EXPORT).unwrap();
        assert_eq!(vocab.text_to_sequence("ciao asdkjasjd va"), vec![2, 1, 5]);
    }

    #[test]
    fn test_unknown_words_dropped_without_oov() {
        let vocab = Vocabulary::from_words(["ciao", "va"], None);
        assert_eq!(vocab.text_to_sequence("ciao zzz va"), vec![1, 2]);
    }

    #[test]
    fn test_from_words_with_borrowed_oov_token() {
        let oov = String::from("<UNK>");
        let words: Vec<String> = vec!["ciao".into(), "blu".into()];
        let vocab = Vocabulary::from_words(words.iter().map(String::as_str), Some(oov.as_str()));
        assert_eq!(vocab.oov_index(), Some(1));
        assert_eq!(vocab.text_to_sequence("blu verde ciao"), vec![3, 1, 2]);
    }

    #[test]
    fn test_words_beyond_num_words_limit() {
        let vocab = Vocabulary::from_words(["a", "b", "c"], Some("<OOV>")).with_num_words(3);
        // <OOV>=1 a=2 b=3 c=4; ids >= 3 fall back to oov
        assert_eq!(vocab.text_to_sequence("a b c"), vec![2, 1, 1]);

        let vocab = Vocabulary::from_words(["a", "b", "c"], None).with_num_words(3);
        assert_eq!(vocab.text_to_sequence("a b c"), vec![1, 2]);
    }

    #[test]
    fn test_filters_and_case() {
        let vocab = Vocabulary::from_json(KERAS_EXPORT).unwrap();
        assert_eq!(vocab.text_to_sequence("CIAO,va!"), vec![2, 5]);
    }

    #[test]
    fn test_encode_pads_at_end() {
        let vocab = Vocabulary::from_json(KERAS_EXPORT).unwrap();
        assert_eq!(vocab.encode("ciao va", 4), vec![2, 5, 0, 0]);
    }

    #[test]
    fn test_encode_truncates_at_end() {
        let vocab = Vocabulary::from_json(KERAS_EXPORT).unwrap();
        let ids = vocab.encode("ciao va colore preferito ciao va colore preferito ciao va colore", 10);
        assert_eq!(ids.len(), 10);
        assert_eq!(&ids[..4], &[2, 5, 3, 4]);
        assert_eq!(ids[9], 5);
    }

    #[test]
    fn test_encode_empty_text() {
        let vocab = Vocabulary::from_json(KERAS_EXPORT).unwrap();
        assert_eq!(vocab.encode("", DEFAULT_SEQUENCE_LENGTH), vec![0; 10]);
    }

    #[test]
    fn test_missing_oov_entry_is_artifact_error() {
        let raw = r#"{"config": {"oov_token": "<OOV>", "word_index": {"blu": 1}}}"#;
        let err = Vocabulary::from_json(raw).unwrap_err();
        assert!(matches!(err, ChatError::Artifact(_)));
    }
}
