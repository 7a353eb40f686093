// src/nlp/labels.rs
// Label decoder: classifier output index -> category id

use serde::Deserialize;
use std::path::Path;

use crate::error::{ChatError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelFile {
    Wrapped { classes: Vec<u32> },
    Bare(Vec<u32>),
}

/// Inverse of the fitted label encoder (`classes_` in training order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDecoder {
    classes: Vec<u32>,
}

impl LabelDecoder {
    pub fn new(classes: Vec<u32>) -> Self {
        Self { classes }
    }

    /// Load `{"classes": [...]}` or a bare JSON array
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let classes = match serde_json::from_str::<LabelFile>(raw)? {
            LabelFile::Wrapped { classes } | LabelFile::Bare(classes) => classes,
        };
        if classes.is_empty() {
            return Err(ChatError::Artifact("label encoder has no classes".to_string()));
        }
        Ok(Self { classes })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Map a model output index to its category; unknown indices are a contract violation
    pub fn decode(&self, index: usize) -> Result<u32> {
        self.classes
            .get(index)
            .copied()
            .ok_or(ChatError::UnknownCategory(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_identity_classes() {
        let decoder = LabelDecoder::from_json(r#"{"classes": [0, 1, 2, 3, 4]}"#).unwrap();
        assert_eq!(decoder.len(), 5);
        assert_eq!(decoder.decode(0).unwrap(), 0);
        assert_eq!(decoder.decode(4).unwrap(), 4);
    }

    #[test]
    fn test_decode_permuted_classes() {
        let decoder = LabelDecoder::from_json("[3, 0, 7]").unwrap();
        assert_eq!(decoder.decode(0).unwrap(), 3);
        assert_eq!(decoder.decode(2).unwrap(), 7);
    }

    #[test]
    fn test_out_of_range_index_is_unknown_category() {
        let decoder = LabelDecoder::new(vec![0, 1, 2]);
        let err = decoder.decode(5).unwrap_err();
        assert!(matches!(err, ChatError::UnknownCategory(5)));
    }

    #[test]
    fn test_empty_classes_rejected() {
        let err = LabelDecoder::from_json(r#"{"classes": []}"#).unwrap_err();
        assert!(matches!(err, ChatError::Artifact(_)));
    }
}
