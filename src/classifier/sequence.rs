// src/classifier/sequence.rs
// Artifact-backed classifier: vocabulary + sequence model + label decoder

use std::path::Path;
use tracing::{info, warn};

use super::model::{ModelConfig, SequenceModel, argmax};
use super::{Classification, IntentClassifier};
use crate::error::{ChatError, Result};
use crate::nlp::{LabelDecoder, Vocabulary};

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const LABELS_FILE: &str = "label_encoder.json";
pub const MODEL_CONFIG_FILE: &str = "model_config.json";
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";

pub struct SequenceClassifier {
    vocab: Vocabulary,
    model: SequenceModel,
    labels: LabelDecoder,
}

impl SequenceClassifier {
    pub fn new(vocab: Vocabulary, model: SequenceModel, labels: LabelDecoder) -> Self {
        if labels.len() != model.config().num_classes {
            warn!(
                labels = labels.len(),
                classes = model.config().num_classes,
                "Label decoder and model disagree on class count"
            );
        }
        Self { vocab, model, labels }
    }

    /// Load every artifact from one directory
    pub fn from_artifacts(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ChatError::Artifact(format!(
                "artifacts directory {} not found",
                dir.display()
            )));
        }

        let path = dir.join(TOKENIZER_FILE);
        let vocab = Vocabulary::from_file(&path).map_err(|e| artifact_error(&path, e))?;
        let path = dir.join(LABELS_FILE);
        let labels = LabelDecoder::from_file(&path).map_err(|e| artifact_error(&path, e))?;
        let path = dir.join(MODEL_CONFIG_FILE);
        let config = ModelConfig::from_file(&path).map_err(|e| artifact_error(&path, e))?;
        let path = dir.join(MODEL_WEIGHTS_FILE);
        let model = SequenceModel::load(config, &path).map_err(|e| artifact_error(&path, e))?;

        info!(
            dir = %dir.display(),
            vocabulary = vocab.len(),
            classes = labels.len(),
            sequence_length = model.config().sequence_length,
            "Loaded intent classifier"
        );

        Ok(Self::new(vocab, model, labels))
    }
}

/// Tag a loader error with the artifact path
fn artifact_error(path: &Path, err: ChatError) -> ChatError {
    match err {
        ChatError::Artifact(msg) => ChatError::Artifact(format!("{}: {msg}", path.display())),
        other => ChatError::Artifact(format!("{}: {other}", path.display())),
    }
}

impl IntentClassifier for SequenceClassifier {
    fn classify(&self, normalized: &str) -> Result<Classification> {
        let ids = self.vocab.encode(normalized, self.model.config().sequence_length);
        let probs = self.model.predict(&ids)?;
        let (index, confidence) = argmax(&probs)
            .ok_or_else(|| ChatError::Internal("model returned no probabilities".to_string()))?;
        let category = self.labels.decode(index)?;

        Ok(Classification::new(category, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::model::Pooling;
    use crate::classifier::model::tests::tiny_model;
    use candle_core::{DType, Device, Tensor};
    use std::collections::HashMap;

    fn vocab() -> Vocabulary {
        // <OOV>=1 ciao=2 blu=3
        Vocabulary::from_words(["ciao", "blu"], Some("<OOV>"))
    }

    #[test]
    fn test_classify_decodes_label() {
        let classifier = SequenceClassifier::new(vocab(), tiny_model(Pooling::Flatten), LabelDecoder::new(vec![4, 2, 0]));

        // "<OOV>" id 1 in first slot -> class index 0 -> label 4
        let result = classifier.classify("sconosciuto").unwrap();
        assert_eq!(result.category, 4);
        assert!(result.confidence > 0.99);

        // "ciao" id 2 -> class index 1 -> label 2
        let result = classifier.classify("ciao").unwrap();
        assert_eq!(result.category, 2);
    }

    #[test]
    fn test_index_without_label_is_contract_violation() {
        // Only one label for a three-class model
        let classifier = SequenceClassifier::new(vocab(), tiny_model(Pooling::Flatten), LabelDecoder::new(vec![0]));
        let err = classifier.classify("ciao").unwrap_err();
        assert!(matches!(err, ChatError::UnknownCategory(1)));
    }

    #[test]
    fn test_empty_text_classifies_as_padding() {
        let classifier = SequenceClassifier::new(vocab(), tiny_model(Pooling::Flatten), LabelDecoder::new(vec![0, 1, 2]));
        let result = classifier.classify("").unwrap();
        assert_eq!(result.category, 0);
        assert!(result.confidence < 0.5);
    }

    #[test]
    fn test_from_artifacts_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let device = Device::Cpu;

        std::fs::write(
            dir.path().join(TOKENIZER_FILE),
            r#"{"class_name": "Tokenizer", "config": {"num_words": 1000, "oov_token": "<OOV>",
                "word_index": "{\"<OOV>\": 1, \"ciao\": 2, \"blu\": 3}"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join(LABELS_FILE), r#"{"classes": [0, 1, 2]}"#).unwrap();
        std::fs::write(
            dir.path().join(MODEL_CONFIG_FILE),
            r#"{"vocab_size": 4, "embedding_dim": 2, "sequence_length": 2, "num_classes": 3, "pooling": "flatten"}"#,
        )
        .unwrap();

        let mut tensors = HashMap::new();
        tensors.insert(
            "embedding.weight".to_string(),
            Tensor::new(&[[0f32, 0.], [1., 0.], [0., 1.], [1., 1.]], &device).unwrap(),
        );
        tensors.insert(
            "output.weight".to_string(),
            Tensor::new(&[[0f32, 0., 0., 0.], [0., 0., 0., 0.], [10., 10., 0., 0.]], &device).unwrap(),
        );
        tensors.insert("output.bias".to_string(), Tensor::zeros(3, DType::F32, &device).unwrap());
        candle_core::safetensors::save(&tensors, dir.path().join(MODEL_WEIGHTS_FILE)).unwrap();

        let classifier = SequenceClassifier::from_artifacts(dir.path()).unwrap();
        // "blu" id 3 embeds to [1, 1] -> class 2
        let result = classifier.classify("blu").unwrap();
        assert_eq!(result.category, 2);
        assert!(result.confidence > 0.99);
    }

    #[test]
    fn test_missing_artifact_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let err = SequenceClassifier::from_artifacts(dir.path()).err().unwrap();
        match err {
            ChatError::Artifact(msg) => assert!(msg.contains(TOKENIZER_FILE), "{msg}"),
            other => panic!("expected artifact error, got {other:?}"),
        }

        std::fs::write(
            dir.path().join(TOKENIZER_FILE),
            r#"{"config": {"word_index": {"ciao": 1}}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join(LABELS_FILE), "not json").unwrap();
        let err = SequenceClassifier::from_artifacts(dir.path()).err().unwrap();
        match err {
            ChatError::Artifact(msg) => assert!(msg.contains(LABELS_FILE), "{msg}"),
            other => panic!("expected artifact error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_artifacts_dir() {
        let result = SequenceClassifier::from_artifacts(Path::new("/nonexistent/artifacts"));
        assert!(matches!(result, Err(ChatError::Artifact(_))));
    }
}
