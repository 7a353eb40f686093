// src/classifier/model.rs
// Candle-backed sequence model: embedding -> pooling -> dense stack -> softmax.
//
// Weights come from a safetensors export of the trained Keras model. Dense
// kernels are stored as [out, in] (transposed from Keras' [in, out]).

use candle_core::{D, DType, Device, Tensor};
use candle_nn::{Embedding, Linear, Module, VarBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ChatError, Result};
use crate::nlp::DEFAULT_SEQUENCE_LENGTH;

/// How the embedded sequence is reduced to a single feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    /// Keras `Flatten`: concatenate every position
    Flatten,
    /// Keras `GlobalAveragePooling1D`: mean over positions, padding included
    Average,
}

/// Shape of the exported model (`model_config.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub vocab_size: usize,
    pub embedding_dim: usize,
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,
    #[serde(default)]
    pub hidden_units: Vec<usize>,
    pub num_classes: usize,
    pub pooling: Pooling,
}

fn default_sequence_length() -> usize {
    DEFAULT_SEQUENCE_LENGTH
}

impl ModelConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn pooled_width(&self) -> usize {
        match self.pooling {
            Pooling::Flatten => self.embedding_dim * self.sequence_length,
            Pooling::Average => self.embedding_dim,
        }
    }
}

pub struct SequenceModel {
    config: ModelConfig,
    device: Device,
    embedding: Embedding,
    hidden: Vec<Linear>,
    output: Linear,
}

impl SequenceModel {
    /// Load weights from a safetensors file
    pub fn load(config: ModelConfig, weights: &Path) -> Result<Self> {
        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(weights, &device)?;
        Self::from_tensors(config, tensors, &device)
    }

    pub fn from_tensors(config: ModelConfig, tensors: HashMap<String, Tensor>, device: &Device) -> Result<Self> {
        if config.sequence_length == 0 || config.num_classes == 0 {
            return Err(ChatError::Artifact(
                "model config needs a non-zero sequence length and class count".to_string(),
            ));
        }

        let vb = VarBuilder::from_tensors(tensors, DType::F32, device);
        let embedding = candle_nn::embedding(config.vocab_size, config.embedding_dim, vb.pp("embedding"))?;

        let mut hidden = Vec::with_capacity(config.hidden_units.len());
        let mut width = config.pooled_width();
        for (i, &units) in config.hidden_units.iter().enumerate() {
            hidden.push(candle_nn::linear(width, units, vb.pp(format!("hidden.{i}")))?);
            width = units;
        }
        let output = candle_nn::linear(width, config.num_classes, vb.pp("output"))?;

        Ok(Self {
            config,
            device: device.clone(),
            embedding,
            hidden,
            output,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Class probabilities for one padded id sequence
    pub fn predict(&self, ids: &[u32]) -> Result<Vec<f32>> {
        if ids.len() != self.config.sequence_length {
            return Err(ChatError::Internal(format!(
                "expected {} token ids, got {}",
                self.config.sequence_length,
                ids.len()
            )));
        }
        if let Some(&bad) = ids.iter().find(|&&id| id as usize >= self.config.vocab_size) {
            return Err(ChatError::Artifact(format!(
                "token id {bad} exceeds embedding size {}",
                self.config.vocab_size
            )));
        }

        let input = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let embedded = self.embedding.forward(&input)?;

        let mut xs = match self.config.pooling {
            Pooling::Flatten => embedded.flatten_from(1)?,
            Pooling::Average => embedded.mean(1)?,
        };
        for layer in &self.hidden {
            xs = layer.forward(&xs)?.relu()?;
        }
        let logits = self.output.forward(&xs)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;

        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }
}

/// Index and value of the largest probability; first wins on ties
pub fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probs.iter().enumerate() {
        match best {
            Some((_, v)) if p <= v => {}
            _ => best = Some((i, p)),
        }
    }
    best
}
