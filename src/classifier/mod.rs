// src/classifier/mod.rs
// Intent classification over normalized text

pub mod model;
pub mod sequence;

pub use model::{ModelConfig, Pooling, SequenceModel, argmax};
pub use sequence::SequenceClassifier;

use crate::error::Result;

/// Top-1 prediction for one utterance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Decoded category id (label encoder class)
    pub category: u32,
    /// Probability of that category, in [0, 1]
    pub confidence: f32,
}

impl Classification {
    pub fn new(category: u32, confidence: f32) -> Self {
        Self { category, confidence }
    }
}

/// Read-only classification capability.
///
/// Implementations are shared across requests and must tolerate concurrent calls.
pub trait IntentClassifier: Send + Sync {
    /// Classify already-normalized text
    fn classify(&self, normalized: &str) -> Result<Classification>;
}
