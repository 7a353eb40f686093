// src/nlp/mod.rs
// Text processing in front of the classifier

pub mod labels;
pub mod normalizer;
pub mod stopwords;
pub mod vocab;

pub use labels::LabelDecoder;
pub use normalizer::TextNormalizer;
pub use stopwords::StopWords;
pub use vocab::{DEFAULT_SEQUENCE_LENGTH, Vocabulary, pad_sequence};
