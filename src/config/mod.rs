// src/config/mod.rs
// Configuration and shared constants

pub mod env;

pub use env::{ApiKeys, ConfigValidation, EnvConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_GEMINI_MODEL};
