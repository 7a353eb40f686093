// src/lib.rs
// Cla - Italian intent-classifier chatbot

pub mod classifier;
pub mod config;
pub mod error;
pub mod fallback;
pub mod http;
pub mod nlp;
pub mod pipeline;
pub mod responses;
pub mod router;
pub mod web;

pub use error::{ChatError, Result};
pub use pipeline::ChatPipeline;
