// src/fallback/mod.rs
// Generative fallback used when local classification is not confident enough

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use tracing::warn;

/// Reply given whenever the generative model cannot be reached
pub const FALLBACK_APOLOGY: &str =
    "Si è verificato un errore nella comunicazione con il modello avanzato.";

/// Produces free text for an utterance. Never fails: errors become an apology.
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    async fn respond(&self, utterance: &str) -> String;

    /// Whether a real backend is configured
    fn is_available(&self) -> bool {
        true
    }
}

/// Gemini-backed responder
pub struct GeminiFallback {
    client: GeminiClient,
}

impl GeminiFallback {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FallbackResponder for GeminiFallback {
    async fn respond(&self, utterance: &str) -> String {
        match self.client.generate(utterance).await {
            Ok(text) => text,
            Err(e) => {
                // Network, auth and quota problems are expected operating noise
                warn!(error = %e, model = %self.client.model(), "Gemini fallback failed");
                FALLBACK_APOLOGY.to_string()
            }
        }
    }
}

/// Stand-in when no API key is configured
#[derive(Debug, Default)]
pub struct UnavailableFallback;

#[async_trait]
impl FallbackResponder for UnavailableFallback {
    async fn respond(&self, _utterance: &str) -> String {
        warn!("Fallback requested but no Gemini API key is configured");
        FALLBACK_APOLOGY.to_string()
    }

    fn is_available(&self) -> bool {
        false
    }
}
