// src/pipeline.rs
// Per-request pipeline: normalize -> classify -> route.
//
// Built once at startup and shared by every request; nothing in here is
// mutated after construction.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::classifier::{Classification, IntentClassifier, SequenceClassifier};
use crate::config::EnvConfig;
use crate::error::{ChatError, Result};
use crate::fallback::{FallbackResponder, GeminiClient, GeminiFallback, UnavailableFallback};
use crate::nlp::{StopWords, TextNormalizer};
use crate::responses::ResponsePools;
use crate::router::ResponseRouter;

/// Reply when the model predicts an index the label decoder does not know
pub const INVALID_CATEGORY_REPLY: &str = "Errore: la risposta del chatbot DL non è una categoria valida.";

/// User-facing text for a failed request
pub fn error_reply(err: &ChatError) -> String {
    match err {
        ChatError::UnknownCategory(_) => INVALID_CATEGORY_REPLY.to_string(),
        other => format!("Si è verificato un errore: {other}"),
    }
}

pub struct ChatPipeline {
    normalizer: TextNormalizer,
    classifier: Arc<dyn IntentClassifier>,
    router: ResponseRouter,
}

impl ChatPipeline {
    pub fn new(normalizer: TextNormalizer, classifier: Arc<dyn IntentClassifier>, router: ResponseRouter) -> Self {
        Self {
            normalizer,
            classifier,
            router,
        }
    }

    /// Load artifacts, stop-words, pools and the fallback client described by `config`
    pub fn from_config(config: &EnvConfig) -> Result<Self> {
        let stop_words = match &config.stopwords_file {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::italian(),
        };
        let pools = match &config.responses_file {
            Some(path) => ResponsePools::from_file(path)?,
            None => ResponsePools::default(),
        };
        let classifier = SequenceClassifier::from_artifacts(&config.artifacts_dir)?;

        let fallback: Arc<dyn FallbackResponder> = match &config.api_keys.gemini {
            Some(key) => {
                let http = crate::http::create_shared_client(config.fallback_timeout);
                info!(model = %config.gemini_model, "Gemini fallback enabled");
                Arc::new(GeminiFallback::new(GeminiClient::new(key.clone(), &config.gemini_model, http)))
            }
            None => {
                warn!("Gemini fallback disabled (no GEMINI_API_KEY)");
                Arc::new(UnavailableFallback)
            }
        };

        let router = ResponseRouter::new(Arc::new(pools), fallback).with_threshold(config.confidence_threshold);

        Ok(Self::new(TextNormalizer::new(stop_words), Arc::new(classifier), router))
    }

    pub fn router(&self) -> &ResponseRouter {
        &self.router
    }

    pub fn normalize(&self, message: &str) -> String {
        self.normalizer.normalize(message)
    }

    /// Normalize and run inference off the async workers
    pub async fn classify(&self, message: &str) -> Result<(String, Classification)> {
        let normalized = self.normalizer.normalize(message);
        let classifier = Arc::clone(&self.classifier);
        let input = normalized.clone();

        let prediction = tokio::task::spawn_blocking(move || classifier.classify(&input)).await??;
        Ok((normalized, prediction))
    }

    /// Full pipeline for one message, errors surfaced
    pub async fn respond(&self, message: &str) -> Result<String> {
        let message = message.trim();
        let (_, prediction) = self.classify(message).await?;
        Ok(self.router.respond(message, prediction).await)
    }

    /// Full pipeline with every failure folded into a reply string
    pub async fn reply(&self, message: &str) -> String {
        match self.respond(message).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_expected() {
                    warn!(error = %e, "Request failed");
                } else {
                    error!(error = %e, "Pipeline failure");
                }
                error_reply(&e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::responses::Intent;
    use crate::router::tests::{RecordingFallback, fallback_reply};
    use std::sync::Mutex;

    /// Returns a fixed prediction and records the normalized input
    pub(crate) struct FixedClassifier {
        pub result: std::result::Result<Classification, usize>,
        pub seen: Mutex<Vec<String>>,
    }

    impl FixedClassifier {
        pub(crate) fn ok(category: u32, confidence: f32) -> Self {
            Self {
                result: Ok(Classification::new(category, confidence)),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn unknown_index(index: usize) -> Self {
            Self {
                result: Err(index),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl IntentClassifier for FixedClassifier {
        fn classify(&self, normalized: &str) -> Result<Classification> {
            self.seen.lock().unwrap().push(normalized.to_string());
            self.result.map_err(ChatError::UnknownCategory)
        }
    }

    struct PanickingClassifier;

    impl IntentClassifier for PanickingClassifier {
        fn classify(&self, _normalized: &str) -> Result<Classification> {
            panic!("model exploded")
        }
    }

    fn pipeline(classifier: Arc<dyn IntentClassifier>) -> ChatPipeline {
        let router = ResponseRouter::new(
            Arc::new(ResponsePools::default()),
            Arc::new(RecordingFallback::default()),
        );
        ChatPipeline::new(TextNormalizer::default(), classifier, router)
    }

    #[tokio::test]
    async fn test_classifier_sees_normalized_text() {
        let classifier = Arc::new(FixedClassifier::ok(3, 0.95));
        let p = pipeline(classifier.clone());
        let reply = p.reply("  Ciao, come va?  ").await;
        assert_eq!(p.router().pools().intent_of(&reply), Some(Intent::Wellbeing));
        assert_eq!(*classifier.seen.lock().unwrap(), vec!["ciao va".to_string()]);
    }

    #[tokio::test]
    async fn test_fallback_receives_trimmed_raw_text() {
        let p = pipeline(Arc::new(FixedClassifier::ok(1, 0.40)));
        assert_eq!(p.reply(" asdkjasjd ").await, fallback_reply("asdkjasjd"));
    }

    #[tokio::test]
    async fn test_unknown_index_folds_into_error_reply() {
        let p = pipeline(Arc::new(FixedClassifier::unknown_index(6)));
        assert_eq!(p.reply("ciao").await, INVALID_CATEGORY_REPLY);
        assert!(matches!(p.respond("ciao").await, Err(ChatError::UnknownCategory(6))));
    }

    #[tokio::test]
    async fn test_classifier_panic_is_contained() {
        let p = pipeline(Arc::new(PanickingClassifier));
        let reply = p.reply("ciao").await;
        assert!(reply.starts_with("Si è verificato un errore"));
    }

    #[tokio::test]
    async fn test_classify_returns_normalized_text() {
        let p = pipeline(Arc::new(FixedClassifier::ok(2, 0.91)));
        let (normalized, prediction) = p.classify("Qual è il tuo colore preferito?").await.unwrap();
        assert_eq!(normalized, "qual colore preferito");
        assert_eq!(prediction, Classification::new(2, 0.91));
    }

    #[test]
    fn test_error_reply_text() {
        assert_eq!(error_reply(&ChatError::UnknownCategory(3)), INVALID_CATEGORY_REPLY);
        assert_eq!(
            error_reply(&ChatError::Internal("boom".into())),
            "Si è verificato un errore: internal error: boom"
        );
    }

    #[test]
    fn test_from_config_missing_artifacts() {
        let config = EnvConfig::from_lookup(|key| match key {
            "CLA_ARTIFACTS_DIR" => Some("/nonexistent/cla-artifacts".to_string()),
            _ => None,
        });
        assert!(matches!(ChatPipeline::from_config(&config), Err(ChatError::Artifact(_))));
    }
}
