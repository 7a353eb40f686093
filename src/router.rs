// src/router.rs
// Decision table from (utterance, prediction) to a reply.
//
// Rules are evaluated in order, first match wins:
//   1. utterance mentions "chi sei"      -> self-identity pool
//   2. confidence below threshold        -> generative fallback
//   3. known category                    -> that category's pool
//   4. anything else                     -> placeholder naming the category

use std::sync::Arc;
use tracing::{info, warn};

use crate::classifier::Classification;
use crate::config::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::fallback::FallbackResponder;
use crate::responses::{Intent, ResponsePools};

/// Case-insensitive substring that forces the self-identity reply
pub const IDENTITY_TRIGGER: &str = "chi sei";

/// Which rule fired for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    IdentityOverride,
    Fallback,
    Pool(Intent),
    Unrecognized(u32),
}

/// Placeholder for a category the pools do not cover
pub fn unrecognized_reply(category: u32) -> String {
    format!("Risposta per la categoria '{category}' (da definire)")
}

pub struct ResponseRouter {
    pools: Arc<ResponsePools>,
    fallback: Arc<dyn FallbackResponder>,
    threshold: f32,
}

impl ResponseRouter {
    pub fn new(pools: Arc<ResponsePools>, fallback: Arc<dyn FallbackResponder>) -> Self {
        Self {
            pools,
            fallback,
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn pools(&self) -> &ResponsePools {
        &self.pools
    }

    pub fn fallback_available(&self) -> bool {
        self.fallback.is_available()
    }

    /// Pure rule evaluation, no side effects
    pub fn decide(&self, utterance: &str, prediction: Classification) -> Route {
        if utterance.to_lowercase().contains(IDENTITY_TRIGGER) {
            return Route::IdentityOverride;
        }
        // NaN confidence counts as low
        if prediction.confidence.is_nan() || prediction.confidence < self.threshold {
            return Route::Fallback;
        }
        match Intent::from_category(prediction.category) {
            Some(intent) => Route::Pool(intent),
            None => Route::Unrecognized(prediction.category),
        }
    }

    /// Produce the reply for one utterance
    pub async fn respond(&self, utterance: &str, prediction: Classification) -> String {
        info!(
            category = prediction.category,
            confidence = prediction.confidence,
            "Predicted intent"
        );

        match self.decide(utterance, prediction) {
            Route::IdentityOverride => self.pick(Intent::SelfIdentity),
            Route::Fallback => self.fallback.respond(utterance).await,
            Route::Pool(intent) => self.pick(intent),
            Route::Unrecognized(category) => {
                warn!(category, "Prediction has no response pool");
                unrecognized_reply(category)
            }
        }
    }

    fn pick(&self, intent: Intent) -> String {
        match self.pools.pick(intent) {
            Some(reply) => reply.to_string(),
            None => unrecognized_reply(intent.category()),
        }
    }
}
