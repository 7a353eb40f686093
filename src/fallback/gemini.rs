// src/fallback/gemini.rs
// Google Gemini generateContent client (single-turn, text only)

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{ChatError, Result};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: &str, client: reqwest::Client) -> Self {
        Self::with_base_url(api_key, model, GEMINI_API_BASE, client)
    }

    /// Point the client at a different endpoint root
    pub fn with_base_url(api_key: String, model: &str, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key,
            // Accept both "gemini-1.5-pro-latest" and "models/gemini-1.5-pro-latest"
            model: model.trim_start_matches("models/").to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate free text for a single user prompt
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiTextPart { text: prompt }],
            }],
        };

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        debug!(request_id = %request_id, "Sending Gemini request");

        // Gemini authenticates via query-string key, not a Bearer header
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ChatError::Fallback(format!("Gemini API error {status}: {message}")));
        }

        let data: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Fallback(format!("Failed to parse Gemini response: {e}")))?;

        if let Some(error) = data.error {
            return Err(ChatError::Fallback(error.message));
        }

        let text = data
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ChatError::Fallback("Gemini returned no text".to_string()))?;

        info!(
            request_id = %request_id,
            duration_ms = start_time.elapsed().as_millis() as u64,
            response_chars = text.len(),
            "Gemini request complete"
        );

        Ok(text)
    }
}
