// src/web/chat.rs
// Chat page and message endpoint

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Html,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::ChatError;
use crate::pipeline::error_reply;
use crate::web::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// GET / - static chat page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /get_response - always 200 with a `response` field, even on failure
pub async fn get_response(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = ChatError::InvalidRequest(rejection.body_text());
            warn!(error = %err, "Rejected chat request");
            return Json(ChatResponse::new(format!("Richiesta non valida: {}", rejection.body_text())));
        }
    };

    // Run on its own task so a panic anywhere in the pipeline stays contained
    let pipeline = Arc::clone(&state.pipeline);
    let task = tokio::spawn(async move { pipeline.reply(&request.message).await });

    match task.await {
        Ok(reply) => Json(ChatResponse::new(reply)),
        Err(join_err) => {
            let err = ChatError::from(join_err);
            error!(error = %err, "Chat pipeline task failed");
            Json(ChatResponse::new(error_reply(&err)))
        }
    }
}
