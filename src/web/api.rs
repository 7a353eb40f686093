// src/web/api.rs
// Operational endpoints

use axum::{Json, extract::State, response::IntoResponse};

use crate::web::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let router = state.pipeline.router();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "fallback": router.fallback_available(),
        "threshold": router.threshold(),
    }))
}
