// src/web/mod.rs
// HTTP surface: chat page, message endpoint, health and static files

pub mod api;
pub mod chat;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(chat::index))
        .route("/get_response", post(chat::get_response))
        .route("/health", get(api::health));

    if let Some(dir) = &state.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
