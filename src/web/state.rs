// src/web/state.rs
// Web server state

use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::ChatPipeline;

/// Shared application state, created once at startup
#[derive(Clone)]
pub struct AppState {
    /// Classify-then-route pipeline (read-only after load)
    pub pipeline: Arc<ChatPipeline>,

    /// Directory served under /static, if any
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: Arc<ChatPipeline>) -> Self {
        Self {
            pipeline,
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }
}
