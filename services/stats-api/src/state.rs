//! Shared application state for the statistic endpoints.

use std::sync::Arc;

use ephemeral_engine::ProcessingEngine;

use crate::config::ApiConfig;

/// State injected into every handler.
pub struct AppState {
    /// Handle to the external processing engine.
    pub engine: Arc<dyn ProcessingEngine>,

    /// Endpoint configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(engine: Arc<dyn ProcessingEngine>, config: ApiConfig) -> Self {
        Self { engine, config }
    }
}
