use std::sync::Arc;
use vendormatch_common::AppConfig;
use vendormatch_matcher::MatchEngine;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Matching engine with its prebuilt catalog
    pub engine: Arc<MatchEngine>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, engine: MatchEngine) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
        }
    }
}
