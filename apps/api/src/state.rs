use std::sync::Arc;

use crate::analysis::requester::AnalysisRequester;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::preferences::PreferenceStore;
use crate::session::{SessionController, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable document decoder. Default: `DocumentExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
    /// Pluggable analysis backend. Default: `LlmAnalysisRequester` over Gemini.
    pub requester: Arc<dyn AnalysisRequester>,
    /// Shares `extractor` and `requester` with the stateless endpoints.
    pub sessions: SessionController,
    pub preferences: PreferenceStore,
}

impl AppState {
    pub fn new(
        config: Config,
        extractor: Arc<dyn TextExtractor>,
        requester: Arc<dyn AnalysisRequester>,
        preferences: PreferenceStore,
    ) -> Self {
        let store = SessionStore::with_limits(config.session_idle_ttl, config.max_sessions);
        let sessions = SessionController::new(
            store,
            extractor.clone(),
            requester.clone(),
            config.reset_target,
        );
        Self {
            config,
            extractor,
            requester,
            sessions,
            preferences,
        }
    }
}
