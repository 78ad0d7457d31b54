use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version, whether the analysis
/// engine has a credential to work with, and the live session count.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "optimuscv-api",
        "analysis_configured": state.config.gemini_api_key.is_some(),
        "active_sessions": state.sessions.active_sessions().await,
    }))
}
