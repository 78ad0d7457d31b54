mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod preferences;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::LlmAnalysisRequester;
use crate::config::Config;
use crate::extraction::DocumentExtractor;
use crate::llm_client::GeminiClient;
use crate::preferences::PreferenceStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OptimusCV API v{}", env!("CARGO_PKG_VERSION"));

    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_base.clone(),
    )?;
    info!("LLM client initialized (model: {})", gemini.model());

    // A missing key is not fatal: extraction and sessions still work, and
    // every analysis request reports the configuration error.
    if !gemini.has_api_key() {
        warn!("GEMINI_API_KEY is not set; analysis requests will fail until it is configured");
    }

    let requester = Arc::new(LlmAnalysisRequester::new(Arc::new(gemini)));
    let extractor = Arc::new(DocumentExtractor);
    let preferences = PreferenceStore::load(config.preferences_path.clone()).await;

    let state = AppState::new(config.clone(), extractor, requester, preferences);
    let sweep_every = (config.session_idle_ttl / 4).max(Duration::from_secs(1));
    state.sessions.spawn_idle_sweeper(sweep_every);
    info!(
        "Sessions: idle TTL {}s, cap {}",
        config.session_idle_ttl.as_secs(),
        config.max_sessions
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
