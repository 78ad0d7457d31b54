//! Analysis requester: resume text + role + level → validated `AnalysisResult`.
//!
//! `AppState` holds an `Arc<dyn AnalysisRequester>`; the default backend is
//! `LlmAnalysisRequester` over any `StructuredGenerator` (Gemini in production).

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::prompts::{analysis_response_schema, build_analysis_prompt};
use crate::llm_client::{strip_json_fences, LlmError, StructuredGenerator};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Analysis service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("The analysis engine returned an unreadable response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Validation(String),
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => AnalysisError::Configuration(e.to_string()),
            LlmError::EmptyContent => AnalysisError::MalformedResponse(e.to_string()),
            LlmError::Api { status: 404, .. } => AnalysisError::ServiceUnavailable(format!(
                "the configured model is not reachable, check your API key permissions ({e})"
            )),
            LlmError::Http(_) | LlmError::Api { .. } => {
                AnalysisError::ServiceUnavailable(e.to_string())
            }
        }
    }
}

/// Boundary to whatever produces the evaluation.
#[async_trait]
pub trait AnalysisRequester: Send + Sync {
    async fn request_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError>;
}

pub struct LlmAnalysisRequester {
    generator: Arc<dyn StructuredGenerator>,
}

impl LlmAnalysisRequester {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl AnalysisRequester for LlmAnalysisRequester {
    async fn request_analysis(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        if request.resume_text.trim().is_empty() {
            return Err(AnalysisError::Validation(
                "Resume content is required.".to_string(),
            ));
        }

        info!(
            role = %request.target_role,
            level = ?request.experience_level,
            chars = request.resume_text.len(),
            "requesting resume analysis"
        );

        let prompt = build_analysis_prompt(request);
        let raw = self
            .generator
            .generate(&prompt, &analysis_response_schema())
            .await
            .map_err(|e| {
                warn!("analysis request failed: {e}");
                AnalysisError::from(e)
            })?;

        parse_analysis(&raw)
    }
}

/// Parses a model reply, tolerating surrounding code fences, and checks scores.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let analysis: AnalysisResult = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
    analysis
        .validate_scores()
        .map_err(AnalysisError::MalformedResponse)?;
    Ok(analysis)
}
