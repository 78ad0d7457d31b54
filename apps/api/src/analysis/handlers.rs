//! Axum route handlers for stateless analysis.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::analysis::models::{AnalysisRequest, AnalysisResult, ExperienceLevel};
use crate::analysis::report::render_report;
use crate::analysis::roles::{PredefinedRole, CUSTOM_ROLE, PREDEFINED_ROLES};
use crate::errors::AppError;
use crate::session::state_machine::EMPTY_RESUME_MESSAGE;
use crate::state::AppState;

pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

#[derive(Debug, Serialize)]
pub struct ExperienceLevelOption {
    pub value: ExperienceLevel,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: &'static [PredefinedRole],
    pub custom_role: &'static str,
    pub experience_levels: Vec<ExperienceLevelOption>,
}

/// GET /api/v1/roles
pub async fn handle_roles() -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: PREDEFINED_ROLES,
        custom_role: CUSTOM_ROLE,
        experience_levels: ExperienceLevel::ALL
            .iter()
            .map(|&value| ExperienceLevelOption {
                value,
                label: value.label(),
            })
            .collect(),
    })
}

/// POST /api/v1/analyze
///
/// One-shot analysis without a session. Same validation as a session submit.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_RESUME_MESSAGE.to_string()));
    }
    let result = state.requester.request_analysis(&request).await?;
    Ok(Json(result))
}

/// POST /api/v1/analyze/report
///
/// Renders a previously returned analysis as a Markdown report. Scores are
/// range-checked the same way as engine replies.
pub async fn handle_render_report(
    Json(analysis): Json<AnalysisResult>,
) -> Result<Response, AppError> {
    analysis.validate_scores().map_err(AppError::Validation)?;
    Ok(markdown_response(render_report(
        &analysis,
        chrono::Local::now().date_naive(),
    )))
}

pub fn markdown_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)], body).into_response()
}
