//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::handlers::markdown_response;
use crate::analysis::models::ExperienceLevel;
use crate::analysis::report::render_report;
use crate::errors::AppError;
use crate::extraction::handlers::read_upload;
use crate::session::state_machine::{Action, SessionState};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub state: SessionState,
}

#[derive(Debug, Deserialize)]
pub struct EditTextRequest {
    pub text: String,
}

/// Any subset of the target selectors; absent fields are left as they are.
#[derive(Debug, Default, Deserialize)]
pub struct TargetRequest {
    pub role: Option<String>,
    pub custom_role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
}

impl TargetRequest {
    fn into_actions(self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(role) = self.role {
            actions.push(Action::SelectRole(role));
        }
        if let Some(custom) = self.custom_role {
            actions.push(Action::SetCustomRole(custom));
        }
        if let Some(level) = self.experience_level {
            actions.push(Action::SelectExperienceLevel(level));
        }
        actions
    }
}

fn respond(session_id: Uuid, state: SessionState) -> Json<SessionResponse> {
    Json(SessionResponse { session_id, state })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (id, session) = state.sessions.create().await;
    (StatusCode::CREATED, respond(id, session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(respond(id, session))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.dispatch(id, Action::GetStarted).await?;
    Ok(respond(id, session))
}

/// POST /api/v1/sessions/:id/home
pub async fn handle_home(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.dispatch(id, Action::GoHome).await?;
    Ok(respond(id, session))
}

/// PUT /api/v1/sessions/:id/text
pub async fn handle_edit_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditTextRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.dispatch(id, Action::EditText(req.text)).await?;
    Ok(respond(id, session))
}

/// PUT /api/v1/sessions/:id/target
pub async fn handle_set_target(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TargetRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut session = state.sessions.get(id).await?;
    for action in req.into_actions() {
        session = state.sessions.dispatch(id, action).await?;
    }
    Ok(respond(id, session))
}

/// POST /api/v1/sessions/:id/upload
///
/// Multipart `file` field. Extraction failures land in the session's `error`,
/// not in the HTTP status.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SessionResponse>, AppError> {
    let document = read_upload(multipart).await?;
    let session = state.sessions.upload(id, document).await?;
    Ok(respond(id, session))
}

/// POST /api/v1/sessions/:id/submit
///
/// Runs the analysis to completion. The response carries either the `result`
/// view with the analysis or the `upload` view with an error message.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.submit(id).await?;
    Ok(respond(id, session))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.dispatch(id, Action::Reset).await?;
    Ok(respond(id, session))
}

/// GET /api/v1/sessions/:id/report
pub async fn handle_session_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state.sessions.get(id).await?;
    let analysis = session
        .analysis
        .ok_or_else(|| AppError::NotFound(format!("Session {id} has no analysis result")))?;
    Ok(markdown_response(render_report(
        &analysis,
        chrono::Local::now().date_naive(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_request_maps_present_fields_only() {
        let req: TargetRequest =
            serde_json::from_str(r#"{"custom_role": "SRE", "experience_level": "JUNIOR"}"#)
                .unwrap();
        assert_eq!(
            req.into_actions(),
            vec![
                Action::SetCustomRole("SRE".to_string()),
                Action::SelectExperienceLevel(ExperienceLevel::Junior),
            ]
        );
    }

    #[test]
    fn test_empty_target_request_is_a_no_op() {
        assert!(TargetRequest::default().into_actions().is_empty());
    }

    #[test]
    fn test_session_response_flattens_state() {
        let body = SessionResponse {
            session_id: Uuid::nil(),
            state: SessionState::default(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["view"], "landing");
        assert_eq!(value["parsing"], false);
        assert!(value["analysis"].is_null());
        assert_eq!(value["session_id"], Uuid::nil().to_string());
    }
}
