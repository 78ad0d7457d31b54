pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::preferences::handlers as preferences;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless API
        .route("/api/v1/roles", get(analysis::handle_roles))
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/analyze/report", post(analysis::handle_render_report))
        // Session API
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/start", post(sessions::handle_start))
        .route("/api/v1/sessions/:id/home", post(sessions::handle_home))
        .route("/api/v1/sessions/:id/text", put(sessions::handle_edit_text))
        .route("/api/v1/sessions/:id/target", put(sessions::handle_set_target))
        .route("/api/v1/sessions/:id/upload", post(sessions::handle_upload))
        .route("/api/v1/sessions/:id/submit", post(sessions::handle_submit))
        .route("/api/v1/sessions/:id/reset", post(sessions::handle_reset))
        .route(
            "/api/v1/sessions/:id/report",
            get(sessions::handle_session_report),
        )
        // Preferences
        .route(
            "/api/v1/preferences/theme",
            get(preferences::handle_get_theme).put(preferences::handle_set_theme),
        )
        .route(
            "/api/v1/preferences/theme/toggle",
            post(preferences::handle_toggle_theme),
        )
        .layer(upload_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::models::fixtures::{sample_analysis, ANALYSIS_JSON};
    use crate::analysis::requester::fakes::FixedRequester;
    use crate::analysis::requester::{AnalysisError, AnalysisRequester};
    use crate::config::Config;
    use crate::extraction::DocumentExtractor;
    use crate::preferences::PreferenceStore;

    const BOUNDARY: &str = "optimuscv-test-boundary";

    async fn test_app(
        requester: Arc<dyn AnalysisRequester>,
    ) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            preferences_path: dir.path().join("prefs.json"),
            ..Config::default()
        };
        let preferences = PreferenceStore::load(config.preferences_path.clone()).await;
        let state = AppState::new(config, Arc::new(DocumentExtractor), requester, preferences);
        (build_router(state), dir)
    }

    async fn ok_app() -> (Router, tempfile::TempDir) {
        test_app(Arc::new(FixedRequester::new(Ok(sample_analysis())))).await
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(uri: &str, filename: &str, mime: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {mime}\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn send_text(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn new_session(app: &Router) -> String {
        let (status, body) = send(app, empty_request("POST", "/api/v1/sessions")).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let (app, _dir) = ok_app().await;
        let (status, body) = send(&app, empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["analysis_configured"], false);
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_roles_lists_catalogue_and_levels() {
        let (app, _dir) = ok_app().await;
        let (status, body) = send(&app, empty_request("GET", "/api/v1/roles")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["roles"][0]["title"], "Software Engineer");
        assert_eq!(body["custom_role"], "Custom");
        assert_eq!(body["experience_levels"][0]["value"], "FRESHER");
    }

    #[tokio::test]
    async fn test_extract_plain_text_upload() {
        let (app, _dir) = ok_app().await;
        let request = multipart_request("/api/v1/extract", "cv.md", "text/markdown", "# Jane Doe");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "# Jane Doe");
        assert_eq!(body["kind"], "plain_text");
    }

    #[tokio::test]
    async fn test_extract_empty_file_is_bad_request() {
        let (app, _dir) = ok_app().await;
        let request = multipart_request("/api/v1/extract", "cv.txt", "text/plain", "   ");
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMPTY_DOCUMENT");
    }

    #[tokio::test]
    async fn test_analyze_returns_result_payload() {
        let (app, _dir) = ok_app().await;
        let request = json_request(
            "POST",
            "/api/v1/analyze",
            json!({
                "resumeText": "Experienced engineer...",
                "targetRole": "Backend Developer",
                "experienceLevel": "SENIOR"
            }),
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let expected: Value =
            serde_json::to_value(serde_json::from_str::<crate::analysis::AnalysisResult>(ANALYSIS_JSON).unwrap())
                .unwrap();
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_analyze_rejects_blank_resume_without_calling_engine() {
        let requester = Arc::new(FixedRequester::new(Ok(sample_analysis())));
        let (app, _dir) = test_app(requester.clone()).await;
        let request = json_request(
            "POST",
            "/api/v1/analyze",
            json!({"resumeText": "  ", "targetRole": "Data Scientist"}),
        );
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(requester.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_surfaces_configuration_error() {
        let requester = Arc::new(FixedRequester::new(Err(AnalysisError::Configuration(
            "API key is missing".to_string(),
        ))));
        let (app, _dir) = test_app(requester).await;
        let request = json_request(
            "POST",
            "/api/v1/analyze",
            json!({"resumeText": "resume", "targetRole": "Data Scientist"}),
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_render_report_endpoint_returns_markdown() {
        let (app, _dir) = ok_app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(ANALYSIS_JSON))
            .unwrap();
        let (status, text) = send_text(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("## Overall ATS Score: 78%"));
    }

    #[tokio::test]
    async fn test_render_report_rejects_out_of_range_scores() {
        let (app, _dir) = ok_app().await;
        let mut analysis: Value = serde_json::from_str(ANALYSIS_JSON).unwrap();
        analysis["breakdown"]["keywordMatch"] = json!(140);
        let request = json_request("POST", "/api/v1/analyze/report", analysis);
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("keywordMatch"));
    }

    #[tokio::test]
    async fn test_session_happy_path() {
        let (app, _dir) = ok_app().await;
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        let (_, body) = send(&app, empty_request("POST", &format!("{base}/start"))).await;
        assert_eq!(body["view"], "upload");

        let upload = multipart_request(
            &format!("{base}/upload"),
            "cv.txt",
            "text/plain",
            "Experienced engineer...",
        );
        let (status, body) = send(&app, upload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_text"], "Experienced engineer...");
        assert_eq!(body["parsing"], false);

        let target = json_request(
            "PUT",
            &format!("{base}/target"),
            json!({"role": "Custom", "custom_role": "SRE", "experience_level": "JUNIOR"}),
        );
        let (_, body) = send(&app, target).await;
        assert_eq!(body["custom_role"], "SRE");
        assert_eq!(body["experience_level"], "JUNIOR");

        let (status, body) = send(&app, empty_request("POST", &format!("{base}/submit"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "result");
        assert_eq!(body["analysis"]["atsScore"], 78.0);

        let (status, report) =
            send_text(&app, empty_request("GET", &format!("{base}/report"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(report.contains("### Rejection Risks"));

        let (_, body) = send(&app, empty_request("POST", &format!("{base}/reset"))).await;
        assert_eq!(body["view"], "landing");
        assert!(body["analysis"].is_null());
        assert_eq!(body["resume_text"], "");
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_session_submit_without_text_sets_validation_message() {
        let (app, _dir) = ok_app().await;
        let id = new_session(&app).await;
        send(&app, empty_request("POST", &format!("/api/v1/sessions/{id}/start"))).await;

        let (status, body) = send(
            &app,
            empty_request("POST", &format!("/api/v1/sessions/{id}/submit")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "upload");
        assert_eq!(body["error"], "Resume content is required.");
    }

    #[tokio::test]
    async fn test_session_failed_analysis_returns_to_upload() {
        let requester = Arc::new(FixedRequester::new(Err(AnalysisError::ServiceUnavailable(
            "model not reachable".to_string(),
        ))));
        let (app, _dir) = test_app(requester).await;
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");
        send(&app, empty_request("POST", &format!("{base}/start"))).await;
        send(
            &app,
            json_request("PUT", &format!("{base}/text"), json!({"text": "resume"})),
        )
        .await;

        let (status, body) = send(&app, empty_request("POST", &format!("{base}/submit"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "upload");
        assert!(body["error"].as_str().unwrap().contains("model not reachable"));

        let (status, _) = send(&app, empty_request("GET", &format!("{base}/report"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_editing_on_landing_is_conflict() {
        let (app, _dir) = ok_app().await;
        let id = new_session(&app).await;
        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/sessions/{id}/text"),
                json!({"text": "resume"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _dir) = ok_app().await;
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (app, _dir) = ok_app().await;
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");
        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_theme_preference_round_trip() {
        let (app, _dir) = ok_app().await;
        let (_, body) = send(&app, empty_request("GET", "/api/v1/preferences/theme")).await;
        assert_eq!(body["theme"], "light");

        let (status, body) = send(
            &app,
            json_request("PUT", "/api/v1/preferences/theme", json!({"theme": "dark"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "dark");

        let (_, body) = send(
            &app,
            empty_request("POST", "/api/v1/preferences/theme/toggle"),
        )
        .await;
        assert_eq!(body["theme"], "light");
    }
}
