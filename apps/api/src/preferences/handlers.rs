use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::preferences::Theme;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// GET /api/v1/preferences/theme
pub async fn handle_get_theme(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.preferences.theme().await,
    })
}

/// PUT /api/v1/preferences/theme
pub async fn handle_set_theme(
    State(state): State<AppState>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, AppError> {
    let theme = state.preferences.set_theme(body.theme).await?;
    Ok(Json(ThemeBody { theme }))
}

/// POST /api/v1/preferences/theme/toggle
pub async fn handle_toggle_theme(
    State(state): State<AppState>,
) -> Result<Json<ThemeBody>, AppError> {
    let theme = state.preferences.toggle_theme().await?;
    Ok(Json(ThemeBody { theme }))
}
