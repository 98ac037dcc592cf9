//! User settings handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, CurrentUser};
use fintrack_core::models::UserSettings;

/// GET /api/settings
pub async fn get_settings(
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(user.0.settings.clone()))
}

/// PUT /api/settings - Replace the user's settings wholesale
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UserSettings>,
) -> Result<Json<UserSettings>, AppError> {
    state.db.update_user_settings(user.0.id, &body)?;
    Ok(Json(body))
}
