//! Authentication handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use fintrack_core::models::{CredentialUpdate, NewUser, User};

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for login and registration: the session token plus the user
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register - Register a new user and open a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state.db.create_user(&body)?;
    let token = state.db.create_session(user.id)?;
    info!(username = %user.username, "User registered");
    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/auth/login - Authenticate and open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state.db.authenticate(&body.username, &body.password)?;
    let token = state.db.create_session(user.id)?;
    info!(username = %user.username, "User logged in");
    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/auth/setup-admin - Bootstrap the first admin account
///
/// Rejected once any admin exists.
pub async fn setup_admin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUser>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state.db.setup_admin(&body)?;
    let token = state.db.create_session(user.id)?;
    info!(username = %user.username, "Admin account bootstrapped");
    Ok(Json(SessionResponse { token, user }))
}

/// POST /api/auth/logout - Revoke the presented session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    state.db.revoke_session(token)?;
    info!(username = %user.0.username, "User logged out");
    Ok(Json(SuccessResponse { success: true }))
}

/// PUT /api/me/credentials - Rotate the authenticated user's credentials
///
/// On success every existing session is revoked and a fresh token is
/// returned; the client must switch to it.
pub async fn update_credentials(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CredentialUpdate>,
) -> Result<Json<SessionResponse>, AppError> {
    let updated = state.db.update_credentials(user.0.id, &body)?;
    state.db.revoke_user_sessions(updated.id)?;
    let token = state.db.create_session(updated.id)?;
    info!(username = %updated.username, "Credentials rotated");
    Ok(Json(SessionResponse {
        token,
        user: updated,
    }))
}

/// GET /api/me - The authenticated user
pub async fn get_me(
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<User>, AppError> {
    Ok(Json((*user.0).clone()))
}
