//! Admin handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::info;

use crate::{AppError, AppState, CurrentUser};
use fintrack_core::models::{User, UserBalance};

/// GET /api/admin/users - Every non-admin user with their signed balance
pub async fn admin_list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<UserBalance>>, AppError> {
    user.require_admin()?;
    Ok(Json(state.db.list_user_balances()?))
}

/// POST /api/admin/users/:id/toggle - Flip a user's active flag
///
/// Deactivation revokes the target's sessions. Accounts are never deleted;
/// their ledgers stay intact.
pub async fn admin_toggle_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    user.require_admin()?;

    let target = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    if target.is_admin {
        return Err(AppError::forbidden("Cannot deactivate an admin account"));
    }

    let activate = !target.active;
    state.db.set_user_active(id, activate)?;
    if !activate {
        state.db.revoke_user_sessions(id)?;
    }
    info!(
        admin = %user.0.username,
        target = %target.username,
        active = activate,
        "User active flag toggled"
    );

    let updated = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(updated))
}
