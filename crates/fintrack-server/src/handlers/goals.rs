//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use fintrack_core::models::{GoalStatus, NewSavingsGoal, SavingsGoal};

/// Request body for manual goal progress updates
#[derive(Debug, Deserialize)]
pub struct GoalProgressRequest {
    pub current_amount: f64,
}

/// Request body for goal status changes
#[derive(Debug, Deserialize)]
pub struct GoalStatusRequest {
    pub status: GoalStatus,
}

/// GET /api/goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<SavingsGoal>>, AppError> {
    Ok(Json(state.db.list_goals(user.0.id)?))
}

/// POST /api/goals
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<NewSavingsGoal>,
) -> Result<Json<SavingsGoal>, AppError> {
    Ok(Json(state.db.add_goal(user.0.id, &body)?))
}

/// GET /api/goals/:id
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SavingsGoal>, AppError> {
    state
        .db
        .get_goal(user.0.id, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Goal not found"))
}

/// PUT /api/goals/:id/progress - Set the accumulated amount
pub async fn update_goal_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<GoalProgressRequest>,
) -> Result<Json<SavingsGoal>, AppError> {
    Ok(Json(
        state
            .db
            .update_goal_progress(user.0.id, id, body.current_amount)?,
    ))
}

/// PUT /api/goals/:id/status
pub async fn set_goal_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<GoalStatusRequest>,
) -> Result<Json<SavingsGoal>, AppError> {
    state.db.set_goal_status(user.0.id, id, body.status)?;
    state
        .db
        .get_goal(user.0.id, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Goal not found"))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_goal(user.0.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
