//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use fintrack_core::models::{Budget, BudgetStatus, NewBudget};

/// GET /api/budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Budget>>, AppError> {
    Ok(Json(state.db.list_budgets(user.0.id)?))
}

/// POST /api/budgets - Create a budget for the period containing today
///
/// Overlapping budgets for the same category are rejected with 409.
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.db.add_budget(user.0.id, &body, today)?))
}

/// GET /api/budgets/status - Every budget joined with its matching expenses
pub async fn budget_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<BudgetStatus>>, AppError> {
    Ok(Json(state.db.budget_status(user.0.id)?))
}

/// PUT /api/budgets/:id - Edit a budget, recomputing its period dates
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<NewBudget>,
) -> Result<Json<Budget>, AppError> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.db.update_budget(user.0.id, id, &body, today)?))
}

/// DELETE /api/budgets/:id
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_budget(user.0.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
