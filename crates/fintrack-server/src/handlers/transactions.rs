//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use fintrack_core::export::transactions_to_csv;
use fintrack_core::models::{NewTransaction, Transaction};

/// Query parameters for recent transactions
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: i64,
}

fn default_recent_limit() -> i64 {
    10
}

/// Query parameters for transaction search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/transactions - All of the user's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.db.list_transactions(user.0.id)?))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(state.db.add_transaction(user.0.id, &body)?))
}

/// GET /api/transactions/recent - The N most recent transactions
pub async fn recent_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let limit = params.limit.clamp(1, 100);
    Ok(Json(state.db.recent_transactions(user.0.id, limit)?))
}

/// GET /api/transactions/search?q= - Text search, capped at 10 hits
pub async fn search_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    if params.q.trim().is_empty() {
        return Ok(Json(vec![]));
    }
    Ok(Json(state.db.search_transactions(user.0.id, &params.q)?))
}

/// GET /api/transactions/export - Full ledger as CSV
pub async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    let transactions = state.db.list_transactions(user.0.id)?;
    let csv = transactions_to_csv(&transactions)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    state
        .db
        .get_transaction(user.0.id, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// PUT /api/transactions/:id
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<NewTransaction>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(state.db.update_transaction(user.0.id, id, &body)?))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(user.0.id, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
