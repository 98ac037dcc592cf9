//! Report handlers: summaries, breakdowns, time-based patterns

use std::sync::Arc;

use axum::{extract::{Query, State}, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, CurrentUser};
use fintrack_core::models::{
    CategoryTotal, HourlyAverage, MonthlyRollup, PeriodSummary, SummaryWindow, TransactionType,
};

/// Query parameters for the period summary
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default = "default_window")]
    pub window: SummaryWindow,
}

fn default_window() -> SummaryWindow {
    SummaryWindow::Monthly
}

/// Query parameters for category totals
#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: TransactionType,
}

fn default_kind() -> TransactionType {
    TransactionType::Expense
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// GET /api/reports/summary?window= - Income/expense rollup for one window
pub async fn report_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SummaryQuery>,
) -> Result<Json<PeriodSummary>, AppError> {
    let now = chrono::Local::now().naive_local();
    Ok(Json(state.db.period_summary(user.0.id, params.window, now)?))
}

/// GET /api/reports/categories?type= - Per-category totals, largest first
pub async fn report_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<CategoriesQuery>,
) -> Result<Json<Vec<CategoryTotal>>, AppError> {
    Ok(Json(state.db.category_totals(user.0.id, params.kind)?))
}

/// GET /api/reports/hourly - Average expense amount per hour of day
pub async fn report_hourly(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<HourlyAverage>>, AppError> {
    Ok(Json(state.db.hourly_pattern(user.0.id)?))
}

/// GET /api/reports/monthly - Last 12 calendar months, newest first
pub async fn report_monthly(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<MonthlyRollup>>, AppError> {
    Ok(Json(state.db.monthly_rollup(user.0.id)?))
}

/// GET /api/balance - Signed total over the whole ledger
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.db.total_balance(user.0.id)?;
    Ok(Json(BalanceResponse { balance }))
}
