//! Insight generation handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::{AppError, AppState, CurrentUser};
use fintrack_core::insights::{Insight, InsightEngine, RuleContext};

/// How much ledger history the rules look at
const INSIGHT_TRANSACTION_LIMIT: i64 = 100;

/// GET /api/insights - Run every rule against the user's recent activity
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Insight>>, AppError> {
    let transactions = state
        .db
        .recent_transactions(user.0.id, INSIGHT_TRANSACTION_LIMIT)?;
    let budgets = state.db.budget_status(user.0.id)?;
    let balance = state.db.total_balance(user.0.id)?;
    let today = chrono::Local::now().date_naive();

    let ctx = RuleContext::new(&transactions, &budgets, balance, today);
    let insights = InsightEngine::new().generate(&ctx);

    Ok(Json(insights))
}
