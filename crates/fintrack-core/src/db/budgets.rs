//! Budget operations and status evaluation

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::debug;

use super::{column_enum, Database};
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetStatus, NewBudget};

impl Database {
    /// Create a budget covering the period containing `today`
    ///
    /// The overlap check and the insert run inside one IMMEDIATE transaction
    /// so two concurrent creates for the same category cannot both pass the
    /// check.
    pub fn add_budget(&self, user_id: i64, budget: &NewBudget, today: NaiveDate) -> Result<Budget> {
        budget.validate().map_err(Error::InvalidData)?;
        let (start, end) = budget.period.date_range(today);

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let overlapping: Option<i64> = tx
            .query_row(
                "SELECT id FROM budgets
                 WHERE user_id = ? AND category = ?
                   AND start_date <= ? AND end_date >= ?",
                params![
                    user_id,
                    budget.category.as_str(),
                    end.to_string(),
                    start.to_string()
                ],
                |row| row.get(0),
            )
            .optional()?;
        if overlapping.is_some() {
            return Err(Error::Conflict(format!(
                "A budget for {} already covers part of this period",
                budget.category
            )));
        }

        tx.execute(
            "INSERT INTO budgets (user_id, category, amount, period, start_date, end_date, alert_threshold)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                budget.category.as_str(),
                budget.amount,
                budget.period.as_str(),
                start.to_string(),
                end.to_string(),
                budget.alert_threshold,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(user_id, id, "Budget created");

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {} after insert", id)))
    }

    /// Replace a budget's fields, recomputing its period dates
    ///
    /// The overlap check excludes the budget being edited.
    pub fn update_budget(
        &self,
        user_id: i64,
        id: i64,
        budget: &NewBudget,
        today: NaiveDate,
    ) -> Result<Budget> {
        budget.validate().map_err(Error::InvalidData)?;
        let (start, end) = budget.period.date_range(today);

        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let overlapping: Option<i64> = tx
            .query_row(
                "SELECT id FROM budgets
                 WHERE user_id = ? AND category = ? AND id != ?
                   AND start_date <= ? AND end_date >= ?",
                params![
                    user_id,
                    budget.category.as_str(),
                    id,
                    end.to_string(),
                    start.to_string()
                ],
                |row| row.get(0),
            )
            .optional()?;
        if overlapping.is_some() {
            return Err(Error::Conflict(format!(
                "A budget for {} already covers part of this period",
                budget.category
            )));
        }

        let updated = tx.execute(
            "UPDATE budgets
             SET category = ?, amount = ?, period = ?, start_date = ?, end_date = ?, alert_threshold = ?
             WHERE id = ? AND user_id = ?",
            params![
                budget.category.as_str(),
                budget.amount,
                budget.period.as_str(),
                start.to_string(),
                end.to_string(),
                budget.alert_threshold,
                id,
                user_id,
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        tx.commit()?;

        self.get_budget(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Get one budget, owner-checked
    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                "SELECT id, user_id, category, amount, period, start_date, end_date, alert_threshold
                 FROM budgets WHERE id = ? AND user_id = ?",
                params![id, user_id],
                row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// List a user's budgets ordered by category
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, category, amount, period, start_date, end_date, alert_threshold
             FROM budgets WHERE user_id = ?
             ORDER BY category, start_date",
        )?;
        let budgets = stmt
            .query_map(params![user_id], row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    /// Delete a budget, owner-checked
    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget {}", id)));
        }
        Ok(())
    }

    /// Evaluate every budget against its matching expenses
    ///
    /// `spent` sums expenses in the same category with dates inside the
    /// budget's inclusive interval. Progress is spent/amount as a percent,
    /// clamped to 100; a zero-amount budget reports progress 0 while still
    /// reporting `spent`.
    pub fn budget_status(&self, user_id: i64) -> Result<Vec<BudgetStatus>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT b.id, b.category, b.amount, b.period, b.alert_threshold,
                    b.start_date, b.end_date,
                    COALESCE(SUM(t.amount), 0) AS spent
             FROM budgets b
             LEFT JOIN transactions t
               ON t.user_id = b.user_id
              AND t.type = 'expense'
              AND t.category = b.category
              AND date(t.date) >= b.start_date
              AND date(t.date) <= b.end_date
             WHERE b.user_id = ?
             GROUP BY b.id
             ORDER BY b.category, b.start_date",
        )?;
        let statuses = stmt
            .query_map(params![user_id], |row| {
                let category_str: String = row.get(1)?;
                let period_str: String = row.get(3)?;
                let start_str: String = row.get(5)?;
                let end_str: String = row.get(6)?;
                let amount: f64 = row.get(2)?;
                let spent: f64 = row.get(7)?;
                let progress = if amount > 0.0 {
                    (spent / amount * 100.0).min(100.0)
                } else {
                    0.0
                };
                Ok(BudgetStatus {
                    id: row.get(0)?,
                    category: column_enum(1, &category_str)?,
                    amount,
                    period: column_enum(3, &period_str)?,
                    alert_threshold: row.get(4)?,
                    start_date: parse_date(5, &start_str)?,
                    end_date: parse_date(6, &end_str)?,
                    spent,
                    progress,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(statuses)
    }
}

fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Column order: id, user_id, category, amount, period, start_date, end_date,
///               alert_threshold
fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
    let category_str: String = row.get(2)?;
    let period_str: String = row.get(4)?;
    let start_str: String = row.get(5)?;
    let end_str: String = row.get(6)?;
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: column_enum(2, &category_str)?,
        amount: row.get(3)?,
        period: column_enum(4, &period_str)?,
        start_date: parse_date(5, &start_str)?,
        end_date: parse_date(6, &end_str)?,
        alert_threshold: row.get(7)?,
    })
}
