//! Ledger aggregation: summaries, breakdowns, time-based patterns

use chrono::NaiveDateTime;
use rusqlite::params;

use super::{column_enum, Database};
use crate::error::Result;
use crate::models::{
    CategoryBreakdown, CategoryTotal, HourlyAverage, MonthlyRollup, PeriodSummary, SummaryWindow,
    TransactionType,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

impl Database {
    /// Per-category totals for one transaction type, largest first
    pub fn category_totals(
        &self,
        user_id: i64,
        kind: TransactionType,
    ) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) AS total
             FROM transactions
             WHERE user_id = ? AND type = ?
             GROUP BY category
             ORDER BY total DESC, category ASC",
        )?;
        let totals = stmt
            .query_map(params![user_id, kind.as_str()], |row| {
                let category_str: String = row.get(0)?;
                Ok(CategoryTotal {
                    category: column_enum(0, &category_str)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(totals)
    }

    /// Income/expense rollup over one summary window ending at `now`
    ///
    /// Empty windows produce all zeros and an empty breakdown.
    pub fn period_summary(
        &self,
        user_id: i64,
        window: SummaryWindow,
        now: NaiveDateTime,
    ) -> Result<PeriodSummary> {
        let (start, end) = window.range(now);
        let start_s = start.format(DATETIME_FMT).to_string();
        let end_s = end.format(DATETIME_FMT).to_string();
        let conn = self.conn()?;

        let (income, expenses, income_count, expense_count): (f64, f64, i64, i64) = conn
            .query_row(
                "SELECT COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN type = 'income' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN type = 'expense' THEN 1 ELSE 0 END), 0)
                 FROM transactions
                 WHERE user_id = ? AND date >= ? AND date <= ?",
                params![user_id, start_s, end_s],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        let mut stmt = conn.prepare(
            "SELECT category, type, SUM(amount) AS total
             FROM transactions
             WHERE user_id = ? AND date >= ? AND date <= ?
             GROUP BY category, type
             ORDER BY total DESC, category ASC",
        )?;
        let categories = stmt
            .query_map(params![user_id, start_s, end_s], |row| {
                let category_str: String = row.get(0)?;
                let kind_str: String = row.get(1)?;
                Ok(CategoryBreakdown {
                    category: column_enum(0, &category_str)?,
                    kind: column_enum(1, &kind_str)?,
                    total: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(PeriodSummary {
            income,
            expenses,
            income_count,
            expense_count,
            savings: income - expenses,
            categories,
        })
    }

    /// Average expense amount per hour of day
    ///
    /// Hours with no expenses are absent from the result.
    pub fn hourly_pattern(&self, user_id: i64) -> Result<Vec<HourlyAverage>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT strftime('%H', date) AS hour, COUNT(*), AVG(amount)
             FROM transactions
             WHERE user_id = ? AND type = 'expense'
             GROUP BY hour
             ORDER BY hour",
        )?;
        let pattern = stmt
            .query_map(params![user_id], |row| {
                Ok(HourlyAverage {
                    hour: row.get(0)?,
                    count: row.get(1)?,
                    avg_amount: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(pattern)
    }

    /// Income and expense sums per calendar month, newest first, last 12
    pub fn monthly_rollup(&self, user_id: i64) -> Result<Vec<MonthlyRollup>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT strftime('%Y-%m', date) AS month,
                    COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0)
             FROM transactions
             WHERE user_id = ?
             GROUP BY month
             ORDER BY month DESC
             LIMIT 12",
        )?;
        let rollup = stmt
            .query_map(params![user_id], |row| {
                Ok(MonthlyRollup {
                    month: row.get(0)?,
                    income: row.get(1)?,
                    expenses: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rollup)
    }
}
