//! Savings goal operations

use rusqlite::{params, OptionalExtension};

use super::{column_enum, Database};
use crate::error::{Error, Result};
use crate::models::{GoalStatus, NewSavingsGoal, SavingsGoal};

impl Database {
    /// Create a goal; starts active with no progress
    pub fn add_goal(&self, user_id: i64, goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        goal.validate().map_err(Error::InvalidData)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO savings_goals (user_id, name, target_amount, current_amount, deadline, status)
             VALUES (?, ?, ?, 0, ?, 'active')",
            params![
                user_id,
                goal.name.trim(),
                goal.target_amount,
                goal.deadline.map(|d| d.to_string()),
            ],
        )?;
        let id = conn.last_insert_rowid();
        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {} after insert", id)))
    }

    /// Get one goal, owner-checked
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<SavingsGoal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                "SELECT id, user_id, name, target_amount, current_amount, deadline, status
                 FROM savings_goals WHERE id = ? AND user_id = ?",
                params![id, user_id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// List a user's goals, active first, then by deadline
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, target_amount, current_amount, deadline, status
             FROM savings_goals WHERE user_id = ?
             ORDER BY CASE status WHEN 'active' THEN 0 ELSE 1 END,
                      deadline IS NULL, deadline, id",
        )?;
        let goals = stmt
            .query_map(params![user_id], row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Set a goal's accumulated amount
    ///
    /// Progress is manual; reaching the target marks the goal completed.
    pub fn update_goal_progress(&self, user_id: i64, id: i64, amount: f64) -> Result<SavingsGoal> {
        if amount < 0.0 {
            return Err(Error::InvalidData(
                "Goal progress must not be negative".to_string(),
            ));
        }
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE savings_goals
             SET current_amount = ?,
                 status = CASE WHEN ? >= target_amount AND status = 'active'
                               THEN 'completed' ELSE status END
             WHERE id = ? AND user_id = ?",
            params![amount, amount, id, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))
    }

    /// Change a goal's lifecycle status
    pub fn set_goal_status(&self, user_id: i64, id: i64, status: GoalStatus) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE savings_goals SET status = ? WHERE id = ? AND user_id = ?",
            params![status.as_str(), id, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        Ok(())
    }

    /// Delete a goal, owner-checked
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM savings_goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        Ok(())
    }
}

/// Column order: id, user_id, name, target_amount, current_amount, deadline, status
fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<SavingsGoal> {
    let deadline_str: Option<String> = row.get(5)?;
    let status_str: String = row.get(6)?;
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: deadline_str
            .as_deref()
            .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
        status: column_enum(6, &status_str)?,
    })
}
