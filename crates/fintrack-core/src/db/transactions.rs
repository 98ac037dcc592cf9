//! Transaction operations

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{column_enum, parse_naive_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

impl Database {
    /// Record a transaction for a user
    pub fn add_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate().map_err(Error::InvalidData)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (user_id, date, description, amount, category, type, payment_method, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                tx.date.format(DATETIME_FMT).to_string(),
                tx.description.trim(),
                tx.amount,
                tx.category.as_str(),
                tx.kind.as_str(),
                tx.payment_method.as_str(),
                tx.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(user_id, id, "Transaction recorded");

        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {} after insert", id)))
    }

    /// Get one transaction, owner-checked
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                "SELECT id, user_id, date, description, amount, category, type, payment_method, notes
                 FROM transactions WHERE id = ? AND user_id = ?",
                params![id, user_id],
                row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// List all of a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, date, description, amount, category, type, payment_method, notes
             FROM transactions WHERE user_id = ?
             ORDER BY date DESC, id DESC",
        )?;
        let txs = stmt
            .query_map(params![user_id], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    /// The N most recent transactions for a user
    pub fn recent_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, date, description, amount, category, type, payment_method, notes
             FROM transactions WHERE user_id = ?
             ORDER BY date DESC, id DESC
             LIMIT ?",
        )?;
        let txs = stmt
            .query_map(params![user_id, limit], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    /// Case-insensitive text search across description, category and notes
    pub fn search_transactions(&self, user_id: i64, query: &str) -> Result<Vec<Transaction>> {
        let pattern = format!("%{}%", query.trim());
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, date, description, amount, category, type, payment_method, notes
             FROM transactions
             WHERE user_id = ?
               AND (description LIKE ? COLLATE NOCASE
                    OR category LIKE ? COLLATE NOCASE
                    OR notes LIKE ? COLLATE NOCASE)
             ORDER BY date DESC, id DESC
             LIMIT 10",
        )?;
        let txs = stmt
            .query_map(
                params![user_id, pattern, pattern, pattern],
                row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    /// Replace a transaction's fields, owner-checked
    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        tx: &NewTransaction,
    ) -> Result<Transaction> {
        tx.validate().map_err(Error::InvalidData)?;
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE transactions
             SET date = ?, description = ?, amount = ?, category = ?, type = ?, payment_method = ?, notes = ?
             WHERE id = ? AND user_id = ?",
            params![
                tx.date.format(DATETIME_FMT).to_string(),
                tx.description.trim(),
                tx.amount,
                tx.category.as_str(),
                tx.kind.as_str(),
                tx.payment_method.as_str(),
                tx.notes,
                id,
                user_id,
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        self.get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Delete a transaction, owner-checked
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// Signed total balance: SUM(income) - SUM(expense)
    pub fn total_balance(&self, user_id: i64) -> Result<f64> {
        let conn = self.conn()?;
        let balance: f64 = conn.query_row(
            "SELECT COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE -amount END), 0)
             FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(balance)
    }
}

/// Column order: id, user_id, date, description, amount, category, type,
///               payment_method, notes
///
/// Rejects rows whose category/type/payment_method fall outside the fixed
/// enums instead of coercing them.
pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(2)?;
    let category_str: String = row.get(5)?;
    let kind_str: String = row.get(6)?;
    let payment_method_str: String = row.get(7)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: parse_naive_datetime(&date_str),
        description: row.get(3)?,
        amount: row.get(4)?,
        category: column_enum(5, &category_str)?,
        kind: column_enum(6, &kind_str)?,
        payment_method: column_enum(7, &payment_method_str)?,
        notes: row.get(8)?,
    })
}
