//! Session token operations
//!
//! Tokens are 32 random bytes, handed to the client hex-encoded and stored
//! only as SHA-256 digests. Validation hashes the presented token and
//! compares digests in constant time.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Session lifetime in hours
pub const SESSION_TTL_HOURS: i64 = 24;

fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

impl Database {
    /// Issue a new session for a user, returning the plaintext token
    ///
    /// The plaintext token exists only in this return value; the database
    /// keeps its digest.
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let digest = token_digest(&token);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (user_id, token_hash, expires_at)
             VALUES (?, ?, datetime('now', ?))",
            params![user_id, digest, format!("+{} hours", SESSION_TTL_HOURS)],
        )?;
        debug!(user_id, "Session created");
        Ok(token)
    }

    /// Validate a session token, returning the owning user
    ///
    /// Expired sessions and deactivated users both fail validation.
    pub fn validate_session(&self, token: &str) -> Result<Option<User>> {
        let digest = token_digest(token);
        let conn = self.conn()?;

        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT user_id, token_hash FROM sessions
                 WHERE token_hash = ? AND expires_at > datetime('now')",
                params![digest],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((user_id, stored)) = row else {
            return Ok(None);
        };
        if !bool::from(digest.as_bytes().ct_eq(stored.as_bytes())) {
            return Ok(None);
        }

        match self.get_user(user_id)? {
            Some(user) if user.active => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    /// Revoke one session by its plaintext token
    pub fn revoke_session(&self, token: &str) -> Result<()> {
        let digest = token_digest(token);
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![digest],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound("Session".to_string()));
        }
        Ok(())
    }

    /// Revoke every session belonging to a user
    pub fn revoke_user_sessions(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        Ok(conn.execute(
            "DELETE FROM sessions WHERE user_id = ?",
            params![user_id],
        )?)
    }

    /// Delete expired sessions, returning how many were removed
    pub fn purge_expired_sessions(&self) -> Result<usize> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= datetime('now')",
            [],
        )?;
        if purged > 0 {
            debug!(purged, "Expired sessions purged");
        }
        Ok(purged)
    }
}
