//! User account operations: registration, authentication, settings

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

use super::{column_enum, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CredentialUpdate, NewUser, User, UserBalance, UserSettings};

/// Failed attempts within the window before a username is locked out
pub const LOCKOUT_MAX_FAILURES: i64 = 5;

/// Lockout window in minutes
pub const LOCKOUT_WINDOW_MINUTES: i64 = 15;

/// Check password strength: at least 8 characters with upper, lower,
/// digit and special character classes all present.
pub fn check_password_strength(password: &str) -> std::result::Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    let checks = [
        (r"[A-Z]", "an uppercase letter"),
        (r"[a-z]", "a lowercase letter"),
        (r"\d", "a digit"),
        (r#"[!@#$%^&*(),.?":{}|<>]"#, "a special character"),
    ];
    for (pattern, requirement) in checks {
        let re = regex::Regex::new(pattern).map_err(|e| e.to_string())?;
        if !re.is_match(password) {
            return Err(format!("Password must contain {}", requirement));
        }
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Password(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

impl Database {
    /// Register a new user
    ///
    /// Enforces password strength and username/email uniqueness.
    pub fn create_user(&self, new: &NewUser) -> Result<User> {
        self.create_user_with_role(new, false)
    }

    /// Register a user with an explicit admin flag
    pub fn create_user_with_role(&self, new: &NewUser, is_admin: bool) -> Result<User> {
        let username = new.username.trim();
        let email = new.email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(Error::InvalidData(
                "Username and email must not be empty".to_string(),
            ));
        }
        check_password_strength(&new.password).map_err(Error::Password)?;

        let password_hash = hash_password(&new.password)?;
        let conn = self.conn()?;

        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ? OR email = ?",
                params![username, email],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(Error::Conflict(
                "Username or email already registered".to_string(),
            ));
        }

        conn.execute(
            "INSERT INTO users (username, email, password_hash, is_admin) VALUES (?, ?, ?, ?)",
            params![username, email, password_hash, is_admin],
        )?;
        let id = conn.last_insert_rowid();
        info!(username, is_admin, "User registered");

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} after insert", id)))
    }

    /// Create the first admin account
    ///
    /// Refuses once any admin exists, so the bootstrap endpoint cannot be
    /// used to escalate later.
    pub fn setup_admin(&self, new: &NewUser) -> Result<User> {
        if self.has_admin()? {
            return Err(Error::Conflict("An admin account already exists".to_string()));
        }
        self.create_user_with_role(new, true)
    }

    /// Whether any admin account exists
    pub fn has_admin(&self) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE is_admin = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Authenticate a username/password pair
    ///
    /// Enforces the lockout window, records the attempt either way, and
    /// clears the failure history on success. Inactive users cannot log in.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        if self.is_locked_out(username)? {
            warn!(username, "Login rejected: account locked out");
            return Err(Error::Unauthorized(format!(
                "Too many failed attempts. Try again in {} minutes.",
                LOCKOUT_WINDOW_MINUTES
            )));
        }

        let user = self.get_user_by_username(username)?;
        let ok = match &user {
            Some(u) => u.active && verify_password(password, &u.password_hash),
            // Hash anyway so missing and wrong-password take similar time
            None => {
                let _ = verify_password(password, "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
                false
            }
        };

        self.record_login_attempt(username, ok)?;

        if !ok {
            return Err(Error::Unauthorized("Invalid username or password".to_string()));
        }
        // Unreachable None given ok above, but keep the error path explicit
        user.ok_or_else(|| Error::Unauthorized("Invalid username or password".to_string()))
    }

    /// Record a login attempt; success clears the failure history
    pub fn record_login_attempt(&self, username: &str, success: bool) -> Result<()> {
        let conn = self.conn()?;
        if success {
            conn.execute(
                "DELETE FROM login_attempts WHERE username = ?",
                params![username],
            )?;
        } else {
            conn.execute(
                "INSERT INTO login_attempts (username, success) VALUES (?, 0)",
                params![username],
            )?;
        }
        Ok(())
    }

    /// Whether a username has exhausted its failed attempts in the window
    pub fn is_locked_out(&self, username: &str) -> Result<bool> {
        let conn = self.conn()?;
        let failures: i64 = conn.query_row(
            "SELECT COUNT(*) FROM login_attempts
             WHERE username = ? AND success = 0
               AND attempted_at >= datetime('now', ?)",
            params![username, format!("-{} minutes", LOCKOUT_WINDOW_MINUTES)],
            |row| row.get(0),
        )?;
        Ok(failures >= LOCKOUT_MAX_FAILURES)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, password_hash, is_admin, active,
                        currency, notification_budget, notification_goals, created_at
                 FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, password_hash, is_admin, active,
                        currency, notification_budget, notification_goals, created_at
                 FROM users WHERE username = ?",
                params![username],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Rotate a user's username and/or password
    ///
    /// The current password must verify before anything changes. New
    /// usernames keep the uniqueness rule; new passwords go through the
    /// strength check.
    pub fn update_credentials(&self, user_id: i64, update: &CredentialUpdate) -> Result<User> {
        let user = self
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
        if !verify_password(&update.current_password, &user.password_hash) {
            return Err(Error::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_username = update.new_username.as_deref().map(str::trim);
        if new_username.is_none() && update.new_password.is_none() {
            return Err(Error::InvalidData(
                "No credential changes requested".to_string(),
            ));
        }

        let conn = self.conn()?;
        if let Some(username) = new_username {
            if username.is_empty() {
                return Err(Error::InvalidData("Username must not be empty".to_string()));
            }
            let taken: Option<i64> = conn
                .query_row(
                    "SELECT id FROM users WHERE username = ? AND id != ?",
                    params![username, user_id],
                    |row| row.get(0),
                )
                .optional()?;
            if taken.is_some() {
                return Err(Error::Conflict("Username already registered".to_string()));
            }
            conn.execute(
                "UPDATE users SET username = ? WHERE id = ?",
                params![username, user_id],
            )?;
        }

        if let Some(password) = &update.new_password {
            check_password_strength(password).map_err(Error::Password)?;
            let password_hash = hash_password(password)?;
            conn.execute(
                "UPDATE users SET password_hash = ? WHERE id = ?",
                params![password_hash, user_id],
            )?;
        }
        info!(user_id, "Credentials updated");

        self.get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {} after update", user_id)))
    }

    /// Replace a user's settings wholesale
    pub fn update_user_settings(&self, user_id: i64, settings: &UserSettings) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET currency = ?, notification_budget = ?, notification_goals = ?
             WHERE id = ?",
            params![
                settings.currency.as_str(),
                settings.notification_budget,
                settings.notification_goals,
                user_id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }
        Ok(())
    }

    /// Activate or deactivate a user
    ///
    /// Users are never deleted; deactivation preserves their ledger history.
    pub fn set_user_active(&self, user_id: i64, active: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET active = ? WHERE id = ?",
            params![active, user_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }
        info!(user_id, active, "User active flag changed");
        Ok(())
    }

    /// List non-admin users with their computed signed balance
    pub fn list_user_balances(&self) -> Result<Vec<UserBalance>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.email, u.active,
                    COALESCE(SUM(CASE WHEN t.type = 'income' THEN t.amount
                                      WHEN t.type = 'expense' THEN -t.amount
                                      ELSE 0 END), 0) AS balance
             FROM users u
             LEFT JOIN transactions t ON t.user_id = u.id
             WHERE u.is_admin = 0
             GROUP BY u.id
             ORDER BY u.username",
        )?;
        let users = stmt
            .query_map([], |row| {
                Ok(UserBalance {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    active: row.get::<_, i64>(3)? != 0,
                    balance: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

/// Column order: id, username, email, password_hash, is_admin, active,
///               currency, notification_budget, notification_goals, created_at
fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let currency_str: String = row.get(6)?;
    let created_at_str: String = row.get(9)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        is_admin: row.get::<_, i64>(4)? != 0,
        active: row.get::<_, i64>(5)? != 0,
        settings: UserSettings {
            currency: column_enum(6, &currency_str)?,
            notification_budget: row.get::<_, i64>(7)? != 0,
            notification_goals: row.get::<_, i64>(8)? != 0,
        },
        created_at: parse_datetime(&created_at_str),
    })
}
