//! Core command implementations and shared utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fintrack_core::db::Database;
use fintrack_core::models::User;

/// Default database location: the platform data directory, or the current
/// directory when none is available
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("fintrack").join("fintrack.db"))
        .unwrap_or_else(|| PathBuf::from("fintrack.db"))
}

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up a user by username, failing with a readable message
pub fn resolve_user(db: &Database, username: &str) -> Result<User> {
    db.get_user_by_username(username)?
        .with_context(|| format!("No such user: {}", username))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create an admin account: fintrack users add-admin admin admin@example.com");
    println!("  2. Start the web UI: fintrack serve");

    Ok(())
}
