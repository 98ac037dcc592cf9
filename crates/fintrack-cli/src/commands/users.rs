//! User management commands

use anyhow::{Context, Result};
use fintrack_core::db::Database;
use fintrack_core::insights::format_currency;
use fintrack_core::models::NewUser;

use super::resolve_user;

/// Environment variable for non-interactive admin password entry
pub const ADMIN_PASSWORD_ENV: &str = "FINTRACK_ADMIN_PASSWORD";

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_user_balances()?;

    if users.is_empty() {
        println!("No users registered yet.");
        return Ok(());
    }

    println!();
    println!("👥 Users");
    println!("   ─────────────────────────────────────────────");

    for user in users {
        let state = if user.active { "" } else { " (deactivated)" };
        println!(
            "   {:<16} {:<28} {}{}",
            user.username,
            user.email,
            format_currency(user.balance),
            state
        );
    }

    println!();
    Ok(())
}

pub fn cmd_users_add_admin(db: &Database, username: &str, email: &str) -> Result<()> {
    let password = match std::env::var(ADMIN_PASSWORD_ENV) {
        Ok(p) if !p.is_empty() => p,
        _ => prompt_password()?,
    };

    let user = db.setup_admin(&NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password,
    })?;

    println!("✅ Admin account '{}' created.", user.username);
    Ok(())
}

pub fn cmd_users_toggle(db: &Database, username: &str) -> Result<()> {
    let user = resolve_user(db, username)?;
    if user.is_admin {
        anyhow::bail!("Cannot deactivate an admin account");
    }

    let activate = !user.active;
    db.set_user_active(user.id, activate)?;
    if !activate {
        db.revoke_user_sessions(user.id)?;
        println!("✅ User '{}' deactivated and sessions revoked.", username);
    } else {
        println!("✅ User '{}' reactivated.", username);
    }

    Ok(())
}

fn prompt_password() -> Result<String> {
    use std::io::{self, Write};

    print!("Admin password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read password")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
