//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fintrack - Track spending, budgets and savings goals
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set FINTRACK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable; default is same-origin only)
        #[arg(long)]
        origin: Vec<String>,
    },

    /// Show database status (encryption, size, row counts)
    Status,

    /// Show an income/expense summary for one user
    Summary {
        /// Username to report on
        #[arg(short, long)]
        user: String,

        /// Summary window: weekly, monthly, quarterly, yearly
        #[arg(short, long, default_value = "monthly")]
        window: String,
    },

    /// Generate financial insights for one user
    Insights {
        /// Username to report on
        #[arg(short, long)]
        user: String,
    },

    /// Export a user's transactions to CSV
    Export {
        /// Username whose ledger to export
        #[arg(short, long)]
        user: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage users (list, add-admin, toggle)
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users with their balances
    List,

    /// Create the first admin account
    ///
    /// Reads the password from FINTRACK_ADMIN_PASSWORD, or prompts if unset.
    AddAdmin {
        /// Admin username
        username: String,
        /// Admin email
        email: String,
    },

    /// Activate or deactivate a user account
    Toggle {
        /// Username to toggle
        username: String,
    },
}
