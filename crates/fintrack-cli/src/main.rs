//! Fintrack CLI - Personal finance tracker
//!
//! Usage:
//!   fintrack init                 Initialize database
//!   fintrack serve --port 8080    Start web server
//!   fintrack summary --user NAME  Show an income/expense summary
//!   fintrack insights --user NAME Generate financial insights

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = cli.db.unwrap_or_else(commands::default_db_path);

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Serve { port, host, origin } => {
            commands::cmd_serve(&db_path, &host, port, origin, cli.no_encrypt).await
        }
        Commands::Status => commands::cmd_status(&db_path, cli.no_encrypt),
        Commands::Summary { user, window } => {
            let window: fintrack_core::models::SummaryWindow =
                window.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_summary(&db, &user, window)
        }
        Commands::Insights { user } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_insights(&db, &user)
        }
        Commands::Export { user, output } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_export(&db, &user, output.as_deref())
        }
        Commands::Users { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::AddAdmin { username, email }) => {
                    commands::cmd_users_add_admin(&db, &username, &email)
                }
                Some(UsersAction::Toggle { username }) => {
                    commands::cmd_users_toggle(&db, &username)
                }
            }
        }
    }
}
