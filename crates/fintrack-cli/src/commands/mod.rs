//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init command and shared utilities (open_db, default_db_path)
//! - `reports` - Summary, insights and export commands
//! - `serve` - Web server command
//! - `status` - Database status command
//! - `users` - User management commands (list, add-admin, toggle)

pub mod core;
pub mod reports;
pub mod serve;
pub mod status;
pub mod users;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use status::*;
pub use users::*;
