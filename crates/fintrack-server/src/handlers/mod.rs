//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod admin;
pub mod auth;
pub mod budgets;
pub mod goals;
pub mod insights;
pub mod reports;
pub mod settings;
pub mod transactions;

// Re-export all handlers for use in router
pub use admin::*;
pub use auth::*;
pub use budgets::*;
pub use goals::*;
pub use insights::*;
pub use reports::*;
pub use settings::*;
pub use transactions::*;
