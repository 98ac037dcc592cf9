//! Fintrack Core Library
//!
//! Shared functionality for the Fintrack personal finance application:
//! - Database access and migrations (SQLite, optionally SQLCipher-encrypted)
//! - User accounts, sessions and login rate limiting
//! - Transaction, budget and savings goal operations
//! - Ledger aggregation (summaries, category breakdowns, time patterns)
//! - Heuristic insight rule engine
//! - CSV export

pub mod db;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;

pub use db::{Database, DB_KEY_ENV, LOCKOUT_MAX_FAILURES, LOCKOUT_WINDOW_MINUTES, SESSION_TTL_HOURS};
pub use error::{Error, Result};
pub use export::{transactions_to_csv, write_transactions_csv};
pub use insights::{Insight, InsightEngine, RuleContext, Severity};
pub use models::{
    Budget, BudgetPeriod, BudgetStatus, Category, CategoryBreakdown, CategoryTotal,
    CredentialUpdate, Currency, GoalStatus, HourlyAverage, MonthlyRollup, NewBudget,
    NewSavingsGoal, NewTransaction, NewUser, PaymentMethod, PeriodSummary, SavingsGoal,
    SummaryWindow, Transaction, TransactionType, User, UserBalance, UserSettings,
};
