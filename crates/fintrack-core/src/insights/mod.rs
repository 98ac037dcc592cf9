//! Insight rule engine
//!
//! Turns a user's recent transactions, budget statuses and total balance into
//! an ordered list of severity-tagged messages. Evaluation is a pure function
//! of those three inputs: the caller fetches the data, the engine never
//! touches the database.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fintrack_core::insights::{InsightEngine, RuleContext};
//!
//! let engine = InsightEngine::new();
//! let ctx = RuleContext::new(&transactions, &budget_status, balance, today);
//! let insights = engine.generate(&ctx);
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{InsightEngine, InsightRule, RuleContext};
pub use rules::{
    BalanceHealthRule, BudgetProgressRule, IncomeSourceRule, RecentPaceRule, SavingsRatioRule,
    TopExpenseCategoryRule,
};
pub use types::{format_currency, format_percent, Insight, Severity};
