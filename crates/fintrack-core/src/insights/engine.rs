//! Insight engine - runs heuristic rules over in-memory ledger data
//!
//! Pure and synchronous: the engine never touches the database. The caller
//! fetches recent transactions, budget statuses and the balance, and the
//! engine turns them into severity-tagged messages.

use chrono::NaiveDate;

use crate::models::{BudgetStatus, Transaction, TransactionType};

use super::rules::{
    BalanceHealthRule, BudgetProgressRule, IncomeSourceRule, RecentPaceRule, SavingsRatioRule,
    TopExpenseCategoryRule,
};
use super::types::{Insight, Severity};

/// Inputs for one insight evaluation
///
/// `today` is injected rather than read from the clock so evaluation stays
/// deterministic under test.
pub struct RuleContext<'a> {
    pub transactions: &'a [Transaction],
    pub budgets: &'a [BudgetStatus],
    pub balance: f64,
    pub today: NaiveDate,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        transactions: &'a [Transaction],
        budgets: &'a [BudgetStatus],
        balance: f64,
        today: NaiveDate,
    ) -> Self {
        Self {
            transactions,
            budgets,
            balance,
            today,
        }
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Expense)
    }

    pub fn incomes(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Income)
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses().map(|t| t.amount).sum()
    }

    pub fn total_income(&self) -> f64 {
        self.incomes().map(|t| t.amount).sum()
    }
}

/// One heuristic rule; appends zero or more insights per evaluation
pub trait InsightRule: Send + Sync {
    /// Human-readable name, used in logs
    fn name(&self) -> &'static str;

    /// Evaluate against the context
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight>;
}

/// The main insight engine
///
/// Rules run sequentially in registration order and the output is their
/// concatenated insights, so the display order is deterministic.
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules registered
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(IncomeSourceRule));
        engine.register(Box::new(BalanceHealthRule));
        engine.register(Box::new(TopExpenseCategoryRule));
        engine.register(Box::new(SavingsRatioRule));
        engine.register(Box::new(BudgetProgressRule));
        engine.register(Box::new(RecentPaceRule));

        engine
    }

    /// Register a rule; evaluation order follows registration order
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule and collect insights
    ///
    /// Never fails and never returns an empty list: when no rule fires, a
    /// single fallback insight is emitted instead.
    pub fn generate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let mut insights = vec![];

        for rule in &self.rules {
            let produced = rule.evaluate(ctx);
            tracing::debug!(
                rule = rule.name(),
                count = produced.len(),
                "Insight rule evaluated"
            );
            insights.extend(produced);
        }

        if insights.is_empty() {
            insights.push(Insight::new(
                Severity::Info,
                "Add more transactions to get detailed financial insights.",
            ));
        }

        insights
    }

    /// Names of the registered rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}
