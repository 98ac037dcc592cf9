//! Built-in insight rules
//!
//! Each rule is independent and pure. Thresholds and message wording are part
//! of the observable contract; tests pin them down.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::models::{Category, Transaction};

use super::engine::{InsightRule, RuleContext};
use super::types::{format_currency, format_percent, Insight, Severity};

/// Sum and count per category, keyed by display name for stable iteration
fn totals_by_category<'a>(
    txs: impl Iterator<Item = &'a Transaction>,
) -> BTreeMap<&'static str, (Category, f64, i64)> {
    let mut map: BTreeMap<&'static str, (Category, f64, i64)> = BTreeMap::new();
    for t in txs {
        let entry = map
            .entry(t.category.as_str())
            .or_insert((t.category, 0.0, 0));
        entry.1 += t.amount;
        entry.2 += 1;
    }
    map
}

/// Category with the greatest total; ties resolve to the alphabetically
/// first name
fn top_category(
    map: &BTreeMap<&'static str, (Category, f64, i64)>,
) -> Option<(Category, f64, i64)> {
    let mut best: Option<(Category, f64, i64)> = None;
    for &(category, total, count) in map.values() {
        match best {
            Some((_, best_total, _)) if total <= best_total => {}
            _ => best = Some((category, total, count)),
        }
    }
    best
}

/// Names the largest income category and its per-payment average
pub struct IncomeSourceRule;

impl InsightRule for IncomeSourceRule {
    fn name(&self) -> &'static str {
        "income-source"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let by_category = totals_by_category(ctx.incomes());
        let Some((category, total, count)) = top_category(&by_category) else {
            return vec![];
        };
        let avg = if count > 0 { total / count as f64 } else { 0.0 };
        vec![Insight::new(
            Severity::Success,
            format!(
                "Your main source of income is {} ({}, averaging {} per payment)",
                category,
                format_currency(total),
                format_currency(avg)
            ),
        )]
    }
}

/// Compares the balance against total expenses
///
/// Branches are mutually exclusive: negative balance, balance under half of
/// expenses, balance over three times expenses, else silence.
pub struct BalanceHealthRule;

impl InsightRule for BalanceHealthRule {
    fn name(&self) -> &'static str {
        "balance-health"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let total_expenses = ctx.total_expenses();
        if ctx.balance < 0.0 {
            vec![Insight::new(
                Severity::Danger,
                format!(
                    "Your balance is negative ({}). Consider reducing expenses or increasing income.",
                    format_currency(ctx.balance)
                ),
            )]
        } else if ctx.balance < total_expenses * 0.5 {
            vec![Insight::new(
                Severity::Warning,
                format!(
                    "Your balance ({}) is low compared to your expenses. Aim to maintain at least 3 months of expenses in savings.",
                    format_currency(ctx.balance)
                ),
            )]
        } else if ctx.balance > total_expenses * 3.0 {
            vec![Insight::new(
                Severity::Success,
                format!(
                    "Great job! You have a healthy emergency fund of {}.",
                    format_currency(ctx.balance)
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// Names the largest expense category, then flags every category above 40%
/// of total spending
pub struct TopExpenseCategoryRule;

impl InsightRule for TopExpenseCategoryRule {
    fn name(&self) -> &'static str {
        "top-expense-category"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let by_category = totals_by_category(ctx.expenses());
        let Some((category, total, count)) = top_category(&by_category) else {
            return vec![];
        };
        let total_expenses = ctx.total_expenses();
        let avg = if count > 0 { total / count as f64 } else { 0.0 };

        let mut insights = vec![Insight::new(
            Severity::Info,
            format!(
                "Your highest expense category is {} ({}, avg {} per transaction)",
                category,
                format_currency(total),
                format_currency(avg)
            ),
        )];

        if total_expenses > 0.0 {
            for &(cat, amount, _) in by_category.values() {
                if amount > total_expenses * 0.4 {
                    insights.push(Insight::new(
                        Severity::Warning,
                        format!(
                            "Your {} expenses represent {} of your total spending",
                            cat,
                            format_percent(amount / total_expenses)
                        ),
                    ));
                }
            }
        }

        insights
    }
}

/// Bands the expense/income ratio
///
/// The [0.7, 0.9] band is deliberately silent.
pub struct SavingsRatioRule;

impl InsightRule for SavingsRatioRule {
    fn name(&self) -> &'static str {
        "savings-ratio"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let total_income = ctx.total_income();
        if total_income <= 0.0 {
            return vec![];
        }
        let expense_ratio = ctx.total_expenses() / total_income;
        let savings_ratio = 1.0 - expense_ratio;

        if expense_ratio > 0.9 {
            vec![Insight::new(
                Severity::Danger,
                format!(
                    "You are spending {} of your income. Consider reducing expenses.",
                    format_percent(expense_ratio)
                ),
            )]
        } else if expense_ratio < 0.5 {
            vec![Insight::new(
                Severity::Success,
                format!(
                    "Excellent! You are saving {} of your income. Keep up the good work!",
                    format_percent(savings_ratio)
                ),
            )]
        } else if expense_ratio < 0.7 {
            vec![Insight::new(
                Severity::Info,
                format!(
                    "You are saving {} of your income. Consider increasing your savings rate.",
                    format_percent(savings_ratio)
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// Flags each budget that is overspent, nearly exhausted, or barely touched
///
/// The 30-90% band is silent. The barely-touched branch requires a positive
/// cap so zero-amount budgets never congratulate.
pub struct BudgetProgressRule;

impl InsightRule for BudgetProgressRule {
    fn name(&self) -> &'static str {
        "budget-progress"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let mut insights = vec![];
        for budget in ctx.budgets {
            if budget.progress >= 100.0 {
                insights.push(Insight::new(
                    Severity::Danger,
                    format!(
                        "You have exceeded your {} budget by {}.",
                        budget.category,
                        format_currency(budget.spent - budget.amount)
                    ),
                ));
            } else if budget.progress >= 90.0 {
                insights.push(Insight::new(
                    Severity::Warning,
                    format!(
                        "You are close to exceeding your {} budget ({} remaining).",
                        budget.category,
                        format_currency(budget.amount - budget.spent)
                    ),
                ));
            } else if budget.progress <= 30.0 && budget.amount > 0.0 {
                insights.push(Insight::new(
                    Severity::Success,
                    format!(
                        "You are well within your {} budget ({} remaining).",
                        budget.category,
                        format_currency(budget.amount - budget.spent)
                    ),
                ));
            }
        }
        insights
    }
}

/// Warns when the trailing week's daily spend exceeds the longer-run daily
/// baseline
///
/// Needs at least five expense transactions and a non-empty trailing week.
/// The trailing window is exactly seven calendar days ending today (dates
/// strictly after today minus seven). The baseline divides total expenses by
/// the actual span of expense history (earliest expense to today, inclusive)
/// capped at 30 days, so sparse ledgers are not compared against a phantom
/// month.
pub struct RecentPaceRule;

impl InsightRule for RecentPaceRule {
    fn name(&self) -> &'static str {
        "recent-pace"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Insight> {
        let expenses: Vec<&Transaction> = ctx.expenses().collect();
        if expenses.len() < 5 {
            return vec![];
        }

        let window_start = ctx.today - Duration::days(7);
        let recent_sum: f64 = expenses
            .iter()
            .filter(|t| t.date.date() > window_start)
            .map(|t| t.amount)
            .sum();
        if recent_sum <= 0.0 {
            return vec![];
        }
        let avg_daily = recent_sum / 7.0;

        let earliest = expenses
            .iter()
            .map(|t| t.date.date())
            .min()
            .unwrap_or(ctx.today);
        let span_days = ((ctx.today - earliest).num_days() + 1).clamp(1, 30);
        let baseline = ctx.total_expenses() / span_days as f64;

        if avg_daily > baseline {
            vec![Insight::new(
                Severity::Warning,
                format!(
                    "Your daily spending ({}) is higher than your monthly average. Consider reducing daily expenses.",
                    format_currency(avg_daily)
                ),
            )]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, TransactionType};
    use chrono::NaiveDate;

    fn tx(kind: TransactionType, category: Category, amount: f64) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 3, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            description: "test".to_string(),
            amount,
            category,
            kind,
            payment_method: PaymentMethod::Cash,
            notes: None,
        }
    }

    #[test]
    fn test_top_category_tie_breaks_alphabetically() {
        let txs = vec![
            tx(TransactionType::Expense, Category::Shopping, 100.0),
            tx(TransactionType::Expense, Category::Food, 100.0),
        ];
        let map = totals_by_category(txs.iter());
        let (category, total, _) = top_category(&map).unwrap();
        assert_eq!(category, Category::Food);
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_savings_ratio_comfortable_band_is_silent() {
        // ratio 0.8 sits in the intentional [0.7, 0.9] gap
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, 1000.0),
            tx(TransactionType::Expense, Category::Housing, 800.0),
        ];
        let ctx = RuleContext::new(&txs, &[], 200.0, NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
        assert!(SavingsRatioRule.evaluate(&ctx).is_empty());
    }

    #[test]
    fn test_savings_ratio_danger_above_ninety_percent() {
        let txs = vec![
            tx(TransactionType::Income, Category::Salary, 1000.0),
            tx(TransactionType::Expense, Category::Housing, 950.0),
        ];
        let ctx = RuleContext::new(&txs, &[], 50.0, NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
        let insights = SavingsRatioRule.evaluate(&ctx);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Danger);
        assert!(insights[0].message.contains("95%"));
    }

    #[test]
    fn test_savings_ratio_silent_without_income() {
        let txs = vec![tx(TransactionType::Expense, Category::Food, 100.0)];
        let ctx = RuleContext::new(&txs, &[], 0.0, NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
        assert!(SavingsRatioRule.evaluate(&ctx).is_empty());
    }

    fn tx_on(kind: TransactionType, category: Category, amount: f64, day: u32) -> Transaction {
        let mut t = tx(kind, category, amount);
        t.date = NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        t
    }

    #[test]
    fn test_recent_pace_window_spans_seven_days() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 28).unwrap();

        // Mar 21 is eight days back: outside the window, so the trailing
        // sum is empty and the rule stays silent
        let txs = vec![
            tx_on(TransactionType::Expense, Category::Food, 10.0, 1),
            tx_on(TransactionType::Expense, Category::Food, 10.0, 2),
            tx_on(TransactionType::Expense, Category::Food, 10.0, 3),
            tx_on(TransactionType::Expense, Category::Food, 10.0, 4),
            tx_on(TransactionType::Expense, Category::Food, 500.0, 21),
        ];
        let ctx = RuleContext::new(&txs, &[], 0.0, today);
        assert!(RecentPaceRule.evaluate(&ctx).is_empty());

        // Mar 22 is the earliest date inside the window
        let txs = vec![
            tx_on(TransactionType::Expense, Category::Food, 10.0, 1),
            tx_on(TransactionType::Expense, Category::Food, 10.0, 2),
            tx_on(TransactionType::Expense, Category::Food, 10.0, 3),
            tx_on(TransactionType::Expense, Category::Food, 10.0, 4),
            tx_on(TransactionType::Expense, Category::Food, 500.0, 22),
        ];
        let ctx = RuleContext::new(&txs, &[], 0.0, today);
        let insights = RecentPaceRule.evaluate(&ctx);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Warning);
    }

    #[test]
    fn test_multiple_concentration_warnings() {
        // Two categories each hold 50% of spending: both exceed 40%
        let txs = vec![
            tx(TransactionType::Expense, Category::Food, 500.0),
            tx(TransactionType::Expense, Category::Housing, 500.0),
        ];
        let ctx = RuleContext::new(&txs, &[], 0.0, NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
        let insights = TopExpenseCategoryRule.evaluate(&ctx);

        let warnings: Vec<_> = insights
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|i| i.message.contains("Food")));
        assert!(warnings.iter().any(|i| i.message.contains("Housing")));
    }
}
