//! Report commands: summary, insights, CSV export

use std::path::Path;

use anyhow::{Context, Result};
use fintrack_core::db::Database;
use fintrack_core::insights::{format_currency, InsightEngine, RuleContext, Severity};
use fintrack_core::models::SummaryWindow;

use super::resolve_user;

/// How much ledger history the insight rules look at
const INSIGHT_TRANSACTION_LIMIT: i64 = 100;

pub fn cmd_summary(db: &Database, username: &str, window: SummaryWindow) -> Result<()> {
    let user = resolve_user(db, username)?;
    let now = chrono::Local::now().naive_local();
    let summary = db.period_summary(user.id, window, now)?;

    println!();
    println!("💰 {} summary for {}", window, user.username);
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Income:   {} ({} transactions)",
        format_currency(summary.income),
        summary.income_count
    );
    println!(
        "   Expenses: {} ({} transactions)",
        format_currency(summary.expenses),
        summary.expense_count
    );
    println!("   Savings:  {}", format_currency(summary.savings));

    if !summary.categories.is_empty() {
        println!();
        println!("   By category:");
        for entry in &summary.categories {
            println!(
                "   {:>10}  {:<16} {}",
                entry.kind.as_str(),
                entry.category.as_str(),
                format_currency(entry.total)
            );
        }
    }

    println!();
    Ok(())
}

pub fn cmd_insights(db: &Database, username: &str) -> Result<()> {
    let user = resolve_user(db, username)?;

    let transactions = db.recent_transactions(user.id, INSIGHT_TRANSACTION_LIMIT)?;
    let budgets = db.budget_status(user.id)?;
    let balance = db.total_balance(user.id)?;
    let today = chrono::Local::now().date_naive();

    let ctx = RuleContext::new(&transactions, &budgets, balance, today);
    let insights = InsightEngine::new().generate(&ctx);

    println!();
    println!("🔎 Insights for {}", user.username);
    println!("   ─────────────────────────────────────────────");

    for insight in &insights {
        let icon = match insight.severity {
            Severity::Success => "✅",
            Severity::Info => "💡",
            Severity::Warning => "⚠️ ",
            Severity::Danger => "🚨",
        };
        println!("   {} {}", icon, insight.message);
    }

    println!();
    Ok(())
}

pub fn cmd_export(db: &Database, username: &str, output: Option<&Path>) -> Result<()> {
    let user = resolve_user(db, username)?;
    let transactions = db.list_transactions(user.id)?;
    let csv = fintrack_core::transactions_to_csv(&transactions)?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✅ Exported {} transactions to {}",
                transactions.len(),
                path.display()
            );
        }
        None => print!("{}", csv),
    }

    Ok(())
}
