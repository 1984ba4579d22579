use crate::error::Result;
use crate::models::category::{CREDIT_CATEGORIES, DEBIT_CATEGORIES};
use crate::models::statistics::Statistics;
use crate::models::transaction::Transaction;
use std::fmt::Write;

pub fn format_statistics(statistics: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10}{:>14}", "Income", statistics.total_credit);
    let _ = writeln!(out, "{:<10}{:>14}", "Expense", statistics.total_debit);
    let _ = writeln!(out, "{:<10}{:>14}", "Savings", statistics.savings);

    let categories = statistics.categories_by_amount();
    if !categories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "By category:");
        for (category, amount) in categories {
            let _ = writeln!(out, "  {:<15}{:>12}", category, amount);
        }
    }
    out
}

pub fn statistics_json(statistics: &Statistics) -> Result<String> {
    Ok(serde_json::to_string_pretty(statistics)?)
}

pub fn format_transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions recorded.\n".to_string();
    }

    let mut out = String::new();
    for tx in transactions {
        let amount = tx
            .amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string());
        let _ = writeln!(
            out,
            "{}  {:<7} {:<15}{:>12}  {}",
            tx.date.format("%Y-%m-%d"),
            tx.transaction_type,
            tx.category.as_deref().unwrap_or("-"),
            amount,
            tx.id
        );
    }
    out
}

pub fn format_categories() -> String {
    format!(
        "Credit: {}\nDebit:  {}\n",
        CREDIT_CATEGORIES.join(", "),
        DEBIT_CATEGORIES.join(", ")
    )
}
