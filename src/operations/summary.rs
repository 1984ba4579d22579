use crate::models::statistics::Statistics;
use crate::models::transaction::{Transaction, TransactionType};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::warn;

/// Recomputes the statistics for a snapshot from scratch.
///
/// Total over any input: amounts that are missing or not numeric contribute
/// zero, and records of an unknown type count toward their category only.
/// Category totals are keyed by name alone, so a category shared by credits
/// and debits sums both. Sums that leave the `Decimal` range saturate at
/// `Decimal::MAX` / `Decimal::MIN`.
pub fn compute_statistics(transactions: &[Transaction]) -> Statistics {
    let mut total_credit = Decimal::ZERO;
    let mut total_debit = Decimal::ZERO;
    let mut by_category: HashMap<String, Decimal> = HashMap::new();

    for transaction in transactions {
        let amount = transaction.amount_or_zero();
        match transaction.transaction_type {
            TransactionType::Credit => total_credit = accumulate(total_credit, amount, "total_credit"),
            TransactionType::Debit => total_debit = accumulate(total_debit, amount, "total_debit"),
            TransactionType::Other(_) => {}
        }

        if let Some(category) = &transaction.category {
            let entry = by_category
                .entry(category.clone())
                .or_insert(Decimal::ZERO);
            *entry = accumulate(*entry, amount, category);
        }
    }

    let savings = total_credit.checked_sub(total_debit).unwrap_or_else(|| {
        warn!("savings out of range, saturating");
        total_credit.saturating_sub(total_debit)
    });

    Statistics {
        total_credit,
        total_debit,
        savings,
        by_category,
    }
}

fn accumulate(total: Decimal, amount: Decimal, what: &str) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!(total = what, "sum out of range, saturating");
        total.saturating_add(amount)
    })
}
