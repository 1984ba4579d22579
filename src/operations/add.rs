use crate::error::{AppError, Result};
use crate::models::category::{canonical_category, categories_for};
use crate::models::transaction::{NewTransaction, TransactionType, coerce_amount};
use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;

// 1_000_000_000_000
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

pub fn parse_transaction_input(input: &str) -> Result<NewTransaction> {
    let parts: Vec<&str> = input.split(',').map(|s| s.trim()).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(AppError::InvalidInput(format!(
            "Invalid number of details provided. Expected 3 or 4 details separated by commas but got {}",
            parts.len()
        )));
    }

    build_transaction(parts[0], parts[1], parts[2], parts.get(3).copied())
}

// `date` defaults to today in local time when absent or blank.
pub fn build_transaction(
    transaction_type: &str,
    category: &str,
    amount: &str,
    date: Option<&str>,
) -> Result<NewTransaction> {
    let transaction_type = match TransactionType::parse(transaction_type) {
        TransactionType::Other(_) => {
            return Err(AppError::InvalidInput(
                "Invalid transaction type. Use 'Credit' or 'Debit'.".to_string(),
            ));
        }
        known => known,
    };

    let category = canonical_category(&transaction_type, category).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Invalid category '{}' for {}. Choose one of: {}",
            category,
            transaction_type,
            categories_for(&transaction_type).join(", ")
        ))
    })?;

    let amount = coerce_amount(amount).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Invalid amount format {}. Please provide a valid decimal number.",
            amount
        ))
    })?;
    if amount < Decimal::ZERO {
        return Err(AppError::InvalidInput("Amount cannot be negative".to_string()));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::InvalidInput(format!("Amount cannot exceed {}", MAX_AMOUNT)));
    }

    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidInput("Invalid date format. Please use YYYY-MM-DD.".to_string())
        })?,
        None => Local::now().date_naive(),
    };

    Ok(NewTransaction {
        transaction_type,
        category: category.to_string(),
        amount,
        date,
        created_at: Utc::now().timestamp_millis(),
    })
}
