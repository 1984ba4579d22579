use crate::error::{AppError, Result};
use crate::feed::ledger_feed::LedgerFeed;
use crate::models::transaction::Transaction;
use uuid::Uuid;

pub fn parse_transaction_id(input: &str) -> Result<String> {
    let id_input = input.trim();

    if id_input.is_empty() {
        return Err(AppError::InvalidInput("Transaction ID cannot be empty.".to_string()));
    }

    let id = Uuid::parse_str(id_input).map_err(|_| {
        AppError::InvalidInput("Invalid transaction ID format. Please provide a valid UUID.".to_string())
    })?;

    Ok(id.to_string())
}

pub fn remove_transaction(feed: &mut LedgerFeed, input: &str) -> Result<Transaction> {
    let id = parse_transaction_id(input)?;
    feed.delete(&id)
}
