use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Credit,
    Debit,
    Other(String),
}

impl TransactionType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "credit" | "income" => TransactionType::Credit,
            "debit" | "expense" => TransactionType::Debit,
            _ => TransactionType::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
            TransactionType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub transaction_type: TransactionType,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub date: NaiveDate,
    // unix millis
    pub created_at: i64,
}

impl Transaction {
    pub fn new(
        id: String,
        transaction_type: TransactionType,
        category: Option<String>,
        amount: Option<Decimal>,
        date: NaiveDate,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            transaction_type,
            category,
            amount,
            date,
            created_at,
        }
    }

    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub created_at: i64,
}

impl NewTransaction {
    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction::new(
            id,
            self.transaction_type,
            Some(self.category),
            Some(self.amount),
            self.date,
            self.created_at,
        )
    }
}

// Blank is zero; plain and scientific notation parse; anything else is `None`.
pub fn coerce_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_type_known_values() {
        assert_eq!(TransactionType::parse("Credit"), TransactionType::Credit);
        assert_eq!(TransactionType::parse("debit"), TransactionType::Debit);
        assert_eq!(TransactionType::parse(" INCOME "), TransactionType::Credit);
        assert_eq!(TransactionType::parse("expense"), TransactionType::Debit);
    }

    #[test]
    fn test_parse_transaction_type_unknown_value_is_kept() {
        let parsed = TransactionType::parse("Transfer");
        assert_eq!(parsed, TransactionType::Other("Transfer".to_string()));
        assert_eq!(parsed.as_str(), "Transfer");
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("12.50"), Some(Decimal::new(1250, 2)));
        assert_eq!(coerce_amount("  7 "), Some(Decimal::from(7)));
        assert_eq!(coerce_amount(""), Some(Decimal::ZERO));
        assert_eq!(coerce_amount("1e3"), Some(Decimal::from(1000)));
        assert_eq!(coerce_amount("abc"), None);
        assert_eq!(coerce_amount("12,50"), None);
    }

    #[test]
    fn test_amount_or_zero_for_missing_amount() {
        let tx = Transaction::new(
            "1".to_string(),
            TransactionType::Debit,
            Some("Bills".to_string()),
            None,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            0,
        );
        assert_eq!(tx.amount_or_zero(), Decimal::ZERO);
    }
}
