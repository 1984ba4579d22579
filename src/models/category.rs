use super::transaction::TransactionType;

pub const DEBIT_CATEGORIES: &[&str] = &[
    "Food",
    "Rent",
    "EMI",
    "Travel",
    "Bills",
    "Entertainment",
    "Health",
    "Shopping",
];

pub const CREDIT_CATEGORIES: &[&str] = &["Salary", "Freelance", "Refunds", "Investment", "Gift"];

pub fn categories_for(transaction_type: &TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::Credit => CREDIT_CATEGORIES,
        TransactionType::Debit => DEBIT_CATEGORIES,
        TransactionType::Other(_) => &[],
    }
}

pub fn canonical_category(transaction_type: &TransactionType, name: &str) -> Option<&'static str> {
    let name = name.trim();
    categories_for(transaction_type)
        .iter()
        .copied()
        .find(|category| category.eq_ignore_ascii_case(name))
}

pub fn is_known_category(transaction_type: &TransactionType, name: &str) -> bool {
    canonical_category(transaction_type, name).is_some()
}
