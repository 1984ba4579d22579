use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    pub savings: Decimal,
    pub by_category: HashMap<String, Decimal>,
}

impl Statistics {
    pub fn categories_by_amount(&self) -> Vec<(String, Decimal)> {
        let mut entries: Vec<(String, Decimal)> = self
            .by_category
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}
