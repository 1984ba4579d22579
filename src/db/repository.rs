use crate::error::{AppError, Result};
use crate::models::transaction::{Transaction, TransactionType, coerce_amount};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

pub fn insert_transaction(conn: &Connection, owner_id: &str, transaction: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &transaction.id,
            owner_id,
            transaction.transaction_type.as_str(),
            transaction.category.as_deref(),
            transaction.amount.map(|a| a.to_string()),
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.created_at,
        ],
    )?;

    Ok(())
}

// Newest first. Malformed rows still count toward `limit` but are left out.
pub fn get_recent_transactions(conn: &Connection, owner_id: &str, limit: usize) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, transaction_type, category, amount, date, created_at FROM transactions
         WHERE owner_id = ?1
         ORDER BY date DESC, created_at DESC
         LIMIT ?2",
    )?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map(params![owner_id, limit], read_row)?;

    let mut transactions = Vec::new();
    for row in rows {
        if let Some(transaction) = row? {
            transactions.push(transaction);
        }
    }

    Ok(transactions)
}

pub fn find_transaction(conn: &Connection, owner_id: &str, id: &str) -> Result<Option<Transaction>> {
    let found = conn
        .query_row(
            "SELECT id, transaction_type, category, amount, date, created_at FROM transactions
             WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
            read_row,
        )
        .optional()?;

    Ok(found.flatten())
}

pub fn delete_transaction(conn: &Connection, owner_id: &str, id: &str) -> Result<()> {
    let rows_affected = conn.execute(
        "DELETE FROM transactions WHERE owner_id = ?1 AND id = ?2",
        params![owner_id, id],
    )?;

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("Transaction with ID {} not found", id)));
    }

    Ok(())
}

// `None` marks a row that cannot form a transaction; callers skip it.
fn read_row(row: &Row<'_>) -> rusqlite::Result<Option<Transaction>> {
    let Some(id) = lenient::<String>(row, 0)? else {
        warn!("stored transaction without a text id, skipping");
        return Ok(None);
    };
    let transaction_type = lenient::<String>(row, 1)?.unwrap_or_default();
    let category = lenient::<Option<String>>(row, 2)?.flatten();

    let amount = match row.get_ref(3)? {
        ValueRef::Null => None,
        ValueRef::Integer(value) => Some(Decimal::from(value)),
        ValueRef::Real(value) => Decimal::from_f64(value),
        ValueRef::Text(bytes) => {
            let raw = String::from_utf8_lossy(bytes);
            let coerced = coerce_amount(&raw);
            if coerced.is_none() {
                warn!(transaction_id = %id, raw_amount = %raw, "non-numeric amount, counting as zero");
            }
            coerced
        }
        ValueRef::Blob(_) => {
            warn!(transaction_id = %id, "binary amount, counting as zero");
            None
        }
    };

    let date = lenient::<String>(row, 4)?
        .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok());
    let Some(date) = date else {
        warn!(transaction_id = %id, "stored transaction has no valid date, skipping");
        return Ok(None);
    };

    let Some(created_at) = lenient::<i64>(row, 5)? else {
        warn!(transaction_id = %id, "stored transaction has no integer created_at, skipping");
        return Ok(None);
    };

    Ok(Some(Transaction::new(
        id,
        TransactionType::parse(&transaction_type),
        category,
        amount,
        date,
        created_at,
    )))
}

// Column values of the wrong SQLite type read as `None` instead of failing the query.
fn lenient<T: FromSql>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    match row.get::<_, T>(idx) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::InvalidColumnType(..))
        | Err(rusqlite::Error::FromSqlConversionFailure(..))
        | Err(rusqlite::Error::IntegralValueOutOfRange(..)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use uuid::Uuid;

    const OWNER: &str = "user-1";

    fn create_test_transaction(id: &str, category: &str, day: u32, created_at: i64) -> Transaction {
        Transaction::new(
            id.to_string(),
            TransactionType::Debit,
            Some(category.to_string()),
            Some(Decimal::new(10000, 2)),
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            created_at,
        )
    }

    #[test]
    fn test_insert_transaction_success() {
        let conn = establish_test_connection().unwrap();
        let transaction = create_test_transaction(&Uuid::new_v4().to_string(), "Food", 15, 1);

        let result = insert_transaction(&conn, OWNER, &transaction);
        assert!(result.is_ok());
    }

    #[test]
    fn test_insert_transaction_duplicate_id() {
        let conn = establish_test_connection().unwrap();
        let transaction = create_test_transaction(&Uuid::new_v4().to_string(), "Food", 15, 1);

        insert_transaction(&conn, OWNER, &transaction).unwrap();
        let result = insert_transaction(&conn, OWNER, &transaction);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("UNIQUE constraint failed"));
    }

    #[test]
    fn test_get_recent_transactions_empty() {
        let conn = establish_test_connection().unwrap();

        let result = get_recent_transactions(&conn, OWNER, 50);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 0);
    }

    #[test]
    fn test_get_recent_transactions_round_trips_fields() {
        let conn = establish_test_connection().unwrap();
        let transaction = create_test_transaction("a", "Rent", 3, 42);
        insert_transaction(&conn, OWNER, &transaction).unwrap();

        let loaded = get_recent_transactions(&conn, OWNER, 50).unwrap();
        assert_eq!(loaded, vec![transaction]);
    }

    #[test]
    fn test_get_recent_transactions_orders_by_date_then_created_at() {
        let conn = establish_test_connection().unwrap();
        insert_transaction(&conn, OWNER, &create_test_transaction("old", "Food", 1, 10)).unwrap();
        insert_transaction(&conn, OWNER, &create_test_transaction("new-early", "Food", 9, 20)).unwrap();
        insert_transaction(&conn, OWNER, &create_test_transaction("new-late", "Food", 9, 30)).unwrap();

        let ids: Vec<String> = get_recent_transactions(&conn, OWNER, 50)
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["new-late", "new-early", "old"]);
    }

    #[test]
    fn test_get_recent_transactions_respects_limit() {
        let conn = establish_test_connection().unwrap();
        for day in 1..=5 {
            let tx = create_test_transaction(&format!("tx-{}", day), "Food", day, day as i64);
            insert_transaction(&conn, OWNER, &tx).unwrap();
        }

        let recent = get_recent_transactions(&conn, OWNER, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "tx-5");
        assert_eq!(recent[1].id, "tx-4");
    }

    #[test]
    fn test_get_recent_transactions_scoped_to_owner() {
        let conn = establish_test_connection().unwrap();
        insert_transaction(&conn, OWNER, &create_test_transaction("mine", "Food", 1, 1)).unwrap();
        insert_transaction(&conn, "someone-else", &create_test_transaction("theirs", "Food", 1, 2)).unwrap();

        let recent = get_recent_transactions(&conn, OWNER, 50).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "mine");
    }

    #[test]
    fn test_loading_tolerates_bad_amount_and_unknown_type() {
        let conn = establish_test_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at)
             VALUES ('x', ?1, 'Transfer', 'Bills', 'twelve', '2025-02-01', 5)",
            [OWNER],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at)
             VALUES ('y', ?1, 'Debit', NULL, NULL, '2025-02-01', 4)",
            [OWNER],
        )
        .unwrap();

        let loaded = get_recent_transactions(&conn, OWNER, 50).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].transaction_type, TransactionType::Other("Transfer".to_string()));
        assert_eq!(loaded[0].amount, None);
        assert_eq!(loaded[1].category, None);
        assert_eq!(loaded[1].amount, None);
    }

    #[test]
    fn test_loading_skips_rows_with_invalid_date_or_created_at() {
        let conn = establish_test_connection().unwrap();
        insert_transaction(&conn, OWNER, &create_test_transaction("good", "Food", 3, 1)).unwrap();
        conn.execute(
            "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at)
             VALUES ('bad-date', ?1, 'Debit', 'Food', '1', 'yesterday', 1)",
            [OWNER],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at)
             VALUES ('bad-created', ?1, 'Debit', 'Food', '1', '2025-01-02', 'noon')",
            [OWNER],
        )
        .unwrap();

        let loaded = get_recent_transactions(&conn, OWNER, 50).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "good");

        assert!(find_transaction(&conn, OWNER, "bad-date").unwrap().is_none());
        assert!(delete_transaction(&conn, OWNER, "bad-date").is_ok());
    }

    #[test]
    fn test_loading_tolerates_binary_columns() {
        let conn = establish_test_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at)
             VALUES ('b', ?1, X'07', X'2A', X'00', '2025-02-01', 1)",
            [OWNER],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (id, owner_id, transaction_type, category, amount, date, created_at)
             VALUES ('d', ?1, 'Debit', 'Food', '5', X'00', 1)",
            [OWNER],
        )
        .unwrap();

        let loaded = get_recent_transactions(&conn, OWNER, 50).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
        assert_eq!(loaded[0].transaction_type, TransactionType::Other(String::new()));
        assert_eq!(loaded[0].category, None);
        assert_eq!(loaded[0].amount, None);
    }

    #[test]
    fn test_find_transaction() {
        let conn = establish_test_connection().unwrap();
        insert_transaction(&conn, OWNER, &create_test_transaction("a", "Food", 1, 1)).unwrap();

        assert!(find_transaction(&conn, OWNER, "a").unwrap().is_some());
        assert!(find_transaction(&conn, OWNER, "b").unwrap().is_none());
        assert!(find_transaction(&conn, "someone-else", "a").unwrap().is_none());
    }

    #[test]
    fn test_delete_transaction_success() {
        let conn = establish_test_connection().unwrap();
        let id = Uuid::new_v4().to_string();
        insert_transaction(&conn, OWNER, &create_test_transaction(&id, "Food", 1, 1)).unwrap();

        let result = delete_transaction(&conn, OWNER, &id);
        assert!(result.is_ok());
        assert_eq!(get_recent_transactions(&conn, OWNER, 50).unwrap().len(), 0);
    }

    #[test]
    fn test_delete_transaction_not_found() {
        let conn = establish_test_connection().unwrap();
        let non_existent_id = Uuid::new_v4().to_string();

        let result = delete_transaction(&conn, OWNER, &non_existent_id);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_transaction_of_other_owner_not_found() {
        let conn = establish_test_connection().unwrap();
        insert_transaction(&conn, "someone-else", &create_test_transaction("a", "Food", 1, 1)).unwrap();

        let result = delete_transaction(&conn, OWNER, "a");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
