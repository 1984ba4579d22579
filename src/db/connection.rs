use rusqlite::{Connection, Result};
use std::path::Path;

// No CHECK on type or category: only the input form validates those.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS transactions (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        transaction_type TEXT NOT NULL,
        category TEXT,
        amount TEXT,
        date TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_recent
        ON transactions (owner_id, date DESC, created_at DESC);
";

pub fn establish_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}
