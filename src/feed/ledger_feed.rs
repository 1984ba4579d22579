use super::{ChangeListener, SubscriptionId, TransactionFeed};
use crate::db::repository;
use crate::error::{AppError, Result};
use crate::models::transaction::{NewTransaction, Transaction};
use rusqlite::Connection;
use tracing::{debug, info};
use uuid::Uuid;

pub struct LedgerFeed {
    conn: Connection,
    owner_id: String,
    history_limit: usize,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_subscription: SubscriptionId,
}

impl LedgerFeed {
    pub fn new(conn: Connection, owner_id: impl Into<String>, history_limit: usize) -> Self {
        Self {
            conn,
            owner_id: owner_id.into(),
            history_limit,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = new_transaction.into_transaction(Uuid::new_v4().to_string());
        repository::insert_transaction(&self.conn, &self.owner_id, &transaction)?;
        info!(
            transaction_id = %transaction.id,
            transaction_type = %transaction.transaction_type,
            "transaction created"
        );

        self.notify()?;
        Ok(transaction)
    }

    pub fn delete(&mut self, id: &str) -> Result<Transaction> {
        let existing = repository::find_transaction(&self.conn, &self.owner_id, id)?
            .ok_or_else(|| AppError::NotFound(format!("Transaction with ID {} not found", id)))?;
        repository::delete_transaction(&self.conn, &self.owner_id, id)?;
        info!(transaction_id = %id, "transaction deleted");

        self.notify()?;
        Ok(existing)
    }

    // Listeners run in subscription order before the write returns.
    fn notify(&mut self) -> Result<()> {
        if self.listeners.is_empty() {
            return Ok(());
        }

        let snapshot = self.current_snapshot()?;
        debug!(
            listeners = self.listeners.len(),
            records = snapshot.len(),
            "pushing snapshot"
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
        Ok(())
    }
}

impl TransactionFeed for LedgerFeed {
    fn current_snapshot(&self) -> Result<Vec<Transaction>> {
        repository::get_recent_transactions(&self.conn, &self.owner_id, self.history_limit)
    }

    fn on_change(&mut self, listener: ChangeListener) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}
