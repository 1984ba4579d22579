
pub mod ledger_feed;
pub mod live;

use crate::error::Result;
use crate::models::transaction::Transaction;

pub type SubscriptionId = u64;

pub type ChangeListener = Box<dyn FnMut(&[Transaction])>;

pub trait TransactionFeed {
    fn current_snapshot(&self) -> Result<Vec<Transaction>>;

    /// Registers `listener` for future changes. The current snapshot is not
    /// replayed; call `current_snapshot` for the initial state.
    fn on_change(&mut self, listener: ChangeListener) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
