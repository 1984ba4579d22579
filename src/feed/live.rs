use super::{SubscriptionId, TransactionFeed};
use crate::error::Result;
use crate::models::statistics::Statistics;
use crate::models::transaction::Transaction;
use crate::operations::summary::compute_statistics;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Default)]
struct LiveState {
    snapshot: Vec<Transaction>,
    statistics: Statistics,
}

// Clones share state: the feed listener holds one, the reader another.
#[derive(Debug, Clone, Default)]
pub struct LiveStatistics {
    state: Rc<RefCell<LiveState>>,
}

impl LiveStatistics {
    pub fn attach<F: TransactionFeed + ?Sized>(feed: &mut F) -> Result<(Self, SubscriptionId)> {
        let live = Self::default();
        live.apply(&feed.current_snapshot()?);

        let listener = live.clone();
        let id = feed.on_change(Box::new(move |snapshot: &[Transaction]| listener.apply(snapshot)));
        Ok((live, id))
    }

    pub fn apply(&self, snapshot: &[Transaction]) {
        let statistics = compute_statistics(snapshot);
        debug!(records = snapshot.len(), savings = %statistics.savings, "statistics recomputed");

        let mut state = self.state.borrow_mut();
        state.snapshot = snapshot.to_vec();
        state.statistics = statistics;
    }

    pub fn statistics(&self) -> Statistics {
        self.state.borrow().statistics.clone()
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.state.borrow().snapshot.clone()
    }
}
