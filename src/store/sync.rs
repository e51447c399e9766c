//! Reconciliation between the engine and the persisted stats record.
//!
//! Hydration is one-way: whenever the stored record changes, its counters
//! overwrite the engine's. Writes go the other way through a small outbox
//! that is flushed once per frame and never blocks the engine.

use crate::frog::logic;
use crate::frog::state::FrogState;
use crate::time::to_datetime;

use super::{StatsMerge, Store};

#[derive(Clone, Debug, PartialEq)]
struct PendingPurchase {
    item_id: &'static str,
    name: &'static str,
    cost: u64,
    at_ms: f64,
}

pub struct StatsSync {
    owner_id: String,
    /// Revision of the record last applied or written by us.
    last_revision: Option<u64>,
    /// Only the newest merge matters: each carries full totals.
    pending: Option<StatsMerge>,
    purchases: Vec<PendingPurchase>,
    /// Writes dropped since the session started.
    pub failures: u32,
}

impl StatsSync {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            last_revision: None,
            pending: None,
            purchases: Vec::new(),
            failures: 0,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Session start: restore owned upgrades from the purchases ledger, then
    /// hydrate the counters.
    pub fn restore(&mut self, store: &dyn Store, state: &mut FrogState) {
        match store.purchases(&self.owner_id) {
            Ok(records) => {
                for record in records {
                    if !logic::restore_upgrade(state, &record.item_id, record.quantity) {
                        crate::console::warn(&format!("unknown upgrade in ledger: {}", record.item_id));
                    }
                }
            }
            Err(e) => crate::console::warn(&format!("could not load purchases: {e}")),
        }
        self.poll(store, state);
    }

    /// Hydrate if the stored record changed since we last saw it.
    /// Returns true when the engine was overwritten.
    pub fn poll(&mut self, store: &dyn Store, state: &mut FrogState) -> bool {
        let record = match store.stats(&self.owner_id) {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                crate::console::warn(&format!("could not read stats: {e}"));
                return false;
            }
        };
        if self.last_revision == Some(record.revision) {
            return false;
        }
        self.last_revision = Some(record.revision);
        logic::hydrate(state, record.total_frogs, record.total_clicks);
        true
    }

    /// Queue a merge of the current totals, replacing any unsent one.
    pub fn queue(&mut self, state: &FrogState, now_ms: f64) {
        self.pending = Some(StatsMerge {
            total_frogs: state.game.total_frogs,
            total_clicks: state.game.total_clicks,
            frogs_per_second: state.game.frogs_per_second,
            last_active_at: to_datetime(now_ms),
        });
    }

    pub fn queue_purchase(&mut self, item_id: &'static str, name: &'static str, cost: u64, now_ms: f64) {
        self.purchases.push(PendingPurchase {
            item_id,
            name,
            cost,
            at_ms: now_ms,
        });
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || !self.purchases.is_empty()
    }

    /// Send everything queued. Failures are logged and dropped; the next
    /// interaction queues fresh totals anyway.
    pub fn flush(&mut self, store: &mut dyn Store) {
        for purchase in std::mem::take(&mut self.purchases) {
            if let Err(e) = store.record_purchase(
                &self.owner_id,
                purchase.item_id,
                purchase.name,
                purchase.cost,
                to_datetime(purchase.at_ms),
            ) {
                self.failures += 1;
                crate::console::warn(&format!("purchase of {} not saved: {e}", purchase.item_id));
            }
        }

        if let Some(merge) = self.pending.take() {
            match store.merge_stats(&self.owner_id, &merge) {
                // our own write must not come back as a hydration
                Ok(revision) => self.last_revision = Some(revision),
                Err(e) => {
                    self.failures += 1;
                    crate::console::warn(&format!("stats not saved: {e}"));
                }
            }
        }
    }
}
