//! Derived state and aggregate totals handed out as read-only snapshots.

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::event::Event;
use crate::lot::{OpenLot, UsedLot};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Output of one replay pass. Rebuilt from scratch on every replay.
pub struct DerivedState {
    /// One entry per replayed purchase, exhausted lots included, in FIFO order.
    pub lots: Vec<OpenLot>,
    pub used_lots: Vec<UsedLot>,
}

impl DerivedState {
    /// Lots with remaining quantity, oldest first.
    pub fn open_lots(&self) -> impl Iterator<Item = &OpenLot> {
        self.lots.iter().filter(|lot| !lot.is_exhausted())
    }

    pub fn lot(&self, purchase_id: EventId) -> Option<&OpenLot> {
        self.lots.iter().find(|lot| lot.purchase_id == purchase_id)
    }

    /// Used-lot records produced by a single liquidation.
    pub fn used_by(&self, liquidation_id: EventId) -> impl Iterator<Item = &UsedLot> {
        self.used_lots
            .iter()
            .filter(move |used| used.liquidation_id == liquidation_id)
    }

    /// Used-lot records drawn from a single purchase.
    pub fn consumed_from(&self, purchase_id: EventId) -> impl Iterator<Item = &UsedLot> {
        self.used_lots
            .iter()
            .filter(move |used| used.purchase_id == purchase_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// Aggregate values over a [`DerivedState`].
pub struct Statistics {
    /// Cost basis of unsold inventory.
    pub acquisition_value: f64,
    /// Realized cost basis.
    pub orig_value: f64,
    /// Realized revenue.
    pub sell_value: f64,
    pub open_quantity: f64,
    pub sold_quantity: f64,
}

impl Statistics {
    pub fn realized_gain(&self) -> f64 {
        self.sell_value - self.orig_value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Read-only copy of everything a client may display or export.
pub struct LedgerSnapshot {
    pub open_lots: Vec<OpenLot>,
    pub used_lots: Vec<UsedLot>,
    pub statistics: Statistics,
    pub transactions: Vec<Event>,
}
