//! Derived inventory records produced by replaying the journal.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Inventory still attributable to a single purchase.
pub struct OpenLot {
    pub purchase_id: EventId,
    pub original_quantity: f64,
    pub remaining_quantity: f64,
    pub unit_price: f64,
    pub purchased_at: NaiveDateTime,
}

impl OpenLot {
    pub fn new(
        purchase_id: EventId,
        quantity: f64,
        unit_price: f64,
        purchased_at: NaiveDateTime,
    ) -> Self {
        Self {
            purchase_id,
            original_quantity: quantity,
            remaining_quantity: quantity,
            unit_price,
            purchased_at,
        }
    }

    /// FIFO key: oldest purchase first, purchase id breaking ties.
    pub fn fifo_key(&self) -> (NaiveDateTime, EventId) {
        (self.purchased_at, self.purchase_id)
    }

    pub fn is_exhausted(&self) -> bool {
        is_negligible(self.remaining_quantity)
    }

    pub fn consumed_quantity(&self) -> f64 {
        self.original_quantity - self.remaining_quantity
    }

    /// Cost basis of the unsold remainder.
    pub fn remaining_value(&self) -> f64 {
        self.remaining_quantity * self.unit_price
    }
}

impl Displayable for OpenLot {
    fn display_label(&self) -> String {
        format!(
            "lot {} {} of {} @ {}",
            self.purchase_id, self.remaining_quantity, self.original_quantity, self.unit_price
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Quantity consumed from one lot by one liquidation.
pub struct UsedLot {
    pub purchase_id: EventId,
    pub liquidation_id: EventId,
    pub quantity: f64,
    pub unit_price: f64,
    pub selling_price: f64,
    pub liquidated_at: NaiveDateTime,
}

impl UsedLot {
    /// Realized cost basis of this slice.
    pub fn orig_value(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Realized revenue of this slice.
    pub fn sell_value(&self) -> f64 {
        self.quantity * self.selling_price
    }

    pub fn realized_gain(&self) -> f64 {
        self.sell_value() - self.orig_value()
    }
}

impl Displayable for UsedLot {
    fn display_label(&self) -> String {
        format!(
            "{} from lot {} ({} @ {} -> {})",
            self.liquidation_id, self.purchase_id, self.quantity, self.unit_price, self.selling_price
        )
    }
}
