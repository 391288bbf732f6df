//! FIFO lot allocation.
//!
//! Walks lots oldest-first by `(purchase timestamp, purchase id)` and consumes
//! `min(remaining, needed)` from each until the request is covered. The plan is
//! only a description of what would be consumed; nothing is mutated here, so a
//! failed allocation leaves no trace.

use thiserror::Error;
use tracing::debug;

use lotledger_domain::{is_negligible, EventId, OpenLot};

/// One slice of a liquidation drawn from a single lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    /// Position of the lot in the slice handed to [`allocate`].
    pub lot_index: usize,
    pub purchase_id: EventId,
    pub quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationPlan {
    pub allocations: Vec<Allocation>,
}

impl AllocationPlan {
    pub fn total_quantity(&self) -> f64 {
        self.allocations.iter().map(|slice| slice.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("requested {requested} but only {available} available (short by {shortfall})")]
pub struct InsufficientInventory {
    pub requested: f64,
    pub available: f64,
    pub shortfall: f64,
}

/// Plans the FIFO consumption of `quantity_needed` from `lots`.
///
/// Lots are visited in `(purchased_at, purchase_id)` order regardless of their
/// position in the slice, and exhausted lots are skipped.
pub fn allocate(
    lots: &[OpenLot],
    quantity_needed: f64,
) -> Result<AllocationPlan, InsufficientInventory> {
    let mut order: Vec<usize> = (0..lots.len())
        .filter(|&idx| !lots[idx].is_exhausted())
        .collect();
    order.sort_by_key(|&idx| lots[idx].fifo_key());

    let mut outstanding = quantity_needed;
    let mut plan = AllocationPlan::default();

    for idx in order {
        if is_negligible(outstanding) {
            break;
        }
        let lot = &lots[idx];
        // Taking the whole lot when it is within tolerance of the request avoids dust.
        let take = if lot.remaining_quantity <= outstanding
            || is_negligible(lot.remaining_quantity - outstanding)
        {
            lot.remaining_quantity
        } else {
            outstanding
        };
        debug!(
            purchase_id = %lot.purchase_id,
            take,
            remaining = lot.remaining_quantity,
            "allocating from lot"
        );
        plan.allocations.push(Allocation {
            lot_index: idx,
            purchase_id: lot.purchase_id,
            quantity: take,
        });
        outstanding -= take;
    }

    if !is_negligible(outstanding) && outstanding > 0.0 {
        let available = quantity_needed - outstanding;
        return Err(InsufficientInventory {
            requested: quantity_needed,
            available,
            shortfall: outstanding,
        });
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn lot(id: u64, quantity: f64, price: f64, day: u32) -> OpenLot {
        OpenLot::new(EventId(id), quantity, price, at(day))
    }

    #[test]
    fn consumes_oldest_lot_first_and_splits_the_next() {
        let lots = vec![lot(1, 10.0, 5.0, 1), lot(2, 5.0, 6.0, 2)];
        let plan = allocate(&lots, 12.0).expect("enough inventory");

        assert_eq!(
            plan.allocations,
            vec![
                Allocation {
                    lot_index: 0,
                    purchase_id: EventId(1),
                    quantity: 10.0
                },
                Allocation {
                    lot_index: 1,
                    purchase_id: EventId(2),
                    quantity: 2.0
                },
            ]
        );
        assert_eq!(plan.total_quantity(), 12.0);
    }

    #[test]
    fn orders_by_purchase_date_not_slice_position() {
        let lots = vec![lot(5, 10.0, 150.0, 2), lot(6, 10.0, 100.0, 1)];
        let plan = allocate(&lots, 5.0).unwrap();
        assert_eq!(plan.allocations.len(), 1);
        assert_eq!(plan.allocations[0].purchase_id, EventId(6));
        assert_eq!(plan.allocations[0].lot_index, 1);
    }

    #[test]
    fn equal_timestamps_fall_back_to_purchase_id() {
        let lots = vec![lot(9, 4.0, 1.0, 3), lot(4, 4.0, 2.0, 3)];
        let plan = allocate(&lots, 6.0).unwrap();
        let ids: Vec<EventId> = plan.allocations.iter().map(|a| a.purchase_id).collect();
        assert_eq!(ids, vec![EventId(4), EventId(9)]);
    }

    #[test]
    fn skips_exhausted_lots() {
        let mut spent = lot(1, 10.0, 5.0, 1);
        spent.remaining_quantity = 0.0;
        let lots = vec![spent, lot(2, 5.0, 6.0, 2)];
        let plan = allocate(&lots, 1.0).unwrap();
        assert_eq!(plan.allocations[0].purchase_id, EventId(2));
    }

    #[test]
    fn reports_shortfall_when_lots_run_out() {
        let lots = vec![lot(1, 3.0, 6.0, 1)];
        let err = allocate(&lots, 5.0).expect_err("not enough inventory");
        assert_eq!(err.requested, 5.0);
        assert_eq!(err.available, 3.0);
        assert_eq!(err.shortfall, 2.0);
    }

    #[test]
    fn empty_inventory_is_a_full_shortfall() {
        let err = allocate(&[], 4.0).unwrap_err();
        assert_eq!(err.shortfall, 4.0);
        assert_eq!(err.available, 0.0);
    }

    #[test]
    fn fractional_requests_do_not_leave_dust() {
        let lots = vec![lot(1, 0.3, 1.0, 1), lot(2, 1.0, 1.0, 2)];
        let plan = allocate(&lots, 0.1 + 0.2).unwrap();
        assert_eq!(plan.allocations.len(), 1);
        assert_eq!(plan.allocations[0].quantity, 0.3);
    }
}
