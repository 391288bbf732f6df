//! Deterministic reconstruction of derived inventory state from the journal.

use tracing::debug;

use lotledger_domain::{
    DerivedState, Displayable, Event, LiquidationEvent, OpenLot, PurchaseEvent, UsedLot,
};

use crate::allocator::allocate;
use crate::error::ReplayError;

/// Replays `ordered_events` from an empty state.
///
/// Events must already be sorted by `(timestamp, id)`; [`Journal::list_ordered`]
/// produces exactly that sequence. Each call builds a fresh [`DerivedState`], so
/// identical input always yields identical output.
///
/// [`Journal::list_ordered`]: lotledger_domain::Journal::list_ordered
pub fn replay<'a, I>(ordered_events: I) -> Result<DerivedState, ReplayError>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut state = DerivedState::default();
    let mut replayed = 0usize;
    for event in ordered_events {
        debug!(event = %event.display_label(), "replaying event");
        match event {
            Event::Purchase(purchase) => apply_purchase(&mut state, purchase),
            Event::Liquidation(liquidation) => apply_liquidation(&mut state, liquidation)?,
        }
        replayed += 1;
    }
    debug!(
        replayed,
        lots = state.lots.len(),
        used = state.used_lots.len(),
        "replay complete"
    );
    Ok(state)
}

fn apply_purchase(state: &mut DerivedState, purchase: &PurchaseEvent) {
    let lot = OpenLot::new(
        purchase.id,
        purchase.quantity,
        purchase.unit_price,
        purchase.timestamp,
    );
    debug!(lot = %lot.display_label(), "lot opened");
    state.lots.push(lot);
}

fn apply_liquidation(
    state: &mut DerivedState,
    liquidation: &LiquidationEvent,
) -> Result<(), ReplayError> {
    let plan = allocate(&state.lots, liquidation.quantity).map_err(|shortage| {
        ReplayError::InsufficientInventory {
            liquidation_id: liquidation.id,
            shortfall: shortage.shortfall,
        }
    })?;

    for slice in plan.allocations {
        let lot = &mut state.lots[slice.lot_index];
        lot.remaining_quantity -= slice.quantity;
        if lot.is_exhausted() {
            lot.remaining_quantity = 0.0;
        }
        let used = UsedLot {
            purchase_id: lot.purchase_id,
            liquidation_id: liquidation.id,
            quantity: slice.quantity,
            unit_price: lot.unit_price,
            selling_price: liquidation.selling_price,
            liquidated_at: liquidation.timestamp,
        };
        debug!(slice = %used.display_label(), "lot consumed");
        state.used_lots.push(used);
    }
    Ok(())
}
