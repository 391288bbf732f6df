//! Aggregate valuations over a replayed [`DerivedState`].

use lotledger_domain::{DerivedState, Statistics};

/// Pure aggregation helpers; every function is total over any derived state.
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Computes all totals in one pass over the lots.
    pub fn compute(state: &DerivedState) -> Statistics {
        Statistics {
            acquisition_value: Self::acquisition_value(state),
            orig_value: Self::orig_value(state),
            sell_value: Self::sell_value(state),
            open_quantity: Self::open_quantity(state),
            sold_quantity: Self::sold_quantity(state),
        }
    }

    /// Cost basis of unsold inventory.
    pub fn acquisition_value(state: &DerivedState) -> f64 {
        state.open_lots().map(|lot| lot.remaining_value()).sum()
    }

    /// Realized cost basis of everything liquidated.
    pub fn orig_value(state: &DerivedState) -> f64 {
        state.used_lots.iter().map(|used| used.orig_value()).sum()
    }

    /// Realized revenue of everything liquidated.
    pub fn sell_value(state: &DerivedState) -> f64 {
        state.used_lots.iter().map(|used| used.sell_value()).sum()
    }

    pub fn open_quantity(state: &DerivedState) -> f64 {
        state.open_lots().map(|lot| lot.remaining_quantity).sum()
    }

    pub fn sold_quantity(state: &DerivedState) -> f64 {
        state.used_lots.iter().map(|used| used.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::replay;
    use chrono::NaiveDate;
    use lotledger_domain::{Event, EventDraft, EventId};

    fn scenario() -> Vec<Event> {
        let at = |day: u32| {
            NaiveDate::from_ymd_opt(2023, 11, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        vec![
            EventDraft::purchase(10.0, 5.0, at(1)).into_event(EventId(1)),
            EventDraft::purchase(5.0, 6.0, at(2)).into_event(EventId(2)),
            EventDraft::liquidation(12.0, 8.0, at(3)).into_event(EventId(3)),
        ]
    }

    #[test]
    fn empty_state_has_zero_totals() {
        let stats = StatisticsEngine::compute(&DerivedState::default());
        assert_eq!(stats, Statistics::default());
        assert_eq!(stats.realized_gain(), 0.0);
    }

    #[test]
    fn totals_match_partial_lot_consumption() {
        let state = replay(&scenario()).unwrap();
        let stats = StatisticsEngine::compute(&state);
        assert_eq!(stats.acquisition_value, 18.0);
        assert_eq!(stats.orig_value, 62.0);
        assert_eq!(stats.sell_value, 96.0);
        assert_eq!(stats.open_quantity, 3.0);
        assert_eq!(stats.sold_quantity, 12.0);
        assert_eq!(stats.realized_gain(), 34.0);
    }
}
