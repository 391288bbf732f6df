use chrono::{NaiveDate, NaiveDateTime};
use lotledger_core::{replay, CoreError, LedgerStatus, LotLedger, StatisticsEngine};
use lotledger_domain::{is_negligible, EventDraft, EventId, Journal};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// A mixed history that never oversells.
fn busy_ledger() -> LotLedger {
    let ledger = LotLedger::new("Properties");
    ledger.record_purchase(4.0, 10.0, at(1, 9)).unwrap();
    ledger.record_purchase(6.0, 12.0, at(2, 9)).unwrap();
    ledger.record_liquidation(5.0, 15.0, at(3, 9)).unwrap();
    ledger.record_purchase(2.5, 11.0, at(3, 10)).unwrap();
    ledger.record_liquidation(3.0, 14.0, at(4, 9)).unwrap();
    ledger.record_liquidation(0.5, 20.0, at(5, 9)).unwrap();
    ledger
}

#[test]
fn replay_is_deterministic() {
    let ledger = busy_ledger();
    let events = ledger.transactions();
    let first = replay(&events).unwrap();
    let second = replay(&events).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, ledger.derived_state());
}

#[test]
fn every_purchase_quantity_is_conserved() {
    let ledger = busy_ledger();
    let state = ledger.derived_state();

    for event in ledger.transactions() {
        let Some(purchase) = event.as_purchase() else {
            continue;
        };
        let lot = state.lot(purchase.id).expect("lot for purchase");
        let consumed: f64 = state.consumed_from(purchase.id).map(|u| u.quantity).sum();
        assert!(
            is_negligible(lot.remaining_quantity + consumed - purchase.quantity),
            "lot {} leaks quantity",
            purchase.id
        );
    }
}

#[test]
fn each_liquidation_is_fully_covered() {
    let ledger = busy_ledger();
    let state = ledger.derived_state();

    for event in ledger.transactions() {
        let Some(sale) = event.as_liquidation() else {
            continue;
        };
        let covered: f64 = state.used_by(sale.id).map(|u| u.quantity).sum();
        assert!(is_negligible(covered - sale.quantity));
    }
}

#[test]
fn no_lot_is_consumed_while_an_older_one_has_stock() {
    let ledger = busy_ledger();
    let state = ledger.derived_state();
    let open_keys: Vec<_> = state.open_lots().map(|lot| lot.fifo_key()).collect();

    for used in &state.used_lots {
        let consumed_key = state.lot(used.purchase_id).unwrap().fifo_key();
        assert!(
            open_keys.iter().all(|open| *open >= consumed_key),
            "FIFO violated by purchase {}",
            used.purchase_id
        );
    }
}

#[test]
fn statistics_follow_their_definitions() {
    let ledger = busy_ledger();
    let state = ledger.derived_state();
    let stats = ledger.statistics();

    let acquisition: f64 = state
        .open_lots()
        .map(|lot| lot.remaining_quantity * lot.unit_price)
        .sum();
    let orig: f64 = state.used_lots.iter().map(|u| u.quantity * u.unit_price).sum();
    let sell: f64 = state
        .used_lots
        .iter()
        .map(|u| u.quantity * u.selling_price)
        .sum();

    assert_eq!(stats, StatisticsEngine::compute(&state));
    assert!(is_negligible(stats.acquisition_value - acquisition));
    assert!(is_negligible(stats.orig_value - orig));
    assert!(is_negligible(stats.sell_value - sell));
    assert!(is_negligible(stats.open_quantity - 4.0));
    assert!(is_negligible(stats.sold_quantity - 8.5));
}

#[test]
fn rejected_liquidation_is_all_or_nothing() {
    let ledger = busy_ledger();
    let before = ledger.snapshot();
    let journal_before = ledger.journal();

    let err = ledger.record_liquidation(4.5, 30.0, at(6, 9)).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientInventory { .. }));
    assert_eq!(ledger.snapshot(), before);
    assert_eq!(ledger.journal(), journal_before);
    assert_eq!(ledger.status(), LedgerStatus::RolledBack);

    ledger.record_liquidation(4.0, 30.0, at(6, 9)).unwrap();
    assert_eq!(ledger.status(), LedgerStatus::Consistent);
    assert!(ledger.open_lots().is_empty());
}

#[test]
fn removal_result_equals_replay_of_remaining_history() {
    let ledger = busy_ledger();
    ledger.remove_transaction(EventId(6)).unwrap();

    let mut journal = Journal::new("Expected");
    journal.append(EventDraft::purchase(4.0, 10.0, at(1, 9))).unwrap();
    journal.append(EventDraft::purchase(6.0, 12.0, at(2, 9))).unwrap();
    journal.append(EventDraft::liquidation(5.0, 15.0, at(3, 9))).unwrap();
    journal.append(EventDraft::purchase(2.5, 11.0, at(3, 10))).unwrap();
    journal.append(EventDraft::liquidation(3.0, 14.0, at(4, 9))).unwrap();
    let expected = replay(&journal.list_ordered()).unwrap();

    assert_eq!(ledger.derived_state(), expected);
}

#[test]
fn journal_reload_reproduces_state() {
    let ledger = busy_ledger();
    let reloaded = LotLedger::from_journal(ledger.journal()).unwrap();
    assert_eq!(reloaded.snapshot(), ledger.snapshot());

    let next = reloaded.record_purchase(1.0, 1.0, at(7, 9)).unwrap();
    assert_eq!(next.event_id, EventId(7));
}
