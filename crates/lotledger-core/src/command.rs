//! Closed set of commands accepted by [`LotLedger::execute`].
//!
//! [`LotLedger::execute`]: crate::LotLedger::execute

use chrono::NaiveDateTime;

use lotledger_domain::{
    Event, EventDraft, EventId, LedgerSnapshot, OpenLot, Statistics, UsedLot,
};

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    RecordPurchase {
        quantity: f64,
        unit_price: f64,
        timestamp: NaiveDateTime,
    },
    RecordLiquidation {
        quantity: f64,
        selling_price: f64,
        timestamp: NaiveDateTime,
    },
    RemoveTransaction {
        id: EventId,
    },
    AmendTransaction {
        id: EventId,
        draft: EventDraft,
    },
    Resynchronize,
    ListOpenInventory,
    ListUsedInventory,
    ComputeStatistics,
    ListAllTransactions,
}

impl LedgerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::RecordPurchase { .. } => "record_purchase",
            LedgerCommand::RecordLiquidation { .. } => "record_liquidation",
            LedgerCommand::RemoveTransaction { .. } => "remove_transaction",
            LedgerCommand::AmendTransaction { .. } => "amend_transaction",
            LedgerCommand::Resynchronize => "resynchronize",
            LedgerCommand::ListOpenInventory => "list_open_inventory",
            LedgerCommand::ListUsedInventory => "list_used_inventory",
            LedgerCommand::ComputeStatistics => "compute_statistics",
            LedgerCommand::ListAllTransactions => "list_all_transactions",
        }
    }

    /// Whether the command mutates the journal.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            LedgerCommand::RecordPurchase { .. }
                | LedgerCommand::RecordLiquidation { .. }
                | LedgerCommand::RemoveTransaction { .. }
                | LedgerCommand::AmendTransaction { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    /// A new event was committed.
    Recorded(Receipt),
    /// The journal changed (or was replayed) without creating an event.
    Updated(LedgerSnapshot),
    OpenInventory(Vec<OpenLot>),
    UsedInventory(Vec<UsedLot>),
    Statistics(Statistics),
    Transactions(Vec<Event>),
}

/// Outcome of a successful record command.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub event_id: EventId,
    pub snapshot: LedgerSnapshot,
}
