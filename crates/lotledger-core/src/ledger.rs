//! The ledger facade: the single entry point that serializes commands against
//! the journal and keeps the last consistent derived state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use lotledger_domain::{
    is_negligible, DerivedState, Event, EventDraft, EventId, Journal, LedgerSnapshot, OpenLot,
    Statistics, UsedLot,
};

use crate::command::{CommandResponse, LedgerCommand, Receipt};
use crate::error::{CoreError, ReplayError};
use crate::journal_service::JournalService;
use crate::replay::replay;
use crate::statistics::StatisticsEngine;
use crate::validation::{validate_draft, validate_quantity};

/// Outcome of the most recent command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerStatus {
    /// The last replay succeeded.
    #[default]
    Consistent,
    /// The last command was rejected and undone; the previous state is in effect.
    RolledBack,
}

/// Owns the journal and its derived state behind a single exclusive lock.
///
/// Every command, read or write, runs while holding the lock, so callers see
/// either the post-replay state or a rejection. Values handed out are copies.
pub struct LotLedger {
    inner: Mutex<LedgerInner>,
}

struct LedgerInner {
    journal: Journal,
    derived: DerivedState,
    statistics: Statistics,
    status: LedgerStatus,
}

impl LotLedger {
    /// Creates an empty ledger backed by a fresh journal.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(Journal::new(name), DerivedState::default())
    }

    /// Adopts an existing journal, failing if its history does not replay.
    pub fn from_journal(mut journal: Journal) -> Result<Self, CoreError> {
        journal.reconcile_next_id()?;
        let ordered = JournalService::list_ordered(&journal);
        let derived = replay(&ordered)?;
        info!(
            journal = %journal.name,
            events = journal.event_count(),
            "journal loaded"
        );
        Ok(Self::with_state(journal, derived))
    }

    fn with_state(journal: Journal, derived: DerivedState) -> Self {
        let statistics = StatisticsEngine::compute(&derived);
        Self {
            inner: Mutex::new(LedgerInner {
                journal,
                derived,
                statistics,
                status: LedgerStatus::Consistent,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerInner> {
        // A failed command always leaves the journal restored, so the guarded
        // state stays valid even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dispatches one command from the closed command set.
    pub fn execute(&self, command: LedgerCommand) -> Result<CommandResponse, CoreError> {
        match command {
            LedgerCommand::RecordPurchase {
                quantity,
                unit_price,
                timestamp,
            } => self
                .record_purchase(quantity, unit_price, timestamp)
                .map(CommandResponse::Recorded),
            LedgerCommand::RecordLiquidation {
                quantity,
                selling_price,
                timestamp,
            } => self
                .record_liquidation(quantity, selling_price, timestamp)
                .map(CommandResponse::Recorded),
            LedgerCommand::RemoveTransaction { id } => {
                self.remove_transaction(id).map(CommandResponse::Updated)
            }
            LedgerCommand::AmendTransaction { id, draft } => self
                .amend_transaction(id, draft)
                .map(CommandResponse::Updated),
            LedgerCommand::Resynchronize => self.resynchronize().map(CommandResponse::Updated),
            LedgerCommand::ListOpenInventory => Ok(CommandResponse::OpenInventory(self.open_lots())),
            LedgerCommand::ListUsedInventory => Ok(CommandResponse::UsedInventory(self.used_lots())),
            LedgerCommand::ComputeStatistics => Ok(CommandResponse::Statistics(self.statistics())),
            LedgerCommand::ListAllTransactions => {
                Ok(CommandResponse::Transactions(self.transactions()))
            }
        }
    }

    pub fn record_purchase(
        &self,
        quantity: f64,
        unit_price: f64,
        timestamp: NaiveDateTime,
    ) -> Result<Receipt, CoreError> {
        self.record(EventDraft::purchase(quantity, unit_price, timestamp))
    }

    pub fn record_liquidation(
        &self,
        quantity: f64,
        selling_price: f64,
        timestamp: NaiveDateTime,
    ) -> Result<Receipt, CoreError> {
        self.record(EventDraft::liquidation(quantity, selling_price, timestamp))
    }

    /// Validates, appends, and replays `draft`; the append is undone if replay fails.
    pub fn record(&self, draft: EventDraft) -> Result<Receipt, CoreError> {
        let mut inner = self.lock();
        let event_id = inner.record(draft)?;
        Ok(Receipt {
            event_id,
            snapshot: inner.snapshot(),
        })
    }

    /// Removes an event; restored again if the remaining history oversells.
    pub fn remove_transaction(&self, id: EventId) -> Result<LedgerSnapshot, CoreError> {
        let mut inner = self.lock();
        inner.remove(id)?;
        Ok(inner.snapshot())
    }

    /// Replaces the event stored under `id`; the previous contents come back on failure.
    pub fn amend_transaction(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<LedgerSnapshot, CoreError> {
        let mut inner = self.lock();
        inner.amend(id, draft)?;
        Ok(inner.snapshot())
    }

    /// Forces a full replay without touching the journal.
    pub fn resynchronize(&self) -> Result<LedgerSnapshot, CoreError> {
        let mut inner = self.lock();
        inner.resynchronize()?;
        Ok(inner.snapshot())
    }

    pub fn open_lots(&self) -> Vec<OpenLot> {
        self.lock().derived.open_lots().cloned().collect()
    }

    pub fn used_lots(&self) -> Vec<UsedLot> {
        self.lock().derived.used_lots.clone()
    }

    pub fn statistics(&self) -> Statistics {
        self.lock().statistics
    }

    /// Every journal event in replay order.
    pub fn transactions(&self) -> Vec<Event> {
        JournalService::list_ordered(&self.lock().journal)
    }

    pub fn transaction(&self, id: EventId) -> Option<Event> {
        self.lock().journal.get(id).cloned()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.lock().snapshot()
    }

    /// Copy of the full derived state, exhausted lots included.
    pub fn derived_state(&self) -> DerivedState {
        self.lock().derived.clone()
    }

    /// Copy of the journal, suitable for persistence.
    pub fn journal(&self) -> Journal {
        self.lock().journal.clone()
    }

    /// Journal copy and snapshot taken under one lock.
    pub fn journal_and_snapshot(&self) -> (Journal, LedgerSnapshot) {
        let inner = self.lock();
        (inner.journal.clone(), inner.snapshot())
    }

    pub fn name(&self) -> String {
        self.lock().journal.name.clone()
    }

    pub fn rename(&self, name: impl Into<String>) {
        let mut inner = self.lock();
        inner.journal.name = name.into();
        inner.journal.touch();
    }

    pub fn status(&self) -> LedgerStatus {
        self.lock().status
    }

    pub fn event_count(&self) -> usize {
        self.lock().journal.event_count()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.lock().journal.updated_at
    }

    /// Total remaining quantity across open lots.
    pub fn available_quantity(&self) -> f64 {
        self.lock().statistics.open_quantity
    }

    /// Whether a liquidation of `quantity` dated after all history would succeed.
    pub fn can_liquidate(&self, quantity: f64) -> bool {
        if validate_quantity(quantity).is_err() {
            return false;
        }
        let available = self.available_quantity();
        quantity <= available || is_negligible(quantity - available)
    }
}

impl LedgerInner {
    fn record(&mut self, draft: EventDraft) -> Result<EventId, CoreError> {
        validate_draft(&draft)?;
        let kind = draft.kind();
        let previous_next_id = self.journal.next_id;
        let previous_updated_at = self.journal.updated_at;
        let id = JournalService::append(&mut self.journal, draft)?;

        if let Err(err) = self.rebuild() {
            self.journal.remove(id);
            self.journal.next_id = previous_next_id;
            self.journal.updated_at = previous_updated_at;
            return Err(self.rolled_back("record", err));
        }
        self.status = LedgerStatus::Consistent;
        info!(event_id = %id, %kind, "event recorded");
        Ok(id)
    }

    fn remove(&mut self, id: EventId) -> Result<(), CoreError> {
        let previous_updated_at = self.journal.updated_at;
        let removed = JournalService::remove(&mut self.journal, id)?;

        if let Err(err) = self.rebuild() {
            JournalService::restore(&mut self.journal, removed);
            self.journal.updated_at = previous_updated_at;
            return Err(self.rolled_back("remove", err));
        }
        self.status = LedgerStatus::Consistent;
        info!(event_id = %id, "event removed");
        Ok(())
    }

    fn amend(&mut self, id: EventId, draft: EventDraft) -> Result<(), CoreError> {
        validate_draft(&draft)?;
        let previous_updated_at = self.journal.updated_at;
        let previous = JournalService::replace(&mut self.journal, id, draft)?;

        if let Err(err) = self.rebuild() {
            JournalService::restore(&mut self.journal, previous);
            self.journal.updated_at = previous_updated_at;
            return Err(self.rolled_back("amend", err));
        }
        self.status = LedgerStatus::Consistent;
        info!(event_id = %id, "event amended");
        Ok(())
    }

    fn resynchronize(&mut self) -> Result<(), CoreError> {
        if let Err(err) = self.rebuild() {
            return Err(self.rolled_back("resynchronize", err));
        }
        self.status = LedgerStatus::Consistent;
        info!(events = self.journal.event_count(), "ledger resynchronized");
        Ok(())
    }

    /// Replays the whole journal; derived state is only replaced on success.
    fn rebuild(&mut self) -> Result<(), ReplayError> {
        let ordered = JournalService::list_ordered(&self.journal);
        let derived = replay(&ordered)?;
        self.statistics = StatisticsEngine::compute(&derived);
        self.derived = derived;
        Ok(())
    }

    fn rolled_back(&mut self, command: &str, err: ReplayError) -> CoreError {
        warn!(
            command,
            liquidation_id = %err.liquidation_id(),
            shortfall = err.shortfall(),
            "command rejected, journal rolled back"
        );
        self.status = LedgerStatus::RolledBack;
        err.into()
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            open_lots: self.derived.open_lots().cloned().collect(),
            used_lots: self.derived.used_lots.clone(),
            statistics: self.statistics,
            transactions: JournalService::list_ordered(&self.journal),
        }
    }
}
