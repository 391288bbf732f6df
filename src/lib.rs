#![doc(test(attr(deny(warnings))))]

//! Lot Ledger keeps an append-only journal of commodity purchases and sales and
//! derives FIFO lot inventory, realized cost basis, and revenue by replaying it.
//!
//! The domain, core, storage, and config layers live in their own crates and are
//! re-exported here; this crate adds tracing setup, report export, and the shell.

pub mod cli;
pub mod currency;
pub mod errors;
pub mod report;
pub mod utils;

pub use lotledger_config as config;
pub use lotledger_core as core;
pub use lotledger_domain as domain;
pub use lotledger_storage_json as storage;

pub use errors::LotLedgerError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Lot Ledger tracing initialized.");
    });
}
