//! lotledger-core
//!
//! Business logic for the lot ledger: journal commands, FIFO allocation,
//! replay, statistics, and the ledger facade.
//! Depends on lotledger-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod allocator;
pub mod command;
pub mod error;
pub mod journal_service;
pub mod ledger;
pub mod replay;
pub mod statistics;
pub mod storage;
pub mod time;
pub mod validation;


pub use allocator::{allocate, Allocation, AllocationPlan, InsufficientInventory};
pub use command::{CommandResponse, LedgerCommand};
pub use error::{CoreError, ReplayError};
pub use journal_service::JournalService;
pub use ledger::{LedgerStatus, LotLedger};
pub use replay::replay;
pub use statistics::StatisticsEngine;
pub use time::Clock;
