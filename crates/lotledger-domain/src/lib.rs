//! lotledger-domain
//!
//! Pure domain models (events, journal, lots, statistics).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod event;
pub mod journal;
pub mod lot;
pub mod snapshot;

pub use common::*;
pub use event::*;
pub use journal::*;
pub use lot::*;
pub use snapshot::*;
