use std::io;

use lotledger_domain::{EventId, JournalError, TimestampError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient inventory: short by {shortfall}{}", liquidation_label(.liquidation_id))]
    InsufficientInventory {
        liquidation_id: Option<EventId>,
        shortfall: f64,
    },
    #[error("Transaction not found: {0}")]
    NotFound(EventId),
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a full replay pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    #[error("liquidation {liquidation_id} exceeds open inventory by {shortfall}")]
    InsufficientInventory {
        liquidation_id: EventId,
        shortfall: f64,
    },
}

impl ReplayError {
    pub fn shortfall(&self) -> f64 {
        match self {
            ReplayError::InsufficientInventory { shortfall, .. } => *shortfall,
        }
    }

    pub fn liquidation_id(&self) -> EventId {
        match self {
            ReplayError::InsufficientInventory { liquidation_id, .. } => *liquidation_id,
        }
    }
}

impl From<ReplayError> for CoreError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::InsufficientInventory {
                liquidation_id,
                shortfall,
            } => CoreError::InsufficientInventory {
                liquidation_id: Some(liquidation_id),
                shortfall,
            },
        }
    }
}

impl From<TimestampError> for CoreError {
    fn from(err: TimestampError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

fn liquidation_label(id: &Option<EventId>) -> String {
    id.map(|id| format!(" (liquidation {id})"))
        .unwrap_or_default()
}
