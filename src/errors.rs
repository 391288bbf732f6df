use thiserror::Error;

use lotledger_config::ConfigError;
use lotledger_core::CoreError;

/// Error type for everything above the core crate: persistence, config, reports.
#[derive(Debug, Error)]
pub enum LotLedgerError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
