use std::io;

use rustyline::error::ReadlineError;
use thiserror::Error;

use lotledger_config::ConfigError;
use lotledger_core::CoreError;

use crate::errors::LotLedgerError;

/// Fatal shell failures that end the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Input error: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

/// Failure of a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No journal loaded. Use `journal new <name>` or `journal load <name>` first.")]
    JournalNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

impl From<LotLedgerError> for CommandError {
    fn from(err: LotLedgerError) -> Self {
        match err {
            LotLedgerError::Core(inner) => CommandError::Core(inner),
            LotLedgerError::Config(inner) => CommandError::Config(inner),
            LotLedgerError::Io(inner) => CommandError::Io(inner),
            LotLedgerError::Serde(inner) => CommandError::Message(inner.to_string()),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Config(inner) => CliError::Config(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}
