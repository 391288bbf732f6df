pub mod commands;
pub mod error;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod table;

pub use error::{CliError, CommandError, CommandResult};
pub use shell::{run_cli, SCRIPT_ENV_VAR};
pub use shell_context::{CliMode, JournalLocation, ShellContext};
