use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use strsim::levenshtein;

use lotledger_config::{resolve_base_dir, Config, ConfigManager};
use lotledger_core::{
    storage::{journal_warnings, JournalStorage},
    Clock, CommandResponse, CoreError, LedgerCommand, LotLedger,
};
use lotledger_domain::Journal;
use lotledger_storage_json::{canonical_name, JsonJournalStorage, StoragePaths};

use crate::cli::commands;
use crate::cli::error::{CliError, CommandError, CommandResult};
use crate::cli::io as cli_io;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::utils::clock::SystemClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Where the active journal came from and where `journal save` writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalLocation {
    /// Stored in the journal directory under this slug.
    Named(String),
    /// Stored at an explicit path outside the journal directory.
    File(PathBuf),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub storage: JsonJournalStorage,
    pub ledger: Option<LotLedger>,
    pub location: Option<JournalLocation>,
    pub clock: Box<dyn Clock>,
    /// Set by successful mutations, cleared by save and load.
    pub dirty: bool,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = resolve_base_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonJournalStorage::with_retention(
            StoragePaths {
                journal_root: config.resolve_journal_root(&base),
                backup_root: config.resolve_backup_root(&base),
            },
            config.backup_retention,
        )?;
        let mut context = Self::with_parts(mode, config_manager, config, storage);
        context.auto_load_last();
        Ok(context)
    }

    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        storage: JsonJournalStorage,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        if mode == CliMode::Script {
            colored::control::set_override(false);
        } else {
            cli_io::apply_config(&config);
        }

        Self {
            mode,
            registry,
            config_manager,
            config,
            storage,
            ledger: None,
            location: None,
            clock: Box::new(SystemClock),
            dirty: false,
            last_command: None,
            running: true,
        }
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_journal.clone() else {
            return;
        };
        match self.storage.load_journal(&name) {
            Ok(journal) => match self.adopt_journal(journal, JournalLocation::Named(name.clone())) {
                Ok(()) => cli_io::print_success(format!(
                    "Automatically loaded last journal `{}`.",
                    name
                )),
                Err(err) => cli_io::print_warning(format!(
                    "Could not reopen last journal `{}`: {}",
                    name, err
                )),
            },
            Err(err) => tracing::debug!(%err, journal = %name, "last journal unavailable"),
        }
    }

    pub fn prompt(&self) -> String {
        match self.ledger.as_ref() {
            Some(ledger) => {
                let marker = if self.dirty { "*" } else { "" };
                format!("lot-ledger [{}]{}> ", ledger.name(), marker)
            }
            None => "lot-ledger> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        if self.dirty {
            return cli_io::confirm_action("Discard unsaved changes and exit?", false);
        }
        cli_io::confirm_action("Exit shell?", true)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::JournalNotLoaded => {
                cli_io::print_error(CommandError::JournalNotLoaded);
                cli_io::print_hint("Try `journal new Demo` to get started.");
            }
            CommandError::Core(inner @ CoreError::InsufficientInventory { .. }) => {
                cli_io::print_error(&inner);
                cli_io::print_hint("The journal was left unchanged.");
            }
            other => cli_io::print_error(other),
        }
    }

    pub fn ledger(&self) -> Result<&LotLedger, CommandError> {
        self.ledger.as_ref().ok_or(CommandError::JournalNotLoaded)
    }

    /// Runs `command` against the active ledger, tracking unsaved changes.
    pub fn execute(&mut self, command: LedgerCommand) -> Result<CommandResponse, CommandError> {
        let mutation = command.is_mutation();
        let response = self.ledger()?.execute(command)?;
        if mutation {
            self.dirty = true;
        }
        Ok(response)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.ledger_timestamp()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub fn format_amount(&self, value: f64) -> String {
        crate::currency::format_currency_value(
            value,
            &self.config.currency,
            self.config.currency_precision,
        )
    }

    pub fn format_quantity(&self, value: f64) -> String {
        crate::currency::format_quantity(value, self.config.quantity_precision)
    }

    /// Replaces the active ledger with one rebuilt from `journal`.
    pub fn adopt_journal(
        &mut self,
        journal: Journal,
        location: JournalLocation,
    ) -> CommandResult {
        for warning in journal_warnings(&journal) {
            cli_io::print_warning(warning);
        }
        let ledger = LotLedger::from_journal(journal)?;
        self.ledger = Some(ledger);
        self.location = Some(location);
        self.dirty = false;
        Ok(())
    }

    pub fn start_journal(&mut self, name: &str) {
        self.ledger = Some(LotLedger::new(name));
        self.location = Some(JournalLocation::Named(canonical_name(name)));
        self.dirty = true;
    }

    /// Saves the active journal to its location, or to `path` when given.
    pub fn save_active(&mut self, path: Option<&Path>) -> Result<PathBuf, CommandError> {
        let journal = self.ledger()?.journal();
        let location = match path {
            Some(path) => JournalLocation::File(path.to_path_buf()),
            None => self
                .location
                .clone()
                .unwrap_or_else(|| JournalLocation::Named(canonical_name(&journal.name))),
        };
        let written = match &location {
            JournalLocation::Named(slug) => {
                self.storage.save_journal(slug, &journal)?;
                self.set_last_opened(Some(slug.clone()))?;
                self.storage.journal_path(slug)
            }
            JournalLocation::File(path) => {
                self.storage.save_journal_to_path(&journal, path)?;
                path.clone()
            }
        };
        self.location = Some(location);
        self.dirty = false;
        Ok(written)
    }

    pub fn active_slug(&self) -> Result<String, CommandError> {
        let ledger = self.ledger()?;
        Ok(match &self.location {
            Some(JournalLocation::Named(slug)) => slug.clone(),
            _ => canonical_name(&ledger.name()),
        })
    }

    pub fn set_last_opened(&mut self, name: Option<String>) -> CommandResult {
        if self.config.last_opened_journal == name {
            return Ok(());
        }
        self.config.last_opened_journal = name;
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}
