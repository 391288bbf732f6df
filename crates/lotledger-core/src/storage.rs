use std::path::{Path, PathBuf};

use lotledger_domain::{Event, Identifiable, Journal};

use crate::CoreError;

/// Describes a persisted backup artifact for a journal.
#[derive(Debug, Clone)]
pub struct JournalBackupInfo {
    pub journal: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing journals and backups.
pub trait JournalStorage: Send + Sync {
    fn save_journal(&self, name: &str, journal: &Journal) -> Result<(), CoreError>;
    fn load_journal(&self, name: &str) -> Result<Journal, CoreError>;
    fn list_journals(&self) -> Result<Vec<String>, CoreError>;
    fn delete_journal(&self, name: &str) -> Result<(), CoreError>;
    fn save_journal_to_path(&self, journal: &Journal, path: &Path) -> Result<(), CoreError>;
    fn load_journal_from_path(&self, path: &Path) -> Result<Journal, CoreError>;
    fn backup_journal(
        &self,
        name: &str,
        journal: &Journal,
        note: Option<&str>,
    ) -> Result<JournalBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<JournalBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &JournalBackupInfo) -> Result<Journal, CoreError>;
}

/// Detects malformed events and id bookkeeping anomalies within a journal.
pub fn journal_warnings(journal: &Journal) -> Vec<String> {
    let mut warnings = Vec::new();

    for event in journal.events() {
        let id = event.id();
        if id >= journal.next_id {
            warnings.push(format!(
                "event {} is not below the next id {}",
                id, journal.next_id
            ));
        }
        if !(event.quantity().is_finite() && event.quantity() > 0.0) {
            warnings.push(format!(
                "event {} has non-positive quantity {}",
                id,
                event.quantity()
            ));
        }
        if !(event.price().is_finite() && event.price() > 0.0) {
            let label = match event {
                Event::Purchase(_) => "unit price",
                Event::Liquidation(_) => "selling price",
            };
            warnings.push(format!(
                "event {} has non-positive {} {}",
                id,
                label,
                event.price()
            ));
        }
    }
    warnings
}
