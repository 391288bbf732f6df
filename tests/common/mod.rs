#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use lot_ledger::cli::{CliMode, ShellContext};
use lot_ledger::config::{Config, ConfigManager};
use lot_ledger::storage::{JsonJournalStorage, StoragePaths};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Script-mode shell context rooted in an isolated directory.
pub fn setup_test_context() -> (ShellContext, PathBuf) {
    let base = temp_base();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let config = Config::default();
    let storage = JsonJournalStorage::with_retention(
        StoragePaths {
            journal_root: config.resolve_journal_root(&base),
            backup_root: config.resolve_backup_root(&base),
        },
        config.backup_retention,
    )
    .expect("create json storage backend");
    let context = ShellContext::with_parts(CliMode::Script, config_manager, config, storage);
    (context, base)
}
