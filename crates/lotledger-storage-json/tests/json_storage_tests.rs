use chrono::NaiveDate;
use lotledger_core::{storage::JournalStorage, CoreError, LotLedger};
use lotledger_domain::{EventDraft, EventId, Journal};
use lotledger_storage_json::{JsonJournalStorage, StoragePaths};
use std::fs;
use tempfile::tempdir;

fn storage_in(dir: &std::path::Path) -> (JsonJournalStorage, StoragePaths) {
    let paths = StoragePaths {
        journal_root: dir.join("journals"),
        backup_root: dir.join("backups"),
    };
    let storage = JsonJournalStorage::new(paths.clone()).expect("create storage");
    (storage, paths)
}

fn sample_journal(name: &str) -> Journal {
    let at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let mut journal = Journal::new(name);
    journal.append(EventDraft::purchase(10.0, 5.0, at)).unwrap();
    journal.append(EventDraft::liquidation(4.0, 7.5, at)).unwrap();
    journal
}

#[test]
fn json_storage_can_save_and_load_journal() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let journal = sample_journal("Storage Test");

    storage
        .save_journal("storage-test", &journal)
        .expect("save journal");
    let loaded = storage.load_journal("storage-test").expect("load journal");

    assert_eq!(loaded, journal);
    let path = storage.journal_path("storage-test");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert_eq!(storage.list_journals().unwrap(), vec!["storage_test"]);
}

#[test]
fn loaded_journal_replays_to_the_same_state() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let journal = sample_journal("Replay");
    let original = LotLedger::from_journal(journal.clone()).expect("ledger");

    storage.save_journal("replay", &journal).expect("save");
    let reloaded =
        LotLedger::from_journal(storage.load_journal("replay").expect("load")).expect("ledger");

    assert_eq!(reloaded.snapshot(), original.snapshot());
    let receipt = reloaded
        .record_purchase(
            1.0,
            1.0,
            NaiveDate::from_ymd_opt(2024, 5, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .expect("purchase");
    assert_eq!(receipt.event_id, EventId(3));
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let (storage, paths) = storage_in(dir.path());
    let journal = sample_journal("Backup");
    storage.save_journal("backup", &journal).expect("save");

    let info = storage
        .backup_journal("backup", &journal, Some("before cleanup"))
        .expect("create backup");
    assert!(info.id.ends_with("_before-cleanup.json"), "{}", info.id);
    assert_eq!(
        info.path.parent().map(|p| p.to_path_buf()).unwrap_or_default(),
        paths.backup_root.join("backup")
    );

    let backups = storage.list_backups("backup").expect("list backups");
    assert!(
        backups.iter().any(|entry| entry.id == info.id),
        "backup list should include created backup"
    );

    storage.delete_journal("backup").expect("delete");
    assert!(storage.list_journals().unwrap().is_empty());

    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored, journal);
    assert!(storage.journal_path("backup").exists());
}

#[test]
fn overwriting_a_saved_journal_keeps_a_backup() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let mut journal = sample_journal("Rolling");
    storage.save_journal("rolling", &journal).expect("first save");
    assert!(storage.list_backups("rolling").unwrap().is_empty());

    journal.remove(EventId(2));
    storage.save_journal("rolling", &journal).expect("second save");

    let backups = storage.list_backup_metadata("rolling").expect("metadata");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].created_at.is_some());
    assert!(backups[0].size_bytes > 0);
}

#[test]
fn newer_schema_versions_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let mut journal = sample_journal("Future");
    journal.schema_version = 99;
    let path = dir.path().join("future.json");
    fs::write(&path, serde_json::to_string(&journal).unwrap()).expect("write");

    let err = storage.load_journal_from_path(&path).unwrap_err();
    assert!(matches!(err, CoreError::Storage(msg) if msg.contains("99")));
}

#[test]
fn corrupt_files_surface_serde_errors() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    fs::write(storage.journal_path("broken"), "{ not json").expect("write");

    let err = storage.load_journal("broken").unwrap_err();
    assert!(matches!(err, CoreError::Serde(_)));
}

#[test]
fn missing_journal_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let err = storage.load_journal("nowhere").unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
}

#[test]
fn journal_metadata_lists_event_counts() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    storage
        .save_journal("b", &sample_journal("Bravo"))
        .expect("save");
    storage
        .save_journal("a", &Journal::new("Alpha"))
        .expect("save");

    let rows = storage.list_journal_metadata().expect("metadata");
    let summary: Vec<(&str, usize)> = rows
        .iter()
        .map(|row| (row.name.as_str(), row.event_count))
        .collect();
    assert_eq!(summary, vec![("Alpha", 0), ("Bravo", 2)]);
}

#[test]
fn journal_without_next_id_keeps_ids_unique_after_reload() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let mut document = serde_json::to_value(sample_journal("Legacy")).unwrap();
    document
        .as_object_mut()
        .expect("journal object")
        .remove("next_id");
    let path = dir.path().join("legacy.json");
    fs::write(&path, document.to_string()).expect("write");

    let journal = storage.load_journal_from_path(&path).expect("load");
    assert_eq!(journal.next_id, EventId(3));

    let ledger = LotLedger::from_journal(journal).expect("replay");
    let at = NaiveDate::from_ymd_opt(2024, 5, 2)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let receipt = ledger.record_purchase(1.0, 6.0, at).expect("record");
    assert_eq!(receipt.event_id, EventId(3));
    assert_eq!(ledger.event_count(), 3);
    assert_eq!(
        ledger.transaction(EventId(1)).map(|event| event.quantity()),
        Some(10.0)
    );
}

#[test]
fn journal_holding_the_last_possible_id_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let (storage, _) = storage_in(dir.path());
    let mut document = serde_json::to_value(sample_journal("Full")).unwrap();
    document["events"][1]["id"] = serde_json::json!(u64::MAX);
    let path = dir.path().join("full.json");
    fs::write(&path, document.to_string()).expect("write");

    let err = storage.load_journal_from_path(&path).unwrap_err();
    assert!(matches!(err, CoreError::Serde(msg) if msg.contains("no room")));
}

#[test]
fn pruning_skips_backups_it_cannot_remove() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths {
        journal_root: dir.path().join("journals"),
        backup_root: dir.path().join("backups"),
    };
    let storage = JsonJournalStorage::with_retention(paths, 1).expect("create storage");
    let stuck = dir
        .path()
        .join("backups")
        .join("stuck")
        .join("stuck_20000101_0000.json");
    fs::create_dir_all(&stuck).expect("directory posing as a backup");

    let journal = sample_journal("Stuck");
    let first = storage
        .backup_journal("stuck", &journal, Some("one"))
        .expect("first backup");
    let second = storage
        .backup_journal("stuck", &journal, Some("two"))
        .expect("second backup survives a failed prune");

    assert!(!first.path.exists(), "older backup is still pruned");
    assert!(second.path.exists());
    assert!(stuck.exists());
}
