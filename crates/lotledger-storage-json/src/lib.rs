use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use lotledger_core::{
    storage::{JournalBackupInfo, JournalStorage},
    CoreError,
};
use lotledger_domain::{Journal, CURRENT_SCHEMA_VERSION};
use tracing::{debug, warn};

const JOURNAL_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Directories holding journal documents and their backups.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub journal_root: PathBuf,
    pub backup_root: PathBuf,
}

/// Filesystem-backed JSON persistence for journals and their backups.
#[derive(Clone)]
pub struct JsonJournalStorage {
    journals_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonJournalStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.journal_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            journals_dir: paths.journal_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn journal_path(&self, name: &str) -> PathBuf {
        self.journals_dir
            .join(format!("{}.{}", canonical_name(name), JOURNAL_EXTENSION))
    }

    pub fn backup_path(&self, name: &str, backup: &str) -> PathBuf {
        self.backup_dir(name).join(backup)
    }

    pub fn list_journal_metadata(&self) -> Result<Vec<JournalMetadata>, CoreError> {
        let mut entries = Vec::new();
        for slug in self.list_journals()? {
            let journal = self.load_journal(&slug)?;
            entries.push(JournalMetadata {
                path: self.journal_path(&slug),
                slug,
                name: journal.name.clone(),
                created_at: journal.created_at,
                updated_at: journal.updated_at,
                event_count: journal.event_count(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub fn list_backup_metadata(&self, name: &str) -> Result<Vec<BackupMetadata>, CoreError> {
        let mut rows = Vec::new();
        for entry in self.list_backups(name)? {
            let size_bytes = fs::metadata(&entry.path)
                .map(|meta| meta.len())
                .unwrap_or(0);
            rows.push(BackupMetadata {
                created_at: parse_backup_timestamp(&entry.id),
                name: entry.id,
                size_bytes,
                path: entry.path,
            });
        }
        rows.sort_by_key(|meta| Reverse(meta.created_at));
        Ok(rows)
    }

    pub fn delete_backup(&self, name: &str, backup_id: &str) -> Result<(), CoreError> {
        let path = self.backup_path(name, backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn write_backup_file(
        &self,
        journal: &Journal,
        name: &str,
        note: Option<&str>,
    ) -> Result<JournalBackupInfo, CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{}.{}", stem, JOURNAL_EXTENSION);
        let path = dir.join(&file_name);
        write_atomic(&path, &serialize_journal(journal)?)?;
        debug!(path = %path.display(), "journal backup written");
        self.prune_backups(name)?;
        Ok(JournalBackupInfo {
            journal: canonical_name(name),
            id: file_name,
            created_at: timestamp,
            path,
        })
    }

    /// Copies the current on-disk journal aside before it is overwritten.
    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!(
            "{}_{}.{}",
            canonical_name(name),
            timestamp,
            JOURNAL_EXTENSION
        );
        fs::copy(path, dir.join(file_name))?;
        self.prune_backups(name)?;
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let entries = self.list_backups(name)?;
        for entry in entries.into_iter().skip(self.retention) {
            debug!(backup = %entry.id, "pruning journal backup");
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, %err, "could not prune journal backup");
            }
        }
        Ok(())
    }
}

impl JournalStorage for JsonJournalStorage {
    fn save_journal(&self, name: &str, journal: &Journal) -> Result<(), CoreError> {
        let path = self.journal_path(name);
        self.backup_existing_file(name, &path)?;
        save_journal_to_path(journal, &path)
    }

    fn load_journal(&self, name: &str) -> Result<Journal, CoreError> {
        let path = self.journal_path(name);
        if !path.exists() {
            return Err(CoreError::Storage(format!(
                "journal `{}` not found",
                canonical_name(name)
            )));
        }
        load_journal_from_path(&path)
    }

    fn list_journals(&self) -> Result<Vec<String>, CoreError> {
        if !self.journals_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.journals_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(JOURNAL_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_journal(&self, name: &str) -> Result<(), CoreError> {
        let path = self.journal_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save_journal_to_path(&self, journal: &Journal, path: &Path) -> Result<(), CoreError> {
        if path.starts_with(&self.journals_dir) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.backup_existing_file(stem, path)?;
            }
        }
        save_journal_to_path(journal, path)
    }

    fn load_journal_from_path(&self, path: &Path) -> Result<Journal, CoreError> {
        load_journal_from_path(path)
    }

    fn backup_journal(
        &self,
        name: &str,
        journal: &Journal,
        note: Option<&str>,
    ) -> Result<JournalBackupInfo, CoreError> {
        self.write_backup_file(journal, name, note)
    }

    /// Newest first.
    fn list_backups(&self, name: &str) -> Result<Vec<JournalBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JOURNAL_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(JournalBackupInfo {
                    journal: slug.clone(),
                    id: file_name.to_string(),
                    created_at: file_name.to_string(),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(&b.id)
                .cmp(&parse_backup_timestamp(&a.id))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &JournalBackupInfo) -> Result<Journal, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let journal = load_journal_from_path(&backup.path)?;
        let target = self.journal_path(&backup.journal);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &target)?;
        Ok(journal)
    }
}

/// Saves a journal to an arbitrary path, writing through a temporary file.
pub fn save_journal_to_path(journal: &Journal, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_journal(journal)?)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), events = journal.event_count(), "journal saved");
    Ok(())
}

/// Loads a journal from the provided filesystem path.
pub fn load_journal_from_path(path: &Path) -> Result<Journal, CoreError> {
    let data = fs::read_to_string(path)?;
    let journal: Journal =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    if journal.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CoreError::Storage(format!(
            "journal schema version {} is newer than supported version {}",
            journal.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    debug!(path = %path.display(), events = journal.event_count(), "journal loaded");
    Ok(journal)
}

#[derive(Debug, Clone)]
pub struct JournalMetadata {
    pub slug: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub event_count: usize,
}

#[derive(Debug, Clone)]
pub struct BackupMetadata {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Lowercased, filesystem-safe slug for a journal name.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "journal".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads the `YYYYMMDD_HHMM` pair embedded in a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", JOURNAL_EXTENSION))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        let (date, time) = (pair[0], pair[1]);
        if !is_digits(date, 8) || !is_digits(time, 4) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_journal(journal: &Journal) -> Result<String, CoreError> {
    serde_json::to_string_pretty(journal).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_slugifies() {
        assert_eq!(canonical_name("  Gold Coins "), "gold_coins");
        assert_eq!(canonical_name("***"), "journal");
    }

    #[test]
    fn backup_notes_collapse_separators() {
        assert_eq!(
            sanitize_backup_note(Some("Before  year-end.close")),
            Some("before-year-end-close".into())
        );
        assert_eq!(sanitize_backup_note(Some("  !! ")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn backup_timestamp_survives_notes() {
        let plain = parse_backup_timestamp("gold_20240105_0930.json").unwrap();
        let noted = parse_backup_timestamp("gold_20240105_0930_pre-sale.json").unwrap();
        assert_eq!(plain, noted);
        assert_eq!(plain.format("%Y-%m-%d %H:%M").to_string(), "2024-01-05 09:30");
        assert!(parse_backup_timestamp("gold.json").is_none());
    }
}
