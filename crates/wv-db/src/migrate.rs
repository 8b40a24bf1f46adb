//! One-shot migration from the legacy flat-document format.
//!
//! The legacy format is a single JSON document mapping word length to a list
//! of entries (`{word, points, dict_matches}`), scanned linearly per query by
//! the old implementation. Migration reads the whole document (bounded,
//! one-time operation), translates entries into the raw-record shape, and
//! feeds them through the normal batch upsert path, so re-running it cannot
//! create duplicates or clear flags.
//!
//! The legacy source is never deleted or truncated: a copy is placed aside
//! before the first migration and the original stays where it was.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DbResult;
use crate::store::WordStore;
use crate::types::RawWordRecord;

/// Default number of records per ingest batch. Correctness does not depend
/// on this; it only bounds transaction size.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// One entry of the legacy document.
#[derive(Debug, Deserialize)]
struct LegacyEntry {
    word: String,

    #[serde(default)]
    points: i64,

    #[serde(default)]
    dict_matches: BTreeMap<String, bool>,
}

/// The legacy document: word length (as a JSON key) -> entries. The keys are
/// advisory; stored lengths are always derived from the words themselves.
type LegacyDocument = BTreeMap<String, Vec<LegacyEntry>>;

/// Advisory migration state, from comparing record counts between the legacy
/// source and the store. Word-level diffing is deliberately out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum MigrationStatus {
    NotStarted,
    Partial { stored: u64, expected: u64 },
    Complete { stored: u64, expected: u64 },
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::Partial { stored, expected } => {
                write!(f, "partial ({stored} of {expected} words present)")
            }
            Self::Complete { stored, expected } => {
                write!(f, "complete ({stored} stored, {expected} in legacy source)")
            }
        }
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Entries read from the legacy document.
    pub source_records: u64,

    /// Distinct words among those entries (duplicates collapse on upsert).
    pub distinct_words: u64,

    /// Rows inserted or updated across all batches.
    pub rows_affected: u64,

    /// Advisory state after the run.
    pub status: MigrationStatus,

    /// Where the legacy source was copied aside.
    pub backup_path: PathBuf,
}

/// Read the legacy document and flatten it into raw records.
pub fn load_legacy_records(path: &Path) -> DbResult<Vec<RawWordRecord>> {
    let content = fs::read_to_string(path)?;
    let document: LegacyDocument = serde_json::from_str(&content)?;

    let records: Vec<RawWordRecord> = document
        .into_values()
        .flatten()
        .map(|entry| RawWordRecord {
            word: entry.word,
            points: entry.points,
            dictionary_matches: entry.dict_matches,
        })
        .collect();

    debug!(count = records.len(), "Loaded legacy document");
    Ok(records)
}

/// Migrate the legacy document at `legacy_path` into `store`.
///
/// Entries are applied through the normal upsert path in batches of
/// `batch_size`, so re-running against an already migrated store changes
/// nothing. A failed batch aborts the run with its batches-so-far committed;
/// re-running after fixing the source is safe for the same reason.
pub fn migrate(
    store: &mut WordStore,
    legacy_path: &Path,
    batch_size: usize,
) -> DbResult<MigrationReport> {
    let records = load_legacy_records(legacy_path)?;
    let distinct_words = distinct_word_count(&records);

    // Preserve the input before touching the store. The original file is
    // left in place either way.
    let backup = backup_path(legacy_path);
    if !backup.exists() {
        fs::copy(legacy_path, &backup)?;
        debug!(backup = %backup.display(), "Copied legacy source aside");
    }

    let mut rows_affected = 0u64;
    for chunk in records.chunks(batch_size.max(1)) {
        rows_affected += store.insert_batch(chunk)? as u64;
    }

    store.set_metadata("migrated_from", &legacy_path.display().to_string())?;
    store.set_metadata("migration_date", &Utc::now().to_rfc3339())?;

    let status = status_from_counts(store.count()?, distinct_words);
    debug!(
        source = records.len(),
        rows_affected, "Legacy migration finished"
    );

    Ok(MigrationReport {
        source_records: records.len() as u64,
        distinct_words,
        rows_affected,
        status,
        backup_path: backup,
    })
}

/// Compare the legacy source against the store without writing anything.
pub fn migration_status(store: &WordStore, legacy_path: &Path) -> DbResult<MigrationStatus> {
    let records = load_legacy_records(legacy_path)?;
    Ok(status_from_counts(
        store.count()?,
        distinct_word_count(&records),
    ))
}

fn distinct_word_count(records: &[RawWordRecord]) -> u64 {
    records
        .iter()
        .map(|r| r.word.to_lowercase())
        .collect::<BTreeSet<_>>()
        .len() as u64
}

fn status_from_counts(stored: u64, expected: u64) -> MigrationStatus {
    if stored == 0 && expected > 0 {
        MigrationStatus::NotStarted
    } else if stored < expected {
        MigrationStatus::Partial { stored, expected }
    } else {
        MigrationStatus::Complete { stored, expected }
    }
}

fn backup_path(legacy_path: &Path) -> PathBuf {
    let mut name = legacy_path.as_os_str().to_os_string();
    name.push(".backup");
    PathBuf::from(name)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Dictionary;
    use crate::types::SearchQuery;
    use crate::WordRecord;

    fn write_legacy(dir: &Path, content: &serde_json::Value) -> PathBuf {
        let path = dir.join("database.json");
        fs::write(&path, serde_json::to_string_pretty(content).unwrap()).unwrap();
        path
    }

    fn sample_document() -> serde_json::Value {
        serde_json::json!({
            "3": [
                {"word": "cat", "points": 10, "dict_matches": {"wordle": true, "wwf": false}},
                {"word": "bat", "points": 12, "dict_matches": {"sowpods": true}}
            ],
            "5": [
                {"word": "apple", "points": 8, "dict_matches": {"wordle": true, "otcwl": true}}
            ]
        })
    }

    fn full_state(store: &WordStore) -> Vec<WordRecord> {
        store.search(&SearchQuery::new()).unwrap()
    }

    #[test]
    fn test_load_flattens_document() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(temp.path(), &sample_document());

        let records = load_legacy_records(&path).unwrap();
        assert_eq!(records.len(), 3);
        let apple = records.iter().find(|r| r.word == "apple").unwrap();
        assert_eq!(apple.points, 8);
        assert_eq!(apple.dictionary_matches.get("otcwl"), Some(&true));
    }

    #[test]
    fn test_migration_populates_store() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(temp.path(), &sample_document());
        let mut store = WordStore::open_in_memory().unwrap();

        let report = migrate(&mut store, &path, DEFAULT_BATCH_SIZE).unwrap();
        assert_eq!(report.source_records, 3);
        assert_eq!(report.distinct_words, 3);
        assert_eq!(report.rows_affected, 3);
        assert!(matches!(report.status, MigrationStatus::Complete { .. }));

        let cat = store.get_word("cat").unwrap();
        assert_eq!(cat.points, 10);
        assert!(cat.flags.contains(Dictionary::Wordle));
        assert!(!cat.flags.contains(Dictionary::Wwf));
        assert_eq!(store.metadata("migrated_from").unwrap().as_deref(), Some(path.to_str().unwrap()));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(temp.path(), &sample_document());
        let mut store = WordStore::open_in_memory().unwrap();

        migrate(&mut store, &path, DEFAULT_BATCH_SIZE).unwrap();
        let first = full_state(&store);

        let second_report = migrate(&mut store, &path, DEFAULT_BATCH_SIZE).unwrap();
        let second = full_state(&store);

        // Same row count, same points, same flags, same timestamps.
        assert_eq!(first, second);
        assert_eq!(second_report.rows_affected, 0);
    }

    #[test]
    fn test_migration_preserves_input() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(temp.path(), &sample_document());
        let original = fs::read_to_string(&path).unwrap();
        let mut store = WordStore::open_in_memory().unwrap();

        let report = migrate(&mut store, &path, DEFAULT_BATCH_SIZE).unwrap();

        assert!(path.exists(), "legacy source must not be deleted");
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(report.backup_path.exists());
        assert_eq!(fs::read_to_string(&report.backup_path).unwrap(), original);
    }

    #[test]
    fn test_batch_size_independence() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(temp.path(), &sample_document());

        let mut one_by_one = WordStore::open_in_memory().unwrap();
        migrate(&mut one_by_one, &path, 1).unwrap();

        let mut all_at_once = WordStore::open_in_memory().unwrap();
        migrate(&mut all_at_once, &path, 100).unwrap();

        let strip_times = |records: Vec<WordRecord>| {
            records
                .into_iter()
                .map(|r| (r.word, r.length, r.points, r.flags))
                .collect::<Vec<_>>()
        };
        assert_eq!(
            strip_times(full_state(&one_by_one)),
            strip_times(full_state(&all_at_once))
        );
    }

    #[test]
    fn test_status_tri_state() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(temp.path(), &sample_document());
        let mut store = WordStore::open_in_memory().unwrap();

        assert_eq!(
            migration_status(&store, &path).unwrap(),
            MigrationStatus::NotStarted
        );

        // One of the three legacy words present -> partial.
        store
            .insert_batch(&[RawWordRecord::new("cat", 10)])
            .unwrap();
        assert_eq!(
            migration_status(&store, &path).unwrap(),
            MigrationStatus::Partial {
                stored: 1,
                expected: 3
            }
        );

        migrate(&mut store, &path, DEFAULT_BATCH_SIZE).unwrap();
        assert_eq!(
            migration_status(&store, &path).unwrap(),
            MigrationStatus::Complete {
                stored: 3,
                expected: 3
            }
        );
    }

    #[test]
    fn test_duplicate_legacy_entries_collapse() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_legacy(
            temp.path(),
            &serde_json::json!({
                "3": [
                    {"word": "cat", "points": 5, "dict_matches": {"wordle": true}},
                    {"word": "cat", "points": 10, "dict_matches": {"wwf": true}}
                ]
            }),
        );
        let mut store = WordStore::open_in_memory().unwrap();
        migrate(&mut store, &path, DEFAULT_BATCH_SIZE).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let cat = store.get_word("cat").unwrap();
        // Last points wins, memberships union.
        assert_eq!(cat.points, 10);
        assert!(cat.flags.contains(Dictionary::Wordle));
        assert!(cat.flags.contains(Dictionary::Wwf));
    }
}
