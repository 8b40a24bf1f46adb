//! The word store: batch ingest, queries, and administrative operations.
//!
//! [`WordStore`] owns a single connection with scoped acquisition: opened at
//! construction, released by [`WordStore::close`] (or drop), with every
//! operation failing [`DbError::Closed`] afterwards. Writes take `&mut self`
//! (one writer at a time); reads take `&self` and, thanks to WAL mode,
//! additional read handles opened on the same path always see the last
//! committed snapshot without blocking on a writer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use crate::error::{DbError, DbResult};
use crate::flags::DictFlags;
use crate::schema;
use crate::types::{RawWordRecord, SearchQuery, SizeInfo, WordRecord, WordStats};

/// Path sentinel for in-memory stores.
const MEMORY_PATH: &str = ":memory:";

/// Column list shared by every record-returning query.
const SELECT_COLUMNS: &str = "word, length, points, dict_flags, created_at, updated_at";

/// Upsert applied per record inside a batch transaction.
///
/// Flags merge by bitwise OR (membership is never lost), points take the
/// latest supplied value, and `updated_at` is bumped only when the row
/// content actually changes; an identical re-ingest is a no-op and does not
/// count toward the affected-row total.
///
/// Overwrite-on-points is the observed policy of the system this store
/// serves, not a storage invariant; a max- or sum-merge would be a one-line
/// change here if the product ever wants it.
const UPSERT_SQL: &str = "
INSERT INTO words (word, length, points, dict_flags, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?5)
ON CONFLICT(word) DO UPDATE SET
    points = excluded.points,
    dict_flags = words.dict_flags | excluded.dict_flags,
    updated_at = excluded.updated_at
WHERE words.points != excluded.points
   OR (words.dict_flags | excluded.dict_flags) != words.dict_flags
";

/// A record that passed ingest validation.
struct ValidatedRow {
    word: String,
    length: u32,
    points: i64,
    flags: DictFlags,
}

/// Handle to an open word store.
pub struct WordStore {
    conn: Option<Connection>,
    path: PathBuf,
}

impl WordStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = schema::open_database(&path)?;
        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: Some(schema::open_in_memory()?),
            path: PathBuf::from(MEMORY_PATH),
        })
    }

    /// Close the store. Every subsequent operation (including a second
    /// `close`) fails with [`DbError::Closed`].
    pub fn close(&mut self) -> DbResult<()> {
        match self.conn.take() {
            Some(conn) => {
                debug!("Closing word store at {:?}", self.path);
                conn.close().map_err(|(_, err)| DbError::Storage(err))
            }
            None => Err(DbError::Closed),
        }
    }

    /// Path of the store file (`:memory:` for in-memory stores).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True until [`WordStore::close`] has been called.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::Closed)
    }

    fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    // ========================================================================
    // Batch ingest / upsert
    // ========================================================================

    /// Apply a batch of raw records as a single atomic unit.
    ///
    /// The whole batch is validated before anything is written; one invalid
    /// record rejects the batch and leaves the store untouched, so callers
    /// can retry the entire batch without partial-application bookkeeping.
    ///
    /// Returns the number of rows actually inserted or updated. An empty
    /// batch is a no-op returning 0.
    pub fn insert_batch(&mut self, records: &[RawWordRecord]) -> DbResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let rows: Vec<ValidatedRow> = records
            .iter()
            .map(Self::validate)
            .collect::<DbResult<_>>()?;

        let now = Utc::now();
        let conn = self.conn.as_mut().ok_or(DbError::Closed)?;
        let tx = conn.transaction()?;

        let mut affected = 0;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for row in &rows {
                affected += stmt.execute((&row.word, row.length, row.points, row.flags.bits(), now))?;
            }
        }
        tx.commit()?;

        debug!(
            batch = records.len(),
            affected, "Applied word batch to store"
        );
        Ok(affected)
    }

    /// Validate and normalize one raw record.
    fn validate(record: &RawWordRecord) -> DbResult<ValidatedRow> {
        let word = record.word.to_lowercase();
        if word.is_empty() {
            return Err(DbError::validation(&record.word, "word must not be empty"));
        }
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DbError::validation(
                &record.word,
                "word must contain only letters",
            ));
        }
        if record.points < 0 {
            return Err(DbError::validation(
                &word,
                format!("points must be non-negative (got {})", record.points),
            ));
        }
        let flags = DictFlags::from_matches(&record.dictionary_matches)
            .map_err(|name| DbError::validation(&word, format!("unknown dictionary source `{name}`")))?;

        Ok(ValidatedRow {
            length: word.chars().count() as u32,
            word,
            points: record.points,
            flags,
        })
    }

    // ========================================================================
    // Query layer (read-only)
    // ========================================================================

    /// Look up a single word. Fails with [`DbError::WordNotFound`] when the
    /// word is not in the store.
    pub fn get_word(&self, word: &str) -> DbResult<WordRecord> {
        let normalized = word.to_lowercase();
        let sql = format!("SELECT {SELECT_COLUMNS} FROM words WHERE word = ?1");
        self.conn()?
            .query_row(&sql, [&normalized], row_to_record)
            .optional()?
            .ok_or(DbError::WordNotFound(normalized))
    }

    /// All words of exactly `length`, ordered by word ascending.
    pub fn get_by_length(&self, length: u32) -> DbResult<Vec<WordRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM words WHERE length = ?1 ORDER BY word ASC");
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([length], row_to_record)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Top `limit` words by points (descending), ties broken by word
    /// ascending for deterministic output. With a `length` the composite
    /// `(length, points)` index serves the query in a single scan.
    pub fn top_by_points(&self, length: Option<u32>, limit: usize) -> DbResult<Vec<WordRecord>> {
        let conn = self.conn()?;
        let rows = match length {
            Some(len) => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM words WHERE length = ?1 \
                     ORDER BY points DESC, word ASC LIMIT ?2"
                );
                let mut stmt = conn.prepare_cached(&sql)?;
                let records = stmt
                    .query_map((len, limit as i64), row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                records
            }
            None => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM words ORDER BY points DESC, word ASC LIMIT ?1"
                );
                let mut stmt = conn.prepare_cached(&sql)?;
                let records = stmt
                    .query_map([limit as i64], row_to_record)?
                    .collect::<Result<Vec<_>, _>>()?;
                records
            }
        };
        Ok(rows)
    }

    /// Composable predicate search; all supplied predicates are conjunctive.
    ///
    /// Results are ordered points descending, word ascending. No predicates
    /// returns the full store.
    pub fn search(&self, query: &SearchQuery) -> DbResult<Vec<WordRecord>> {
        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM words WHERE 1=1");
        let mut params: Vec<Value> = Vec::new();

        if let Some(pattern) = &query.pattern {
            sql.push_str(" AND word LIKE ?");
            params.push(pattern.to_lowercase().into());
        }
        if let Some(contains) = &query.contains {
            // Literal substring match: escape LIKE metacharacters.
            sql.push_str(" AND word LIKE ? ESCAPE '\\'");
            params.push(format!("%{}%", escape_like(&contains.to_lowercase())).into());
        }
        if let Some(min) = query.min_points {
            sql.push_str(" AND points >= ?");
            params.push(min.into());
        }
        if let Some(max) = query.max_points {
            sql.push_str(" AND points <= ?");
            params.push(max.into());
        }
        if !query.lengths.is_empty() {
            let placeholders = vec!["?"; query.lengths.len()].join(", ");
            sql.push_str(&format!(" AND length IN ({placeholders})"));
            params.extend(query.lengths.iter().map(|len| Value::from(i64::from(*len))));
        }
        sql.push_str(" ORDER BY points DESC, word ASC");

        trace!(%sql, "Running word search");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), row_to_record)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Aggregate statistics, optionally scoped to one length. Computed by
    /// the engine, never by fetching rows into the calling process.
    pub fn statistics(&self, length: Option<u32>) -> DbResult<WordStats> {
        let conn = self.conn()?;

        let aggregate = |sql: &str, params: &[Value]| -> DbResult<(u64, Option<f64>, Option<i64>, Option<i64>, Option<i64>)> {
            Ok(conn.query_row(sql, params_from_iter(params.iter().cloned()), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?)
        };

        let (total, avg, min, max, sum) = match length {
            Some(len) => aggregate(
                "SELECT COUNT(*), AVG(points), MIN(points), MAX(points), SUM(points) \
                 FROM words WHERE length = ?",
                &[Value::from(i64::from(len))],
            )?,
            None => aggregate(
                "SELECT COUNT(*), AVG(points), MIN(points), MAX(points), SUM(points) FROM words",
                &[],
            )?,
        };

        if total == 0 {
            return Ok(WordStats::default());
        }

        let highest_word = match length {
            Some(len) => conn
                .query_row(
                    "SELECT word FROM words WHERE length = ?1 \
                     ORDER BY points DESC, word ASC LIMIT 1",
                    [len],
                    |row| row.get(0),
                )
                .optional()?,
            None => conn
                .query_row(
                    "SELECT word FROM words ORDER BY points DESC, word ASC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?,
        };

        Ok(WordStats {
            total_words: total,
            average_points: (avg.unwrap_or(0.0) * 100.0).round() / 100.0,
            min_points: min.unwrap_or(0),
            max_points: max.unwrap_or(0),
            total_points: sum.unwrap_or(0),
            highest_word,
        })
    }

    /// Word count per length, in one aggregation query.
    pub fn length_distribution(&self) -> DbResult<BTreeMap<u32, u64>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare_cached("SELECT length, COUNT(*) FROM words GROUP BY length ORDER BY length")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Total number of stored words.
    pub fn count(&self) -> DbResult<u64> {
        Ok(self
            .conn()?
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?)
    }

    /// On-disk footprint of the store file (not a row count). In-memory
    /// stores report `page_count * page_size` instead.
    pub fn database_size(&self) -> DbResult<SizeInfo> {
        let conn = self.conn()?;
        let bytes = if self.is_in_memory() {
            let page_count: u64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
            let page_size: u64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
            page_count * page_size
        } else {
            std::fs::metadata(&self.path)?.len()
        };
        Ok(SizeInfo::new(bytes, &self.path))
    }

    // ========================================================================
    // Administrative operations
    // ========================================================================

    /// Rebuild every index from the table data. Idempotent; may briefly
    /// block a concurrent writer.
    pub fn rebuild_indexes(&mut self) -> DbResult<()> {
        debug!("Rebuilding word store indexes");
        let conn = self.conn.as_ref().ok_or(DbError::Closed)?;
        conn.execute_batch("REINDEX;")?;
        Ok(())
    }

    /// Reclaim free space in the store file and truncate the write-ahead
    /// log. Idempotent; may briefly block a concurrent writer.
    pub fn reclaim_space(&mut self) -> DbResult<()> {
        debug!("Reclaiming word store space");
        let conn = self.conn.as_ref().ok_or(DbError::Closed)?;
        conn.execute("VACUUM", [])?;
        if !self.is_in_memory() {
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        }
        Ok(())
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Read a store-level metadata value.
    pub fn metadata(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self
            .conn()?
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Write a store-level metadata value.
    pub fn set_metadata(&mut self, key: &str, value: &str) -> DbResult<()> {
        let conn = self.conn.as_ref().ok_or(DbError::Closed)?;
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value, updated_at) VALUES (?1, ?2, ?3)",
            (key, value, Utc::now()),
        )?;
        Ok(())
    }
}

/// Map a `words` row (in `SELECT_COLUMNS` order) into a [`WordRecord`].
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<WordRecord> {
    Ok(WordRecord {
        word: row.get(0)?,
        length: row.get(1)?,
        points: row.get(2)?,
        flags: DictFlags::from_bits(row.get(3)?),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Escape LIKE metacharacters for a literal substring match.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Dictionary;

    fn store_with(records: &[RawWordRecord]) -> WordStore {
        let mut store = WordStore::open_in_memory().expect("open in-memory store");
        store.insert_batch(records).expect("seed batch");
        store
    }

    fn words(records: &[WordRecord]) -> Vec<&str> {
        records.iter().map(|r| r.word.as_str()).collect()
    }

    #[test]
    fn test_insert_and_get_word() {
        let store = store_with(&[RawWordRecord::new("apple", 8).with_match("wordle", true)]);

        let record = store.get_word("apple").unwrap();
        assert_eq!(record.word, "apple");
        assert_eq!(record.length, 5);
        assert_eq!(record.points, 8);
        assert!(record.flags.contains(Dictionary::Wordle));
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_get_word_missing_is_not_found() {
        let store = store_with(&[]);
        match store.get_word("zebra") {
            Err(DbError::WordNotFound(word)) => assert_eq!(word, "zebra"),
            other => panic!("expected WordNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut store = WordStore::open_in_memory().unwrap();
        assert_eq!(store.insert_batch(&[]).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_no_duplicates() {
        let mut store = store_with(&[RawWordRecord::new("apple", 8)]);
        store
            .insert_batch(&[RawWordRecord::new("apple", 10), RawWordRecord::new("pear", 6)])
            .unwrap();
        // Case-insensitive identity: "Apple" is the same record.
        store.insert_batch(&[RawWordRecord::new("Apple", 12)]).unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.get_word("apple").unwrap().points, 12);
    }

    #[test]
    fn test_flag_merge_is_monotonic() {
        let mut store = store_with(&[RawWordRecord::new("apple", 8).with_match("wordle", true)]);
        store
            .insert_batch(&[RawWordRecord::new("apple", 8)
                .with_match("sowpods", true)
                .with_match("wordle", false)])
            .unwrap();

        let flags = store.get_word("apple").unwrap().flags;
        // F1 ∪ F2: re-ingest with a subset never clears recorded membership.
        assert!(flags.contains(Dictionary::Wordle));
        assert!(flags.contains(Dictionary::Sowpods));
    }

    #[test]
    fn test_points_last_write_wins() {
        let mut store = store_with(&[RawWordRecord::new("apple", 20)]);
        store.insert_batch(&[RawWordRecord::new("apple", 5)]).unwrap();
        // Overwrite even when the new value is lower.
        assert_eq!(store.get_word("apple").unwrap().points, 5);
    }

    #[test]
    fn test_updated_at_bumps_only_on_change() {
        let mut store = store_with(&[RawWordRecord::new("apple", 8)]);
        let before = store.get_word("apple").unwrap();

        // Identical content: no affected rows, timestamp untouched.
        let affected = store.insert_batch(&[RawWordRecord::new("apple", 8)]).unwrap();
        assert_eq!(affected, 0);
        assert_eq!(store.get_word("apple").unwrap().updated_at, before.updated_at);

        // Changed content: one affected row, timestamp moves forward.
        let affected = store.insert_batch(&[RawWordRecord::new("apple", 9)]).unwrap();
        assert_eq!(affected, 1);
        let after = store.get_word("apple").unwrap();
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_invalid_batch_leaves_store_unchanged() {
        let mut store = store_with(&[RawWordRecord::new("apple", 8)]);

        let batch = vec![
            RawWordRecord::new("pear", 6),
            RawWordRecord::new("qq1", 3), // invalid: digit
        ];
        let err = store.insert_batch(&batch).unwrap_err();
        assert!(err.is_validation());

        // All-or-nothing: the valid record in the batch was not applied.
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get_word("apple").unwrap().points, 8);
        assert!(matches!(store.get_word("pear"), Err(DbError::WordNotFound(_))));
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        let mut store = WordStore::open_in_memory().unwrap();

        let empty = store.insert_batch(&[RawWordRecord::new("", 1)]).unwrap_err();
        assert!(empty.is_validation());

        let negative = store.insert_batch(&[RawWordRecord::new("apple", -1)]).unwrap_err();
        assert!(negative.is_validation());

        let unknown = store
            .insert_batch(&[RawWordRecord::new("apple", 1).with_match("scrabble3000", true)])
            .unwrap_err();
        assert!(unknown.to_string().contains("scrabble3000"));
    }

    #[test]
    fn test_length_is_derived_from_word() {
        let store = store_with(&[RawWordRecord::new("apple", 8)]);
        assert_eq!(words(&store.get_by_length(5).unwrap()), vec!["apple"]);
        assert!(store.get_by_length(4).unwrap().is_empty());
    }

    #[test]
    fn test_get_by_length_orders_by_word() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("ant", 3),
            RawWordRecord::new("bat", 12),
        ]);
        assert_eq!(words(&store.get_by_length(3).unwrap()), vec!["ant", "bat", "cat"]);
    }

    #[test]
    fn test_top_ties_break_alphabetically() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("bat", 10),
            RawWordRecord::new("rat", 5),
        ]);
        let top = store.top_by_points(Some(3), 2).unwrap();
        assert_eq!(words(&top), vec!["bat", "cat"]);
        assert_eq!(top[0].points, 10);
        assert_eq!(top[1].points, 10);
    }

    #[test]
    fn test_top_without_length_spans_lengths() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("quartz", 24),
            RawWordRecord::new("jazz", 29),
        ]);
        let top = store.top_by_points(None, 2).unwrap();
        assert_eq!(words(&top), vec!["jazz", "quartz"]);
    }

    #[test]
    fn test_search_predicates_are_conjunctive() {
        let store = store_with(&[
            RawWordRecord::new("testing", 12),
            RawWordRecord::new("tester", 20),
            RawWordRecord::new("rest", 8),
        ]);
        let results = store
            .search(&SearchQuery::new().with_contains("test").with_min_points(15))
            .unwrap();
        assert_eq!(words(&results), vec!["tester"]);
        assert_eq!(results[0].points, 20);
    }

    #[test]
    fn test_search_pattern_wildcards() {
        let store = store_with(&[
            RawWordRecord::new("testing", 12),
            RawWordRecord::new("tasting", 9),
            RawWordRecord::new("rest", 8),
        ]);
        let results = store
            .search(&SearchQuery::new().with_pattern("t_sting"))
            .unwrap();
        assert_eq!(words(&results), vec!["testing", "tasting"]);
    }

    #[test]
    fn test_search_contains_is_literal() {
        let store = store_with(&[RawWordRecord::new("apple", 8)]);
        // LIKE metacharacters in `contains` match literally, so nothing here.
        let results = store.search(&SearchQuery::new().with_contains("a%e")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_by_lengths_and_points_range() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("apple", 8),
            RawWordRecord::new("quartz", 24),
        ]);
        let results = store
            .search(
                &SearchQuery::new()
                    .with_lengths([3, 5])
                    .with_min_points(8)
                    .with_max_points(10),
            )
            .unwrap();
        assert_eq!(words(&results), vec!["cat", "apple"]);
    }

    #[test]
    fn test_search_unconstrained_returns_all() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("apple", 8),
        ]);
        assert_eq!(store.search(&SearchQuery::new()).unwrap().len(), 2);
    }

    #[test]
    fn test_statistics() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("bat", 20),
            RawWordRecord::new("apple", 8),
        ]);

        let all = store.statistics(None).unwrap();
        assert_eq!(all.total_words, 3);
        assert_eq!(all.min_points, 8);
        assert_eq!(all.max_points, 20);
        assert_eq!(all.total_points, 38);
        assert!((all.average_points - 12.67).abs() < 1e-9);
        assert_eq!(all.highest_word.as_deref(), Some("bat"));

        let threes = store.statistics(Some(3)).unwrap();
        assert_eq!(threes.total_words, 2);
        assert_eq!(threes.min_points, 10);
        assert_eq!(threes.highest_word.as_deref(), Some("bat"));
    }

    #[test]
    fn test_statistics_empty_store() {
        let store = store_with(&[]);
        let stats = store.statistics(None).unwrap();
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.average_points, 0.0);
        assert_eq!(stats.highest_word, None);
    }

    #[test]
    fn test_distribution_sums_to_total() {
        let store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("bat", 12),
            RawWordRecord::new("apple", 8),
            RawWordRecord::new("quartz", 24),
        ]);
        let dist = store.length_distribution().unwrap();
        assert_eq!(dist.get(&3), Some(&2));
        assert_eq!(dist.get(&5), Some(&1));
        assert_eq!(dist.get(&6), Some(&1));
        assert_eq!(dist.values().sum::<u64>(), store.count().unwrap());
    }

    #[test]
    fn test_database_size_reflects_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("words.db");
        let mut store = WordStore::open(&path).unwrap();
        store.insert_batch(&[RawWordRecord::new("apple", 8)]).unwrap();

        let size = store.database_size().unwrap();
        assert!(size.bytes > 0);
        assert_eq!(size.path, path);
        assert!(!size.human.is_empty());
    }

    #[test]
    fn test_admin_operations_preserve_data() {
        let mut store = store_with(&[
            RawWordRecord::new("cat", 10),
            RawWordRecord::new("apple", 8),
        ]);
        store.rebuild_indexes().unwrap();
        store.reclaim_space().unwrap();
        // Both are idempotent.
        store.rebuild_indexes().unwrap();
        store.reclaim_space().unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.get_word("cat").unwrap().points, 10);
    }

    #[test]
    fn test_closed_store_errors() {
        let mut store = store_with(&[RawWordRecord::new("apple", 8)]);
        store.close().unwrap();
        assert!(!store.is_open());

        assert!(matches!(store.get_word("apple"), Err(DbError::Closed)));
        assert!(matches!(store.count(), Err(DbError::Closed)));
        assert!(matches!(
            store.insert_batch(&[RawWordRecord::new("pear", 6)]),
            Err(DbError::Closed)
        ));
        assert!(matches!(store.search(&SearchQuery::new()), Err(DbError::Closed)));
        assert!(matches!(store.close(), Err(DbError::Closed)));
    }

    #[test]
    fn test_metadata_roundtrip() {
        let mut store = store_with(&[]);
        assert_eq!(store.metadata("migrated_from").unwrap(), None);
        store.set_metadata("migrated_from", "legacy.json").unwrap();
        assert_eq!(
            store.metadata("migrated_from").unwrap().as_deref(),
            Some("legacy.json")
        );
        // Schema init stamped the version.
        assert_eq!(store.metadata("schema_version").unwrap().as_deref(), Some("2"));
    }
}
