//! Record, query, and aggregate result types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flags::DictFlags;

// ============================================================================
// RawWordRecord
// ============================================================================

/// A word record as produced by the fetch collaborator, before validation.
///
/// This is the sole input shape of the ingest protocol: a word, its score,
/// and a source-name -> membership mapping. Unknown source names are rejected
/// at ingest time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWordRecord {
    pub word: String,

    #[serde(default)]
    pub points: i64,

    #[serde(default)]
    pub dictionary_matches: BTreeMap<String, bool>,
}

impl RawWordRecord {
    /// Create a record with no dictionary memberships.
    pub fn new(word: impl Into<String>, points: i64) -> Self {
        Self {
            word: word.into(),
            points,
            dictionary_matches: BTreeMap::new(),
        }
    }

    /// Record membership (or explicit non-membership) in a named source.
    pub fn with_match(mut self, source: impl Into<String>, is_match: bool) -> Self {
        self.dictionary_matches.insert(source.into(), is_match);
        self
    }
}

// ============================================================================
// WordRecord
// ============================================================================

/// A stored word record.
///
/// `length` is derived from `word` at ingest and kept denormalized for index
/// efficiency; it is never independently settable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub word: String,
    pub length: u32,
    pub points: i64,

    #[serde(rename = "dictionaryMatches")]
    pub flags: DictFlags,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// SearchQuery
// ============================================================================

/// Composable predicate query over the word store.
///
/// All supplied predicates are combined with AND. A query with no predicates
/// returns the full store; callers paginate externally for large stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// SQL-LIKE wildcard pattern against the word (`%` = any run, `_` = any
    /// single char).
    pub pattern: Option<String>,

    /// Literal substring the word must contain.
    pub contains: Option<String>,

    /// Inclusive lower bound on points.
    pub min_points: Option<i64>,

    /// Inclusive upper bound on points.
    pub max_points: Option<i64>,

    /// Acceptable lengths; empty = no length constraint.
    pub lengths: Vec<u32>,
}

impl SearchQuery {
    /// An unconstrained query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wildcard pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the substring constraint.
    pub fn with_contains(mut self, contains: impl Into<String>) -> Self {
        self.contains = Some(contains.into());
        self
    }

    /// Set the inclusive minimum points.
    pub fn with_min_points(mut self, min: i64) -> Self {
        self.min_points = Some(min);
        self
    }

    /// Set the inclusive maximum points.
    pub fn with_max_points(mut self, max: i64) -> Self {
        self.max_points = Some(max);
        self
    }

    /// Restrict to a set of lengths.
    pub fn with_lengths(mut self, lengths: impl IntoIterator<Item = u32>) -> Self {
        self.lengths = lengths.into_iter().collect();
        self
    }

    /// True when no predicate is set (the query matches the whole store).
    pub fn is_unconstrained(&self) -> bool {
        self.pattern.is_none()
            && self.contains.is_none()
            && self.min_points.is_none()
            && self.max_points.is_none()
            && self.lengths.is_empty()
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Aggregate statistics over the store (or one length slice of it).
///
/// Computed by the engine's aggregation, never by scanning rows in-process.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub total_words: u64,
    pub average_points: f64,
    pub min_points: i64,
    pub max_points: i64,
    pub total_points: i64,

    /// The top-scoring word in scope (points desc, word asc tiebreak).
    pub highest_word: Option<String>,
}

/// On-disk footprint of the store file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeInfo {
    /// Raw size in bytes.
    pub bytes: u64,

    /// Human-readable rendering of `bytes`.
    pub human: String,

    /// The measured store file.
    pub path: PathBuf,
}

impl SizeInfo {
    pub fn new(bytes: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            bytes,
            human: format_bytes(bytes),
            path: path.into(),
        }
    }
}

/// Format bytes as a human-readable string (KB, MB, GB).
pub(crate) fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
