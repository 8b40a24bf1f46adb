//! Table/index DDL and connection setup.
//!
//! The store is a single SQLite file in WAL mode. One flat `words` relation
//! replaces the legacy group-by-length document; the four indexes back the
//! query layer's complexity guarantees (the composite `(length, points)`
//! index serves "top N words of length L" in one index scan).

use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use crate::error::DbResult;
use crate::flags::Dictionary;

// ============================================================================
// Constants
// ============================================================================

/// Main words table.
pub const TABLE_WORDS: &str = "words";

/// Dictionary source -> bit position lookup table.
pub const TABLE_DICTIONARIES: &str = "dictionaries";

/// Store-level key/value metadata table.
pub const TABLE_METADATA: &str = "metadata";

/// Schema version recorded in the metadata table at creation.
pub const SCHEMA_VERSION: &str = "2";

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u64 = 5_000;

const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS words (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    word        TEXT NOT NULL UNIQUE,
    length      INTEGER NOT NULL,
    points      INTEGER NOT NULL,
    dict_flags  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_words_word ON words(word);
CREATE INDEX IF NOT EXISTS idx_words_length ON words(length);
CREATE INDEX IF NOT EXISTS idx_words_points ON words(points);
CREATE INDEX IF NOT EXISTS idx_words_length_points ON words(length, points DESC);

CREATE TABLE IF NOT EXISTS dictionaries (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL UNIQUE,
    bit_position INTEGER NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS metadata (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

// ============================================================================
// Connection setup
// ============================================================================

/// Open (or create) the store file at `path` and initialize the schema.
///
/// Applies the durability/concurrency pragmas: WAL journal mode (readers are
/// never blocked by an in-progress writer, a crash mid-write cannot corrupt
/// committed rows), NORMAL synchronous, foreign keys, and a busy timeout.
pub fn open_database(path: &Path) -> DbResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    debug!("Opening word store at {:?}", path);
    let conn = Connection::open(path)?;

    conn.pragma_update(None, "journal_mode", "wal")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;

    init_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory store (for testing). WAL mode does not apply to
/// in-memory databases, so only foreign keys are configured.
pub fn open_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Create tables and indexes if missing, and seed the dictionary and
/// metadata tables. Safe to run against an already initialized store.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_TABLES_SQL)?;

    // Seed the dictionary lookup table with the known sources.
    {
        let mut stmt = conn.prepare_cached(
            "INSERT OR IGNORE INTO dictionaries (id, name, bit_position) VALUES (?1, ?2, ?3)",
        )?;
        for dict in Dictionary::ALL {
            stmt.execute((i64::from(dict.bit()) + 1, dict.as_str(), dict.bit()))?;
        }
    }

    // Version and creation stamp, written once at first initialization.
    let now = Utc::now();
    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value, updated_at) VALUES ('schema_version', ?1, ?2)",
        (SCHEMA_VERSION, now),
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value, updated_at) VALUES ('created_at', ?1, ?2)",
        (now.to_rfc3339(), now),
    )?;

    Ok(())
}
