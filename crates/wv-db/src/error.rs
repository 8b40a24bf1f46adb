//! Error types for wv-db.

use thiserror::Error;

/// Result type alias for wv-db operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in wv-db operations.
///
/// The store never retries internally: transient-vs-fatal classification is
/// the caller's call, so every variant carries enough context (word, batch,
/// operation) to log or recover without the store formatting anything itself.
#[derive(Debug, Error)]
pub enum DbError {
    // ========================================================================
    // Validation errors
    // ========================================================================
    /// A record in an ingest batch failed validation. The whole batch is
    /// rejected and nothing is written.
    #[error("Invalid record `{word}`: {reason}")]
    Validation { word: String, reason: String },

    // ========================================================================
    // Storage engine errors
    // ========================================================================
    /// Underlying SQLite failure (disk, corruption, contention). The store
    /// remains in its last committed state.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Operation attempted after the store handle was closed.
    #[error("Store is closed")]
    Closed,

    // ========================================================================
    // Lookup errors
    // ========================================================================
    /// A query addressed a specific word that does not exist. Set-returning
    /// queries report an empty sequence instead, never this error.
    #[error("Word not found: `{0}`")]
    WordNotFound(String),

    // ========================================================================
    // General errors
    // ========================================================================
    /// IO error wrapper (legacy document reads, size probes).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper (legacy document parsing).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DbError {
    /// Create a validation error for a named record.
    pub fn validation(word: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            word: word.into(),
            reason: reason.into(),
        }
    }

    /// True when the error is a validation rejection (caller can fix the
    /// batch and resubmit; retrying unchanged will fail again).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_names_the_record() {
        let err = DbError::validation("qq1", "word must contain only letters");
        assert_eq!(
            err.to_string(),
            "Invalid record `qq1`: word must contain only letters"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(DbError::Closed.to_string(), "Store is closed");
        assert!(!DbError::Closed.is_validation());
    }
}
