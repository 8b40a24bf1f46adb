//! Error types for wv-core.

use thiserror::Error;

/// Result type alias for wv-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Domain-specific errors for Word Vault operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An explicitly requested configuration file was not found.
    #[error("Config not found at {0}")]
    MissingConfig(String),

    /// The configuration file could not be parsed.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A configuration value is invalid.
    ///
    /// Used for validation errors detected at runtime (e.g., page_size=0).
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// Storage layer error, surfaced unchanged.
    #[error(transparent)]
    Db(#[from] wv_db::DbError),

    /// Fetch layer error, surfaced unchanged.
    #[error(transparent)]
    Fetch(#[from] wv_fetch::FetchError),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
