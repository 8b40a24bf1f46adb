//! # wv-core
//!
//! **Word Vault** - core engine library.
//!
//! This crate ties the infrastructure crates together: configuration, the
//! [`WordManager`] that orchestrates fetch-then-ingest, and the rolled-up
//! error type. It is consumed by the `wv` CLI and usable by other Rust tools.
//!
//! ## Main Types
//!
//! - [`WordManager`] - owns the store and the API client, runs refreshes
//! - [`Config`] - resolved configuration (store path, API settings)
//! - [`CoreError`] - domain error type
//!
//! ## Example
//!
//! ```ignore
//! use wv_core::{Config, WordManager};
//!
//! let config = Config::load(None)?;
//! let mut manager = WordManager::open(&config)?;
//!
//! let report = manager.refresh_length(5, |_, _| {})?;
//! println!("{} words after merge", report.merge.after);
//! manager.close()?;
//! ```

pub mod config;
pub mod errors;
pub mod manager;

pub use config::{ApiConfig, Config, CONFIG_ENV_VAR};
pub use errors::{CoreError, CoreResult};
pub use manager::{MergeReport, RefreshReport, WordManager};

// Storage surface, re-exported so front-ends only depend on wv-core.
pub use wv_db::{
    load_legacy_records, migrate, migration_status, DbError, DictFlags, Dictionary,
    MigrationReport, MigrationStatus, RawWordRecord, SearchQuery, SizeInfo, WordRecord, WordStats,
    WordStore, DEFAULT_BATCH_SIZE,
};
pub use wv_fetch::{FetchError, FetchProgress};
