//! # wv-fetch
//!
//! Remote word-API client for Word Vault.
//!
//! This crate is the network-facing collaborator: it pulls word/points pages
//! from the word-game search API and hands finished batches back to the
//! caller. It knows nothing about the store; `wv-core` converts the wire
//! records into the ingest shape.
//!
//! The client uses blocking HTTP: the core is synchronous at the storage
//! boundary, and paginating with an inter-page delay needs no async runtime.
//! Long fetches are cancellable between pages via a shared flag; a cancelled
//! fetch still returns the pages collected so far.

pub mod client;
pub mod error;
pub mod models;

pub use client::{FetchOutcome, FetchProgress, WordApiClient, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
pub use error::{FetchError, FetchResult};
pub use models::{ApiWord, SearchResponse, WordPage};
