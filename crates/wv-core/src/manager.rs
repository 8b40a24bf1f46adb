//! Fetch-and-store orchestration.
//!
//! [`WordManager`] owns the store handle and the API client for a session and
//! releases both at close. The fetch path runs page by page and only hands
//! *finished* batches to the store, so storage never blocks on the network.
//! A shared cancellation flag lets the front-end abort a long refresh between
//! pages; whatever was collected is still merged (marked partial).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use wv_db::{RawWordRecord, WordStore};
use wv_fetch::{ApiWord, FetchProgress, WordApiClient};

use crate::config::Config;
use crate::errors::CoreResult;

/// Outcome of merging one batch into the store.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Records submitted to the upsert.
    pub submitted: u64,

    /// Matching row count before the merge (scoped to the refreshed length).
    pub before: u64,

    /// Rows actually inserted or updated.
    pub affected: u64,

    /// Matching row count after the merge.
    pub after: u64,
}

/// Outcome of refreshing one word length from the remote API.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub length: u32,
    pub pages_fetched: u32,

    /// False when the refresh was cancelled mid-fetch; the partial batch was
    /// still merged.
    pub complete: bool,

    pub merge: MergeReport,
}

/// Session-scoped owner of the store and the API client.
pub struct WordManager {
    store: WordStore,
    client: WordApiClient,
    cancel: Arc<AtomicBool>,
    length_delay: Duration,
}

impl WordManager {
    /// Open the store and build the API client from `config`.
    pub fn open(config: &Config) -> CoreResult<Self> {
        let store = WordStore::open(&config.database_path)?;
        let client = WordApiClient::new()?
            .with_base_url(&config.api.base_url)
            .with_page_size(config.api.page_size)
            .with_page_delay(Duration::from_millis(config.api.page_delay_ms));
        Ok(Self {
            store,
            client,
            cancel: Arc::new(AtomicBool::new(false)),
            length_delay: Duration::from_millis(config.api.length_delay_ms),
        })
    }

    /// Build a manager around an existing store (used by tests).
    pub fn with_store(store: WordStore, client: WordApiClient) -> Self {
        Self {
            store,
            client,
            cancel: Arc::new(AtomicBool::new(false)),
            length_delay: Duration::ZERO,
        }
    }

    /// The owned store, for read queries.
    pub fn store(&self) -> &WordStore {
        &self.store
    }

    /// The owned store, for writes and administrative operations.
    pub fn store_mut(&mut self) -> &mut WordStore {
        &mut self.store
    }

    /// Shared flag a front-end can set to abort a running refresh between
    /// pages. Checked by the fetch loop; never interrupts a store write.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Close the store handle. Further store operations fail.
    pub fn close(&mut self) -> CoreResult<()> {
        self.store.close()?;
        Ok(())
    }

    /// Merge a finished batch into the store, reporting before/after counts
    /// scoped to `length` (or the whole store when `None`).
    pub fn merge_words(
        &mut self,
        records: &[RawWordRecord],
        length: Option<u32>,
    ) -> CoreResult<MergeReport> {
        let count = |store: &WordStore| -> CoreResult<u64> {
            Ok(match length {
                Some(len) => store.get_by_length(len)?.len() as u64,
                None => store.count()?,
            })
        };

        let before = count(&self.store)?;
        let affected = self.store.insert_batch(records)? as u64;
        let after = count(&self.store)?;

        debug!(
            submitted = records.len(),
            before, affected, after, "Merged word batch"
        );
        Ok(MergeReport {
            submitted: records.len() as u64,
            before,
            affected,
            after,
        })
    }

    /// Fetch all pages for one length and merge the result.
    ///
    /// A cancelled fetch merges whatever was collected and reports
    /// `complete = false`.
    pub fn refresh_length(
        &mut self,
        length: u32,
        mut progress: impl FnMut(u32, &FetchProgress),
    ) -> CoreResult<RefreshReport> {
        let outcome = self
            .client
            .fetch_length(length, &self.cancel, |p| progress(length, p))?;

        let records: Vec<RawWordRecord> = outcome.words.iter().map(to_raw_record).collect();
        let merge = self.merge_words(&records, Some(length))?;

        Ok(RefreshReport {
            length,
            pages_fetched: outcome.pages_fetched,
            complete: outcome.complete,
            merge,
        })
    }

    /// Refresh several lengths sequentially (polite to the API), pausing
    /// between lengths and stopping early when cancelled. Reports for the
    /// lengths processed so far are always returned.
    pub fn refresh_lengths(
        &mut self,
        lengths: &[u32],
        mut progress: impl FnMut(u32, &FetchProgress),
    ) -> CoreResult<Vec<RefreshReport>> {
        let mut reports = Vec::with_capacity(lengths.len());

        for (i, &length) in lengths.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                break;
            }

            let report = self.refresh_length(length, &mut progress)?;
            let stop = !report.complete;
            reports.push(report);
            if stop {
                break;
            }

            if i + 1 < lengths.len() {
                std::thread::sleep(self.length_delay);
            }
        }

        Ok(reports)
    }
}

/// Convert a wire record into the ingest shape.
fn to_raw_record(word: &ApiWord) -> RawWordRecord {
    RawWordRecord {
        word: word.word.clone(),
        points: word.points,
        dictionary_matches: word.dict_matches.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_manager() -> WordManager {
        let store = WordStore::open_in_memory().unwrap();
        let client = WordApiClient::new().unwrap();
        WordManager::with_store(store, client)
    }

    #[test]
    fn test_merge_words_reports_counts() {
        let mut manager = test_manager();
        manager
            .merge_words(&[RawWordRecord::new("cat", 10)], Some(3))
            .unwrap();

        let report = manager
            .merge_words(
                &[
                    RawWordRecord::new("cat", 10), // unchanged, not counted
                    RawWordRecord::new("bat", 12),
                ],
                Some(3),
            )
            .unwrap();
        assert_eq!(report.submitted, 2);
        assert_eq!(report.before, 1);
        assert_eq!(report.affected, 1);
        assert_eq!(report.after, 2);
    }

    #[test]
    fn test_merge_words_unscoped_counts_whole_store() {
        let mut manager = test_manager();
        let report = manager
            .merge_words(
                &[RawWordRecord::new("cat", 10), RawWordRecord::new("apple", 8)],
                None,
            )
            .unwrap();
        assert_eq!(report.before, 0);
        assert_eq!(report.after, 2);
    }

    #[test]
    fn test_to_raw_record_maps_fields() {
        let api_word: ApiWord = serde_json::from_str(
            r#"{"word": "jazzy", "points": 34, "dict_matches": {"wwf": true}}"#,
        )
        .unwrap();
        let raw = to_raw_record(&api_word);
        assert_eq!(raw.word, "jazzy");
        assert_eq!(raw.points, 34);
        assert_eq!(raw.dictionary_matches.get("wwf"), Some(&true));
    }

    #[test]
    fn test_close_releases_store() {
        let mut manager = test_manager();
        manager.close().unwrap();
        assert!(manager.store().count().is_err());
    }
}
