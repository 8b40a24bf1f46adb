//! Word search API client.
//!
//! Endpoint shape: `GET {base_url}?length=..&word_sorting=points&
//! group_by_length=true&page_size=..&dictionary=all_en&page_token=..`
//! The first page carries `num_pages`/`num_words`; subsequent pages are
//! addressed by zero-based `page_token`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::models::{ApiWord, SearchResponse, WordPage};

/// Production endpoint of the word search API.
pub const DEFAULT_BASE_URL: &str = "https://fly.wordfinderapi.com/api/search";

/// Default words per page requested from the API.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Pause between page requests, to stay polite to the API.
const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// Request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-page progress, reported to the caller's callback during a fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchProgress {
    /// 1-based page just fetched.
    pub page: u32,
    pub total_pages: u32,
    pub words_so_far: u64,
    pub total_words: u64,
}

/// Result of fetching one length.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub words: Vec<ApiWord>,

    /// False when the fetch was cancelled before the last page; the words
    /// collected so far are still returned (and worth ingesting).
    pub complete: bool,

    pub pages_fetched: u32,
}

/// Blocking client for the word search API.
pub struct WordApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    page_size: u32,
    page_delay: Duration,
}

impl WordApiClient {
    /// Create a client against the production endpoint.
    pub fn new() -> FetchResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
        })
    }

    /// Override the endpoint URL (configuration input, also used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Override the inter-page delay.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Fetch a single page of words for `length`. `page_token` is zero-based
    /// and omitted for the first page.
    pub fn fetch_page(&self, length: u32, page_token: Option<u32>) -> FetchResult<WordPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("length", length.to_string()),
            ("word_sorting", "points".to_string()),
            ("group_by_length", "true".to_string()),
            ("page_size", self.page_size.to_string()),
            ("dictionary", "all_en".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("page_token", token.to_string()));
        }

        let response: SearchResponse = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .word_pages
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::unexpected(format!("no word pages for length {length}")))
    }

    /// Fetch every page of words for `length`.
    ///
    /// Checks `cancel` between pages: a cancelled fetch stops cleanly and
    /// returns the partial outcome. Page errors propagate unchanged; retry
    /// policy belongs to the caller.
    pub fn fetch_length(
        &self,
        length: u32,
        cancel: &AtomicBool,
        mut progress: impl FnMut(&FetchProgress),
    ) -> FetchResult<FetchOutcome> {
        let first = self.fetch_page(length, None)?;
        let total_pages = first.num_pages;
        let total_words = first.num_words;
        debug!(length, total_pages, total_words, "Starting paged fetch");

        let mut words = first.word_list;
        let mut pages_fetched = 1;
        progress(&FetchProgress {
            page: 1,
            total_pages,
            words_so_far: words.len() as u64,
            total_words,
        });

        for page_num in 2..=total_pages {
            if cancel.load(Ordering::Relaxed) {
                debug!(length, page = page_num - 1, "Fetch cancelled");
                return Ok(FetchOutcome {
                    words,
                    complete: false,
                    pages_fetched,
                });
            }

            std::thread::sleep(self.page_delay);
            let page = self.fetch_page(length, Some(page_num - 1))?;
            words.extend(page.word_list);
            pages_fetched += 1;
            progress(&FetchProgress {
                page: page_num,
                total_pages,
                words_so_far: words.len() as u64,
                total_words,
            });
        }

        let complete = !cancel.load(Ordering::Relaxed);
        debug!(length, words = words.len(), complete, "Paged fetch finished");
        Ok(FetchOutcome {
            words,
            complete,
            pages_fetched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let client = WordApiClient::new()
            .unwrap()
            .with_base_url("http://localhost:9999/api/search")
            .with_page_size(0)
            .with_page_delay(Duration::ZERO);
        assert_eq!(client.base_url, "http://localhost:9999/api/search");
        // Page size is clamped to at least 1.
        assert_eq!(client.page_size, 1);
        assert_eq!(client.page_delay, Duration::ZERO);
    }

    #[test]
    #[ignore] // Requires network
    fn test_live_fetch_first_page() {
        let client = WordApiClient::new().unwrap().with_page_size(10);
        let page = client.fetch_page(2, None).expect("live API reachable");
        assert!(!page.word_list.is_empty());
        assert!(page.word_list.iter().all(|w| w.word.len() == 2));
    }
}
