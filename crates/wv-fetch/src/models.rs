//! Wire models for the word search API.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level search response. The API groups results by length, so a
/// single-length query carries one page object in `word_pages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub word_pages: Vec<WordPage>,
}

/// One page of grouped results, with pagination info on the first page.
#[derive(Debug, Clone, Deserialize)]
pub struct WordPage {
    #[serde(default = "default_num_pages")]
    pub num_pages: u32,

    #[serde(default)]
    pub num_words: u64,

    #[serde(default)]
    pub word_list: Vec<ApiWord>,
}

fn default_num_pages() -> u32 {
    1
}

/// One word entry as the API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiWord {
    pub word: String,

    #[serde(default)]
    pub points: i64,

    #[serde(default)]
    pub dict_matches: BTreeMap<String, bool>,
}
