//! Normalized web-search data structures

use serde::{Deserialize, Serialize};

/// A single search hit, normalized across backends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Search response returned by every backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_results: u64,
    /// Seconds reported by the backend (0 when unknown)
    pub search_time: f64,
}

/// Recency restriction for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Day,
    Week,
    Month,
    Year,
}

/// Options accepted by `SearchProvider::search`
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub max_results: u32,
    pub date_range: Option<DateRange>,
    /// Restrict results to a single site (`site:` operator)
    pub site: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            date_range: None,
            site: None,
        }
    }
}

impl SearchOptions {
    pub fn new(max_results: u32) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Query text with the `site:` restriction appended when set
    pub fn scoped_query(&self, query: &str) -> String {
        match &self.site {
            Some(site) => format!("{} site:{}", query, site),
            None => query.to_string(),
        }
    }
}
