//! Ranked search-backend strategy
//!
//! The backend is chosen once, at construction: Google when its key and engine
//! id are configured, else Bing when its key is configured, else DuckDuckGo.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use blog_core::{with_fallback, SearchOptions, SearchResponse, SearchResult};

use crate::bing::BingClient;
use crate::duckduckgo::DuckDuckGoClient;
use crate::error::SearchError;
use crate::google::GoogleSearchClient;

/// A web search backend that maps its native response into `SearchResponse`
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Short backend identifier used in logs
    fn name(&self) -> &'static str;

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError>;
}

/// Credentials for the keyed search backends
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    pub google_api_key: Option<String>,
    pub google_engine_id: Option<String>,
    pub bing_api_key: Option<String>,
}

impl SearchConfig {
    /// Load search credentials from environment variables
    ///
    /// Reads GOOGLE_SEARCH_API_KEY, GOOGLE_SEARCH_ENGINE_ID and
    /// BING_SEARCH_API_KEY; blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            google_api_key: non_empty_var("GOOGLE_SEARCH_API_KEY"),
            google_engine_id: non_empty_var("GOOGLE_SEARCH_ENGINE_ID"),
            bing_api_key: non_empty_var("BING_SEARCH_API_KEY"),
        }
    }

    /// Whether any keyed backend is available
    pub fn has_keyed_backend(&self) -> bool {
        (self.google_api_key.is_some() && self.google_engine_id.is_some())
            || self.bing_api_key.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Search entry point used by the pipeline; never returns an error
#[derive(Clone)]
pub struct SearchProvider {
    backend: Arc<dyn SearchBackend>,
}

impl SearchProvider {
    /// Resolve the highest-ranked configured backend
    pub fn from_config(config: &SearchConfig) -> Self {
        let backend: Arc<dyn SearchBackend> =
            match (&config.google_api_key, &config.google_engine_id) {
                (Some(key), Some(cx)) => {
                    Arc::new(GoogleSearchClient::new(key.clone(), cx.clone()))
                }
                _ => match &config.bing_api_key {
                    Some(key) => Arc::new(BingClient::new(key.clone())),
                    None => Arc::new(DuckDuckGoClient::new()),
                },
            };

        info!("Search provider resolved to {}", backend.name());
        Self { backend }
    }

    /// Use a specific backend
    pub fn with_backend(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Search, converting any backend failure into a single synthetic result
    #[instrument(skip(self, options), fields(backend = self.backend.name()))]
    pub async fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        with_fallback(
            "Web search",
            self.backend.search(query, options),
            || synthetic_response(query),
        )
        .await
    }
}

/// Placeholder response embedding the query text
fn synthetic_response(query: &str) -> SearchResponse {
    SearchResponse {
        results: vec![SearchResult {
            title: format!("{} - Latest Information", query),
            url: "https://example.com".to_string(),
            snippet: format!("Recent information about {} and related topics.", query),
            date: None,
        }],
        total_results: 1,
        search_time: 0.0,
    }
}
