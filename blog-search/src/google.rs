//! Google Custom Search API client (primary backend)

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use blog_core::{DateRange, SearchOptions, SearchResponse, SearchResult};

use crate::error::SearchError;
use crate::provider::SearchBackend;
use crate::types::{ApiErrorEnvelope, GoogleSearchResponse};

/// Google Custom Search client
pub struct GoogleSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: String,
}

impl GoogleSearchClient {
    /// Create a new Google Custom Search client
    pub fn new(api_key: String, engine_id: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            engine_id,
            base_url: "https://www.googleapis.com/customsearch/v1".to_string(),
        }
    }
}

/// Google's `dateRestrict` value for a range
fn date_restrict(range: DateRange) -> &'static str {
    match range {
        DateRange::Day => "d1",
        DateRange::Week => "w1",
        DateRange::Month => "m1",
        DateRange::Year => "y1",
    }
}

#[async_trait]
impl SearchBackend for GoogleSearchClient {
    fn name(&self) -> &'static str {
        "google"
    }

    #[instrument(skip(self, options))]
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("cx", self.engine_id.clone()),
            ("q", options.scoped_query(query)),
            ("num", options.max_results.min(10).to_string()),
        ];
        if let Some(range) = options.date_range {
            params.push(("dateRestrict", date_restrict(range).to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: format!("Google Search API error: {}", message),
            });
        }

        let data: GoogleSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let (total_results, search_time) = data
            .search_information
            .as_ref()
            .map(|info| {
                (
                    info.total_results
                        .as_deref()
                        .and_then(|t| t.parse().ok())
                        .unwrap_or(0),
                    info.search_time.unwrap_or(0.0),
                )
            })
            .unwrap_or((0, 0.0));

        let results: Vec<SearchResult> = data
            .items
            .iter()
            .map(|item| SearchResult {
                title: item.title.clone(),
                url: item.link.clone(),
                snippet: item.snippet.clone(),
                date: item.published_time(),
            })
            .collect();

        debug!("Google returned {} results", results.len());

        Ok(SearchResponse {
            results,
            total_results,
            search_time,
        })
    }
}
