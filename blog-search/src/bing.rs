//! Bing Web Search API client (secondary backend)

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use blog_core::{DateRange, SearchOptions, SearchResponse, SearchResult};

use crate::error::SearchError;
use crate::provider::SearchBackend;
use crate::types::{ApiErrorEnvelope, BingSearchResponse};

/// Bing Web Search client
pub struct BingClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl BingClient {
    /// Create a new Bing client
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: "https://api.bing.microsoft.com/v7.0/search".to_string(),
        }
    }
}

/// Bing `freshness` value; Bing has no yearly bucket
fn freshness(range: DateRange) -> Option<&'static str> {
    match range {
        DateRange::Day => Some("Day"),
        DateRange::Week => Some("Week"),
        DateRange::Month => Some("Month"),
        DateRange::Year => None,
    }
}

#[async_trait]
impl SearchBackend for BingClient {
    fn name(&self) -> &'static str {
        "bing"
    }

    #[instrument(skip(self, options))]
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let mut params = vec![
            ("q", options.scoped_query(query)),
            ("count", options.max_results.min(50).to_string()),
            ("responseFilter", "Webpages".to_string()),
            ("textFormat", "HTML".to_string()),
        ];
        if let Some(value) = options.date_range.and_then(freshness) {
            params.push(("freshness", value.to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
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
                message: format!("Bing Search API error: {}", message),
            });
        }

        let data: BingSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let (results, total_results) = match data.web_pages {
            Some(pages) => {
                let results: Vec<SearchResult> = pages
                    .value
                    .into_iter()
                    .map(|page| SearchResult {
                        title: page.name,
                        url: page.url,
                        snippet: page.snippet,
                        date: page.date_last_crawled,
                    })
                    .collect();
                (results, pages.total_estimated_matches)
            }
            None => (Vec::new(), 0),
        };

        debug!("Bing returned {} results", results.len());

        Ok(SearchResponse {
            results,
            total_results,
            search_time: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness() {
        assert_eq!(freshness(DateRange::Week), Some("Week"));
        assert_eq!(freshness(DateRange::Year), None);
    }
}
