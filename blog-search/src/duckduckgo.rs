//! DuckDuckGo instant-answer client (keyless fallback backend)
//!
//! DuckDuckGo has no official web search API. The instant-answer endpoint
//! returns related topics rather than ranked pages, so results are sparse and
//! carry no guarantee of question-style content.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use blog_core::{SearchOptions, SearchResponse, SearchResult};

use crate::error::SearchError;
use crate::provider::SearchBackend;
use crate::types::{DuckDuckGoResponse, DuckDuckGoTopic};

/// DuckDuckGo instant-answer client
pub struct DuckDuckGoClient {
    client: Client,
    base_url: String,
}

impl DuckDuckGoClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Query string for one lookup; a site restriction is folded into `q`
fn query_params(query: &str, options: &SearchOptions) -> [(&'static str, String); 4] {
    [
        ("q", options.scoped_query(query)),
        ("format", "json".to_string()),
        ("no_html", "1".to_string()),
        ("skip_disambig", "1".to_string()),
    ]
}

/// Map related topics to results, dropping entries without a URL
fn topics_to_results(
    topics: Vec<DuckDuckGoTopic>,
    query: &str,
    max_results: usize,
) -> Vec<SearchResult> {
    topics
        .into_iter()
        .filter_map(|topic| {
            let url = topic.first_url.filter(|u| !u.is_empty())?;
            let title = topic
                .text
                .as_deref()
                .and_then(|t| t.split(" - ").next())
                .filter(|t| !t.is_empty())
                .unwrap_or(query)
                .to_string();
            let snippet = topic
                .text
                .unwrap_or_else(|| format!("Information about {}", query));
            Some(SearchResult {
                title,
                url,
                snippet,
                date: None,
            })
        })
        .take(max_results)
        .collect()
}

#[async_trait]
impl SearchBackend for DuckDuckGoClient {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    #[instrument(skip(self, options))]
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&query_params(query, options))
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: DuckDuckGoResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let results = topics_to_results(data.related_topics, query, options.max_results as usize);
        debug!("DuckDuckGo returned {} usable topics", results.len());

        Ok(SearchResponse {
            total_results: results.len() as u64,
            results,
            search_time: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(url: Option<&str>, text: Option<&str>) -> DuckDuckGoTopic {
        DuckDuckGoTopic {
            first_url: url.map(String::from),
            text: text.map(String::from),
        }
    }

    #[test]
    fn test_query_params_scope_site() {
        let options = SearchOptions::new(5).with_site("reddit.com");
        let params = query_params("forex broker fees", &options);
        assert_eq!(params[0], ("q", "forex broker fees site:reddit.com".to_string()));
        assert_eq!(params[1], ("format", "json".to_string()));

        let params = query_params("forex broker fees", &SearchOptions::new(5));
        assert_eq!(params[0].1, "forex broker fees");
    }

    #[test]
    fn test_topics_to_results() {
        let topics = vec![
            topic(
                Some("https://duckduckgo.com/Scalping"),
                Some("Scalping - A trading style that profits from small price changes"),
            ),
            topic(None, Some("Grouped topic")),
            topic(Some("https://duckduckgo.com/Pip"), None),
        ];

        let results = topics_to_results(topics, "forex", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Scalping");
        assert!(results[0].snippet.starts_with("Scalping - A trading style"));
        assert_eq!(results[1].title, "forex");
        assert_eq!(results[1].snippet, "Information about forex");
    }

    #[test]
    fn test_topics_respect_max_results() {
        let topics = (0..8)
            .map(|i| DuckDuckGoTopic {
                first_url: Some(format!("https://duckduckgo.com/{}", i)),
                text: Some(format!("Topic {}", i)),
            })
            .collect();
        assert_eq!(topics_to_results(topics, "q", 3).len(), 3);
    }
}
