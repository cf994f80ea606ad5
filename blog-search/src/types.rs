//! Native response shapes for each search backend

use serde::Deserialize;

// ============================================================================
// Google Custom Search Types
// ============================================================================

/// Google Custom Search response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSearchResponse {
    #[serde(default)]
    pub items: Vec<GoogleItem>,
    pub search_information: Option<GoogleSearchInformation>,
}

/// One Google result
#[derive(Debug, Deserialize)]
pub struct GoogleItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    /// Loosely structured page metadata (`metatags[0]["article:published_time"]`)
    pub pagemap: Option<serde_json::Value>,
}

impl GoogleItem {
    /// Published time advertised by the page's meta tags, if any
    pub fn published_time(&self) -> Option<String> {
        self.pagemap
            .as_ref()?
            .get("metatags")?
            .get(0)?
            .get("article:published_time")?
            .as_str()
            .map(String::from)
    }
}

/// Search statistics; Google reports both numbers as strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSearchInformation {
    pub total_results: Option<String>,
    pub search_time: Option<f64>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

// ============================================================================
// Bing Web Search Types
// ============================================================================

/// Bing Web Search response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingSearchResponse {
    pub web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingWebPages {
    #[serde(default)]
    pub value: Vec<BingWebPage>,
    #[serde(default)]
    pub total_estimated_matches: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingWebPage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    pub date_last_crawled: Option<String>,
}

// ============================================================================
// DuckDuckGo Instant Answer Types
// ============================================================================

/// DuckDuckGo instant-answer response (only the fields we read)
#[derive(Debug, Deserialize)]
pub struct DuckDuckGoResponse {
    #[serde(rename = "RelatedTopics", default)]
    pub related_topics: Vec<DuckDuckGoTopic>,
}

/// A related topic; grouped topics carry no `FirstURL` and are skipped
#[derive(Debug, Deserialize)]
pub struct DuckDuckGoTopic {
    #[serde(rename = "FirstURL")]
    pub first_url: Option<String>,
    #[serde(rename = "Text")]
    pub text: Option<String>,
}
