//! Web search and trend research for the blog pipeline
//!
//! This crate provides:
//! - Search backends: Google Custom Search (primary), Bing Web Search (secondary)
//!   and DuckDuckGo instant answers (keyless fallback)
//! - `SearchProvider`: the ranked backend resolved once from configuration
//! - Question extraction and trend/news classification over search results
//! - `TrendResearcher`: the per-category research step feeding structure planning

pub mod bing;
pub mod duckduckgo;
pub mod error;
pub mod google;
pub mod provider;
pub mod questions;
pub mod topics;
pub mod trends;
pub mod types;

pub use bing::BingClient;
pub use duckduckgo::DuckDuckGoClient;
pub use error::SearchError;
pub use google::GoogleSearchClient;
pub use provider::{SearchBackend, SearchConfig, SearchProvider};
pub use questions::extract_questions;
pub use topics::trending_topics;
pub use trends::{MarketTrends, ResearchFindings, TrendResearcher};
