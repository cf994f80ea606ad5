//! Per-category trend and question research
//!
//! Every search goes through `SearchProvider`, which never fails, so a bad
//! backend only thins out the aggregate: each query contributes what it can.

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info, instrument};

use blog_core::{DateRange, SearchOptions, SearchResult};

use crate::provider::SearchProvider;
use crate::questions::extract_questions;
use crate::topics::trending_topics;

/// Query templates for trending questions; `{}` is the topic
const QUESTION_QUERIES: &[&str] = &[
    "{} questions 2025",
    "how to {}",
    "{} for beginners",
    "{} vs",
    "best {} strategies",
    "{} tips and tricks",
    "{} mistakes to avoid",
    "{} analysis methods",
];

/// Only the first few question templates are searched per run
const QUESTION_QUERY_LIMIT: usize = 3;

const TREND_QUERIES: &[&str] = &[
    "{} market trends 2025",
    "{} news today",
    "{} analysis this week",
];

/// Results requested for the seed query unless overridden
pub const DEFAULT_SEED_RESULTS: u32 = 10;

const MAX_TRENDS: usize = 5;
const MAX_NEWS: usize = 5;
const MAX_QUESTIONS: usize = 10;

/// Trend, news and question lists gathered for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketTrends {
    pub trends: Vec<String>,
    pub news: Vec<String>,
    pub questions: Vec<String>,
}

/// Everything the research step hands to structure planning
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchFindings {
    pub questions: Vec<String>,
    pub trends: Vec<String>,
    pub news: Vec<String>,
    /// Results of the seed query, kept for callers that want sources
    pub seed_results: Vec<SearchResult>,
}

/// Bucket a result title lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TitleKind {
    Trend,
    News,
}

fn classify_title(title: &str) -> Option<TitleKind> {
    let lower = title.to_lowercase();
    if lower.contains("trend") {
        Some(TitleKind::Trend)
    } else if lower.contains("news") || lower.contains("update") {
        Some(TitleKind::News)
    } else {
        None
    }
}

fn fill(template: &str, value: &str) -> String {
    template.replace("{}", value)
}

fn dedup_capped(items: impl IntoIterator<Item = String>, cap: usize) -> Vec<String> {
    items
        .into_iter()
        .collect::<IndexSet<String>>()
        .into_iter()
        .take(cap)
        .collect()
}

/// Runs the trend/question research step
#[derive(Clone)]
pub struct TrendResearcher {
    search: SearchProvider,
    seed_results: u32,
}

impl TrendResearcher {
    pub fn new(search: SearchProvider) -> Self {
        Self {
            search,
            seed_results: DEFAULT_SEED_RESULTS,
        }
    }

    pub fn with_seed_results(mut self, seed_results: u32) -> Self {
        self.seed_results = seed_results;
        self
    }

    /// Question-like phrases found for the first few canned queries about `topic`
    #[instrument(skip(self))]
    pub async fn trending_questions(&self, topic: &str) -> Vec<String> {
        let options = SearchOptions::new(5).with_date_range(DateRange::Month);
        let mut questions = Vec::new();

        for template in QUESTION_QUERIES.iter().take(QUESTION_QUERY_LIMIT) {
            let query = fill(template, topic);
            let response = self.search.search(&query, &options).await;
            questions.extend(extract_questions(&response.results));
        }

        dedup_capped(questions, MAX_QUESTIONS)
    }

    /// Trend and news titles plus questions from this week's category searches
    #[instrument(skip(self))]
    pub async fn market_trends(&self, category: &str) -> MarketTrends {
        let options = SearchOptions::new(5).with_date_range(DateRange::Week);
        let mut trends = Vec::new();
        let mut news = Vec::new();
        let mut questions = Vec::new();

        for template in TREND_QUERIES {
            let query = fill(template, category);
            let response = self.search.search(&query, &options).await;

            for result in &response.results {
                match classify_title(&result.title) {
                    Some(TitleKind::Trend) => trends.push(result.title.clone()),
                    Some(TitleKind::News) => news.push(result.title.clone()),
                    None => {}
                }
            }
            questions.extend(extract_questions(&response.results));
        }

        MarketTrends {
            trends: dedup_capped(trends, MAX_TRENDS),
            news: dedup_capped(news, MAX_NEWS),
            questions: dedup_capped(questions, MAX_QUESTIONS),
        }
    }

    /// Full research step: seed search, trending topics, trending questions, market trends
    #[instrument(skip(self))]
    pub async fn research(&self, seed_query: &str, category: &str) -> ResearchFindings {
        let seed = self
            .search
            .search(
                seed_query,
                &SearchOptions::new(self.seed_results).with_date_range(DateRange::Month),
            )
            .await;
        let seed_questions = extract_questions(&seed.results);
        debug!(
            "Seed query returned {} results, {} questions",
            seed.results.len(),
            seed_questions.len()
        );

        let topics = trending_topics(Some(category));
        let category_questions = self.trending_questions(category).await;
        let market = self.market_trends(category).await;

        let questions: Vec<String> = dedup_capped(
            seed_questions
                .into_iter()
                .chain(category_questions)
                .chain(market.questions),
            usize::MAX,
        );
        let trends: Vec<String> = dedup_capped(topics.into_iter().chain(market.trends), usize::MAX);

        info!(
            "Research for '{}' gathered {} questions, {} trends, {} news titles",
            category,
            questions.len(),
            trends.len(),
            market.news.len()
        );

        ResearchFindings {
            questions,
            trends,
            news: market.news,
            seed_results: seed.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use blog_core::SearchResponse;

    use crate::error::SearchError;
    use crate::provider::SearchBackend;

    /// Returns canned titles and records every query it sees
    struct ScriptedBackend {
        titles: Vec<&'static str>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn search(
            &self,
            query: &str,
            _options: &SearchOptions,
        ) -> Result<SearchResponse, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            let results = self
                .titles
                .iter()
                .map(|t| SearchResult {
                    title: t.to_string(),
                    url: "https://example.org".to_string(),
                    snippet: String::new(),
                    date: None,
                })
                .collect::<Vec<_>>();
            Ok(SearchResponse {
                total_results: results.len() as u64,
                results,
                search_time: 0.0,
            })
        }
    }

    fn researcher(titles: Vec<&'static str>) -> (TrendResearcher, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend {
            titles,
            queries: Mutex::new(Vec::new()),
        });
        let provider = SearchProvider::with_backend(backend.clone());
        (TrendResearcher::new(provider), backend)
    }

    #[test]
    fn test_classify_title() {
        assert_eq!(classify_title("Forex Trends to Watch"), Some(TitleKind::Trend));
        assert_eq!(classify_title("Crypto News Roundup"), Some(TitleKind::News));
        assert_eq!(classify_title("Weekly market UPDATE"), Some(TitleKind::News));
        assert_eq!(classify_title("Trending news"), Some(TitleKind::Trend));
        assert_eq!(classify_title("Stock picks"), None);
    }

    #[tokio::test]
    async fn test_market_trends_buckets_and_dedups() {
        let (researcher, backend) = researcher(vec![
            "ETF trends for 2025",
            "ETF news: fund flows",
            "Is the ETF boom over?",
        ]);

        let trends = researcher.market_trends("etf").await;
        assert_eq!(trends.trends, vec!["ETF trends for 2025".to_string()]);
        assert_eq!(trends.news, vec!["ETF news: fund flows".to_string()]);
        assert_eq!(trends.questions, vec!["Is the ETF boom over?".to_string()]);

        let queries = backend.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![
                "etf market trends 2025",
                "etf news today",
                "etf analysis this week"
            ]
        );
    }

    #[tokio::test]
    async fn test_trending_questions_uses_first_three_queries() {
        let (researcher, backend) = researcher(vec!["What is a pip?"]);
        let questions = researcher.trending_questions("forex").await;

        assert_eq!(questions, vec!["What is a pip?".to_string()]);
        assert_eq!(backend.queries.lock().unwrap().len(), QUESTION_QUERY_LIMIT);
    }

    #[tokio::test]
    async fn test_research_with_empty_results() {
        let (researcher, _) = researcher(Vec::new());
        let findings = researcher.research("forex trading strategies 2025", "forex").await;

        assert!(findings.questions.is_empty());
        assert!(findings.news.is_empty());
        assert!(findings.seed_results.is_empty());
        // Static trending topics still seed the trend list
        assert_eq!(findings.trends.len(), 10);
    }
}
