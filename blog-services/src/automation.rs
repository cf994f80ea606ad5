//! Automated publishing run
//!
//! One run draws a content type, picks a broker or trending topic to focus
//! on, generates the article through the assembler and stores it under a
//! unique slug.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument};

use blog_core::{BlogContentRequest, BrokerData, ContentType};
use blog_search::topics::trending_topics_with;

use crate::assembler::BlogAssembler;
use crate::storage::{BlogStorage, StorageError};

/// Brokers loaded from storage before narrowing to the top tier
const BROKER_POOL: usize = 100;
/// Brokers eligible for a review
const TOP_BROKERS: usize = 20;
/// Leading trending topics considered for a general article
const TOPIC_POOL: usize = 5;

const BROKER_QUERIES: &[&str] = &[
    "\"{}\" review 2025",
    "{} trading platform features",
    "{} fees and spreads",
    "{} vs competitors",
    "is {} safe and regulated",
];

/// What a run will write about, decided before any network call
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub content_type: &'static ContentType,
    pub broker: Option<BrokerData>,
    pub search_query: String,
    pub target_keywords: Vec<String>,
}

/// Summary of a stored post returned to the trigger caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationResult {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content_type: String,
    pub category: String,
    pub broker: Option<String>,
    pub reading_time: u32,
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No brokers available for review content")]
    NoBrokers,
}

pub struct BlogAutomation {
    assembler: Arc<BlogAssembler>,
    storage: Arc<BlogStorage>,
}

impl BlogAutomation {
    pub fn new(assembler: Arc<BlogAssembler>, storage: Arc<BlogStorage>) -> Self {
        Self { assembler, storage }
    }

    /// Generate, de-duplicate and store one post
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<AutomationResult, AutomationError> {
        info!("Starting automated blog post generation");
        let plan = self.plan_run(&mut rand::rng())?;
        self.run_plan(plan).await
    }

    /// Draw a content type and the focus for it
    pub fn plan_run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunPlan, AutomationError> {
        let content_type = self.assembler.selector().select(rng);
        self.plan_for(content_type, rng)
    }

    pub fn plan_for<R: Rng + ?Sized>(
        &self,
        content_type: &'static ContentType,
        rng: &mut R,
    ) -> Result<RunPlan, AutomationError> {
        info!(
            "Selected content type: {} ({})",
            content_type.name, content_type.category
        );

        if content_type.category == "brokers" {
            let brokers = self.storage.top_brokers(BROKER_POOL)?;
            let top = &brokers[..brokers.len().min(TOP_BROKERS)];
            let broker = top.choose(rng).cloned().ok_or(AutomationError::NoBrokers)?;
            info!("Selected broker: {}", broker.name);

            let search_query = BROKER_QUERIES
                .choose(rng)
                .map(|template| template.replace("{}", &broker.name))
                .unwrap_or_else(|| format!("{} review", broker.name));
            let lower = broker.name.to_lowercase();
            let target_keywords = vec![
                format!("{} review", lower),
                format!("{} broker", lower),
                "forex broker review".to_string(),
                "trading platform review".to_string(),
            ];

            return Ok(RunPlan {
                content_type,
                broker: Some(broker),
                search_query,
                target_keywords,
            });
        }

        let topics = trending_topics_with(Some(content_type.category), rng);
        let pool = &topics[..topics.len().min(TOPIC_POOL)];
        let search_query = pool
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| content_type.name.to_string());
        info!("Selected topic: {}", search_query);

        Ok(RunPlan {
            content_type,
            broker: None,
            search_query,
            target_keywords: content_type.keywords.iter().map(|k| k.to_string()).collect(),
        })
    }

    /// Generate and persist the post described by `plan`
    pub async fn run_plan(&self, plan: RunPlan) -> Result<AutomationResult, AutomationError> {
        let broker_name = plan.broker.as_ref().map(|b| b.name.clone());
        let content_type = plan.content_type;

        let mut post = self
            .assembler
            .generate(BlogContentRequest {
                broker: plan.broker,
                content_type: Some(content_type),
                search_query: plan.search_query,
                target_keywords: plan.target_keywords,
                category: Some(content_type.category.to_string()),
            })
            .await;

        if self.storage.slug_exists(&post.slug)? {
            post.slug = format!("{}-{:04}", post.slug, Utc::now().timestamp_millis() % 10_000);
        }

        let stored = self.storage.insert_post(&post, content_type.id)?;

        info!(
            "Blog post created: '{}' at /blog/{} ({} min read)",
            stored.title, stored.slug, stored.reading_time
        );

        Ok(AutomationResult {
            id: stored.id,
            title: stored.title,
            url: format!("/blog/{}", stored.slug),
            slug: stored.slug,
            content_type: content_type.name.to_string(),
            category: content_type.category.to_string(),
            broker: broker_name,
            reading_time: stored.reading_time,
        })
    }
}
