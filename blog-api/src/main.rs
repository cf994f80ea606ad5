//! Broker Blog API Server
//!
//! HTTP API server that generates, stores and serves automated blog posts.

mod routes;

use anyhow::Context;
use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use blog_core::BrokerData;
use blog_search::{SearchConfig, SearchProvider};
use blog_services::{
    validate, AutomationManager, BlogAssembler, BlogAutomation, BlogScheduler, BlogStorage,
    PipelineConfig, ScheduleConfig,
};
use blog_writer::{
    GenerationConfig, ImageConfig, ImageResolver, SeoConfig, SeoMetadataBuilder, TextGeneration,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<BlogAssembler>,
    pub automation: Arc<BlogAutomation>,
    pub storage: Arc<BlogStorage>,
    pub manager: Arc<RwLock<AutomationManager>>,
    /// Shared secret for the generation endpoints; unset means they always refuse
    pub automation_secret: Option<Arc<str>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,blog_api=debug")),
        )
        .init();

    info!("Starting Broker Blog API");

    // Providers are resolved once here and injected everywhere else
    let search = SearchProvider::from_config(&SearchConfig::from_env());
    info!("Search backend: {}", search.backend_name());

    let generation = TextGeneration::from_config(&GenerationConfig::from_env())
        .context("No text generation provider available")?;
    info!("Text generation provider: {}", generation.provider_name());

    let images = ImageResolver::from_config(&ImageConfig::from_env());

    let seo = SeoConfig::from_env();
    info!("SEO site name: {}", seo.site_name);

    let assembler = Arc::new(
        BlogAssembler::new(
            search,
            Arc::new(generation),
            images,
            PipelineConfig::default(),
        )
        .with_seo(SeoMetadataBuilder::new(seo)),
    );

    // Initialize blog storage (SQLite database)
    let db_path = std::env::var("BLOG_DB_PATH").unwrap_or_else(|_| "data/blog.db".to_string());
    info!("Initializing blog storage at: {}", db_path);
    let storage = Arc::new(
        BlogStorage::new(&db_path).with_context(|| format!("Failed to open {}", db_path))?,
    );

    if let Ok(path) = std::env::var("BLOG_BROKERS_PATH") {
        match seed_brokers(&storage, &path) {
            Ok(count) => info!("Seeded {} brokers from {}", count, path),
            Err(e) => warn!("Failed to seed brokers from {}: {:#}", path, e),
        }
    }

    let automation = Arc::new(BlogAutomation::new(assembler.clone(), storage.clone()));

    let mut schedule = ScheduleConfig::from_env();
    if let Err(errors) = validate(&schedule) {
        warn!(
            "Invalid schedule configuration ({}); using defaults",
            errors.join("; ")
        );
        schedule = ScheduleConfig::default();
    }
    let manager = Arc::new(RwLock::new(AutomationManager::new(schedule, Utc::now())));

    // Start the publishing scheduler in background
    let poll_secs = std::env::var("BLOG_SCHEDULE_POLL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&s| s > 0)
        .unwrap_or(60);
    let scheduler = Arc::new(
        BlogScheduler::new(automation.clone(), manager.clone())
            .with_poll_interval(Duration::from_secs(poll_secs)),
    );
    tokio::spawn(async move {
        scheduler.start().await;
    });

    let automation_secret: Option<Arc<str>> = std::env::var("BLOG_AUTOMATION_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .map(Arc::from);
    if automation_secret.is_none() {
        warn!("BLOG_AUTOMATION_SECRET not set - generation endpoints will reject every request");
    }

    // Create app state
    let state = AppState {
        assembler,
        automation,
        storage,
        manager,
        automation_secret,
    };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(routes::SECRET_HEADER),
        ]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load a JSON array of brokers into storage
fn seed_brokers(storage: &BlogStorage, path: &str) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)?;
    let brokers: Vec<BrokerData> = serde_json::from_str(&raw)?;
    for broker in &brokers {
        storage.upsert_broker(broker)?;
    }
    Ok(brokers.len())
}
