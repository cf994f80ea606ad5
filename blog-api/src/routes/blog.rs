//! Blog generation and post endpoints

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use blog_core::{BlogContentRequest, BrokerData, GeneratedBlogContent};
use blog_services::AutomationResult;
use blog_writer::{find_content_type, HeadProps, SeoMetadataBuilder};

use super::{authorized, ErrorResponse};
use crate::AppState;

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 100;

/// Create blog routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generate-blog-post", post(generate_blog_post))
        .route("/blog/generate", post(generate_preview))
        .route("/blog", get(list_posts))
        .route("/blog/{slug}", get(get_post))
}

#[derive(Debug, Serialize)]
struct AutomationResponse {
    success: bool,
    message: String,
    data: AutomationResult,
}

#[derive(Debug, Serialize)]
struct AutomationFailure {
    success: bool,
    error: String,
    details: String,
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}

/// POST /api/generate-blog-post - Run one automated generation and store the post
async fn generate_blog_post(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !authorized(state.automation_secret.as_deref(), &headers) {
        return unauthorized();
    }

    info!("Starting automated blog post generation");

    let outcome = state.automation.run_once().await;
    let now = chrono::Utc::now();
    let mut manager = state.manager.write().await;

    match outcome {
        Ok(result) => {
            manager.record_success(now);
            (
                StatusCode::OK,
                Json(AutomationResponse {
                    success: true,
                    message: "Blog post created successfully".to_string(),
                    data: result,
                }),
            )
                .into_response()
        }
        Err(e) => {
            manager.record_failure(now);
            error!("Blog generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AutomationFailure {
                    success: false,
                    error: "Failed to generate blog post".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Body of a one-off generation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub broker: Option<BrokerData>,
    /// Catalog id such as "broker-review"; drawn at random when absent
    pub content_type: Option<String>,
    pub search_query: String,
    #[serde(default)]
    pub target_keywords: Vec<String>,
    pub category: Option<String>,
}

/// Generated article with its page head and JSON-LD
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    post: GeneratedBlogContent,
    head: HeadProps,
    structured_data: Option<String>,
}

fn preview_response(
    seo: &SeoMetadataBuilder,
    post: GeneratedBlogContent,
    keywords: &[String],
) -> PreviewResponse {
    PreviewResponse {
        head: seo.head_props(&post, keywords),
        structured_data: seo.structured_data(&post, keywords),
        post,
    }
}

/// POST /api/blog/generate - Generate an article without storing it
async fn generate_preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<GenerateRequest>,
) -> impl IntoResponse {
    if !authorized(state.automation_secret.as_deref(), &headers) {
        return unauthorized();
    }

    let content_type = match body.content_type.as_deref() {
        Some(id) => match find_content_type(id) {
            Some(content_type) => Some(content_type),
            None => {
                warn!("Unknown content type requested: {}", id);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Unknown content type: {}", id),
                    }),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let keywords = body.target_keywords.clone();
    let post = state
        .assembler
        .generate(BlogContentRequest {
            broker: body.broker,
            content_type,
            search_query: body.search_query,
            target_keywords: body.target_keywords,
            category: body.category,
        })
        .await;

    let response = preview_response(state.assembler.seo(), post, &keywords);
    (StatusCode::OK, Json(response)).into_response()
}

/// Query parameters for listing posts
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<usize>,
}

/// GET /api/blog - Latest published posts
async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListPostsQuery>,
) -> impl IntoResponse {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    match state.storage.list_posts(limit) {
        Ok(posts) => (StatusCode::OK, Json(posts)).into_response(),
        Err(e) => {
            error!("Failed to list posts: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /api/blog/{slug} - One post by slug
async fn get_post(State(state): State<AppState>, Path(slug): Path<String>) -> impl IntoResponse {
    match state.storage.get_post_by_slug(&slug) {
        Ok(Some(post)) => (StatusCode::OK, Json(post)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Post not found: {}", slug),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load post {}: {}", slug, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
