//! Content catalog endpoint

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use blog_writer::{all_categories, CONTENT_TYPES};

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentTypeSummary {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    weight: u32,
    keywords: &'static [&'static str],
    target_audience: &'static str,
    estimated_word_count: u32,
    section_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    categories: Vec<&'static str>,
    total_weight: u32,
    content_types: Vec<ContentTypeSummary>,
}

/// GET /api/content-types
async fn list_content_types() -> impl IntoResponse {
    let content_types: Vec<ContentTypeSummary> = CONTENT_TYPES
        .iter()
        .map(|ct| ContentTypeSummary {
            id: ct.id,
            name: ct.name,
            category: ct.category,
            weight: ct.weight,
            keywords: ct.keywords,
            target_audience: ct.target_audience,
            estimated_word_count: ct.structure.estimated_word_count,
            section_count: ct.structure.sections.len(),
        })
        .collect();

    let response = CatalogResponse {
        categories: all_categories(),
        total_weight: content_types.iter().map(|ct| ct.weight).sum(),
        content_types,
    };

    (StatusCode::OK, Json(response))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/content-types", get(list_content_types))
}
