//! API route definitions

mod automation;
mod blog;
mod content_types;
mod health;

use axum::http::HeaderMap;
use axum::Router;
use serde::Serialize;

use crate::AppState;

/// Header carrying the automation secret
pub const SECRET_HEADER: &str = "x-secret-token";

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(blog::routes())
        .merge(content_types::routes())
        .merge(automation::routes())
}

/// Health routes live outside `/api`
pub fn health_routes() -> Router<AppState> {
    health::routes()
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Whether `headers` carry the configured secret
fn authorized(secret: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(secret) = secret else {
        return false;
    };
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|token| token == secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SECRET_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_authorized() {
        assert!(authorized(Some("s3cret"), &headers("s3cret")));
        assert!(!authorized(Some("s3cret"), &headers("wrong")));
        assert!(!authorized(Some("s3cret"), &HeaderMap::new()));
    }

    #[test]
    fn test_unset_secret_refuses_everything() {
        assert!(!authorized(None, &headers("")));
        assert!(!authorized(None, &HeaderMap::new()));
    }
}
