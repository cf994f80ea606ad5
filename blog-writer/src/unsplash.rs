//! Unsplash photo API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use blog_core::{BlogError, BlogResult};

const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

/// Search term in, photo URL out
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn image_url(&self, query: &str) -> BlogResult<String>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashPhoto {
    pub id: String,
    pub urls: UnsplashUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashUrls {
    pub regular: String,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsplashSearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: Client,
    access_key: Option<String>,
    base_url: String,
}

impl UnsplashClient {
    /// A missing key is allowed here; every request then fails with a config error
    pub fn new(access_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            access_key,
            base_url: UNSPLASH_API_BASE.to_string(),
        }
    }

    fn key(&self) -> BlogResult<&str> {
        self.access_key
            .as_deref()
            .ok_or_else(|| BlogError::config("UNSPLASH_ACCESS_KEY is not set"))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> BlogResult<T> {
        let key = self.key()?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Client-ID {}", key))
            .query(params)
            .send()
            .await
            .map_err(|e| BlogError::network(format!("Unsplash request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlogError::api(format!("Unsplash API error ({}): {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| BlogError::parse(format!("Failed to parse Unsplash response: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> BlogResult<UnsplashSearchResponse> {
        self.get(
            "/search/photos",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn random_photos(&self, count: u32, query: Option<&str>) -> BlogResult<Vec<UnsplashPhoto>> {
        let mut params = vec![("count", count.to_string())];
        if let Some(query) = query {
            params.push(("query", query.to_string()));
        }
        self.get("/photos/random", &params).await
    }
}

#[async_trait]
impl ImageProvider for UnsplashClient {
    fn name(&self) -> &'static str {
        "unsplash"
    }

    /// First search hit, else a random photo for the same query
    async fn image_url(&self, query: &str) -> BlogResult<String> {
        let search = self.search_photos(query, 1, 1).await?;
        if let Some(photo) = search.results.into_iter().next() {
            return Ok(photo.urls.regular);
        }

        debug!("No Unsplash search hits for '{}', trying a random photo", query);
        let random = self.random_photos(1, Some(query)).await?;
        random
            .into_iter()
            .next()
            .map(|photo| photo.urls.regular)
            .ok_or_else(|| BlogError::not_found(format!("No images found for '{}'", query)))
    }
}
