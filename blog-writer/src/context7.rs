//! Context7 text-generation API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use blog_core::{BlogError, BlogResult};

use crate::generation::{non_empty_completion, GenerationOptions, TextGenerator};

const CONTEXT7_API_BASE: &str = "https://api.context7.ai/v1";

#[derive(Debug, Clone)]
pub struct Context7Generator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    model: &'a str,
}

/// Either field may carry the completion
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl Context7Generator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: CONTEXT7_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextGenerator for Context7Generator {
    fn name(&self) -> &'static str {
        "context7"
    }

    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> BlogResult<String> {
        let url = format!("{}/generate", self.base_url);
        let body = GenerateRequest {
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            model: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BlogError::network(format!("Context7 request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlogError::api(format!("Context7 API error ({}): {}", status, body)));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BlogError::parse(format!("Failed to parse Context7 response: {}", e)))?;

        debug!("Context7 completion received");
        non_empty_completion("Context7", data.content.or(data.text))
    }
}
