use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use tracing::instrument;

use blog_core::{BlogError, BlogResult};

use crate::generation::{non_empty_completion, GenerationOptions, TextGenerator};

#[derive(Debug, Clone)]
pub struct OpenAIGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> BlogResult<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| BlogError::internal(e.to_string()))?
                .into()])
            .temperature(options.temperature)
            .max_tokens(options.max_tokens)
            .build()
            .map_err(|e| BlogError::internal(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| BlogError::api(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        non_empty_completion("OpenAI", content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_model() {
        let generator = OpenAIGenerator::new("sk-test", "gpt-4").with_model("gpt-4o-mini");
        assert_eq!(generator.model, "gpt-4o-mini");
        assert_eq!(generator.name(), "openai");
    }

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY and network access"]
    async fn test_live_completion() {
        let key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY set");
        let generator = OpenAIGenerator::new(&key, "gpt-4o-mini");
        let text = generator
            .generate("Reply with the single word: pong", &GenerationOptions::with_max_tokens(5))
            .await
            .expect("completion");
        assert!(!text.is_empty());
    }
}
