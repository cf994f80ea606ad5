//! Text-generation seam and the ranked provider strategy

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use blog_core::{BlogError, BlogResult};

use crate::anthropic::AnthropicGenerator;
use crate::context7::Context7Generator;
use crate::openai::OpenAIGenerator;
use crate::template::TemplateGenerator;

/// Length and sampling knobs for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl GenerationOptions {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            ..Self::default()
        }
    }
}

/// Prompt-in, text-out provider
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> BlogResult<String>;
}

/// Credentials and models for every text provider
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub context7_api_key: Option<String>,
    pub context7_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    /// Serve canned prose when the chosen provider fails or none is configured
    pub template_fallback: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            context7_api_key: None,
            context7_model: "gpt-4".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-3-sonnet-20240229".to_string(),
            template_fallback: true,
        }
    }
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            context7_api_key: non_empty_var("CONTEXT7_API_KEY"),
            context7_model: non_empty_var("CONTEXT7_MODEL").unwrap_or(defaults.context7_model),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_model: non_empty_var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            anthropic_model: non_empty_var("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            template_fallback: non_empty_var("BLOG_TEMPLATE_FALLBACK")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off"))
                .unwrap_or(true),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// The provider the pipeline talks to, resolved once from configuration
///
/// Context7 ranks first, then OpenAI, then Anthropic. With `template_fallback`
/// on, a failing provider (or no provider at all) is answered by
/// [`TemplateGenerator`] so writers only see an error when it is off.
#[derive(Clone)]
pub struct TextGeneration {
    primary: Option<Arc<dyn TextGenerator>>,
    template: Option<TemplateGenerator>,
}

impl TextGeneration {
    pub fn from_config(config: &GenerationConfig) -> BlogResult<Self> {
        let primary: Option<Arc<dyn TextGenerator>> = if let Some(key) = &config.context7_api_key
        {
            Some(Arc::new(Context7Generator::new(
                key.clone(),
                config.context7_model.clone(),
            )))
        } else if let Some(key) = &config.openai_api_key {
            Some(Arc::new(OpenAIGenerator::new(key, &config.openai_model)))
        } else if let Some(key) = &config.anthropic_api_key {
            Some(Arc::new(AnthropicGenerator::new(
                key.clone(),
                config.anthropic_model.clone(),
            )))
        } else {
            None
        };

        let template = config.template_fallback.then(TemplateGenerator::new);

        match &primary {
            Some(p) => info!("Text generation resolved to {}", p.name()),
            None if template.is_some() => {
                warn!("No text generation provider configured, using canned templates")
            }
            None => {
                return Err(BlogError::config(
                    "No text generation provider configured and template fallback is disabled",
                ))
            }
        }

        Ok(Self { primary, template })
    }

    /// Wrap one provider, with or without the template fallback
    pub fn with_generator(generator: Arc<dyn TextGenerator>, template_fallback: bool) -> Self {
        Self {
            primary: Some(generator),
            template: template_fallback.then(TemplateGenerator::new),
        }
    }

    /// Name of the provider that is tried first
    pub fn provider_name(&self) -> &'static str {
        match (&self.primary, &self.template) {
            (Some(p), _) => p.name(),
            (None, Some(t)) => t.name(),
            (None, None) => "none",
        }
    }
}

#[async_trait]
impl TextGenerator for TextGeneration {
    fn name(&self) -> &'static str {
        self.provider_name()
    }

    #[instrument(skip(self, prompt), fields(provider = self.provider_name()))]
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> BlogResult<String> {
        let Some(primary) = &self.primary else {
            return match &self.template {
                Some(template) => template.generate(prompt, options).await,
                None => Err(BlogError::config("No text generation provider configured")),
            };
        };

        match primary.generate(prompt, options).await {
            Ok(text) => Ok(text),
            Err(e) => match &self.template {
                Some(template) => {
                    warn!("{} generation failed, using template: {}", primary.name(), e);
                    template.generate(prompt, options).await
                }
                None => Err(e),
            },
        }
    }
}

/// Reject blank completions so callers fall back instead of printing nothing
pub(crate) fn non_empty_completion(provider: &str, text: Option<String>) -> BlogResult<String> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(BlogError::parse(format!("{} returned an empty completion", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> BlogResult<String> {
            Err(BlogError::api("provider down"))
        }
    }

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn generate(&self, prompt: &str, options: &GenerationOptions) -> BlogResult<String> {
            Ok(format!("{}:{}", options.max_tokens, prompt))
        }
    }

    #[test]
    fn test_default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.max_tokens, 500);
        assert!((options.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(GenerationOptions::with_max_tokens(150).max_tokens, 150);
    }

    #[tokio::test]
    async fn test_primary_success_is_returned() {
        let generation = TextGeneration::with_generator(Arc::new(Echo), true);
        let text = generation
            .generate("hello", &GenerationOptions::with_max_tokens(42))
            .await
            .expect("echo succeeds");
        assert_eq!(text, "42:hello");
        assert_eq!(generation.provider_name(), "echo");
    }

    #[tokio::test]
    async fn test_failure_uses_template_when_enabled() {
        let generation = TextGeneration::with_generator(Arc::new(Failing), true);
        let text = generation
            .generate("Write a conclusion for a Acme FX review", &GenerationOptions::default())
            .await
            .expect("template answers");
        assert!(text.contains("Acme FX"));
    }

    #[tokio::test]
    async fn test_failure_propagates_without_template() {
        let generation = TextGeneration::with_generator(Arc::new(Failing), false);
        let result = generation.generate("anything", &GenerationOptions::default()).await;
        assert!(matches!(result, Err(BlogError::Api(_))));
    }

    #[test]
    fn test_from_config_requires_some_provider() {
        let config = GenerationConfig {
            template_fallback: false,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            TextGeneration::from_config(&config),
            Err(BlogError::Config(_))
        ));

        let generation =
            TextGeneration::from_config(&GenerationConfig::default()).expect("template only");
        assert_eq!(generation.provider_name(), "template");
    }

    #[test]
    fn test_context7_ranks_first() {
        let config = GenerationConfig {
            context7_api_key: Some("c7".to_string()),
            openai_api_key: Some("sk".to_string()),
            ..GenerationConfig::default()
        };
        let generation = TextGeneration::from_config(&config).expect("configured");
        assert_eq!(generation.provider_name(), "context7");
    }

    #[test]
    fn test_empty_completion_is_parse_error() {
        assert!(matches!(
            non_empty_completion("openai", Some("  ".to_string())),
            Err(BlogError::Parse(_))
        ));
        assert!(non_empty_completion("openai", None).is_err());
        assert_eq!(
            non_empty_completion("openai", Some("ok".to_string())).ok(),
            Some("ok".to_string())
        );
    }
}
