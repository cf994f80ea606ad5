//! Canned prose served when no live provider can answer

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use blog_core::BlogResult;

use crate::generation::{GenerationOptions, TextGenerator};

const DEFAULT_SUBJECT: &str = "this broker";

fn subject_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+(?:review|broker|trading)")
            .expect("subject pattern is valid")
    })
}

/// Template generator keyed on prompt wording; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Name preceding "review", "broker" or "trading" in the prompt
    fn subject(prompt: &str) -> &str {
        subject_pattern()
            .captures(prompt)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_SUBJECT)
    }

    /// Pick the paragraph for the kind of text the prompt asks for
    pub fn render(prompt: &str) -> String {
        let name = Self::subject(prompt);
        let lower = prompt.to_lowercase();

        if lower.contains("introduction") {
            format!(
                "{name} has established itself as a notable player in the forex trading industry. \
                 With competitive spreads, multiple trading platforms, and comprehensive educational \
                 resources, {name} caters to traders of all experience levels. In this detailed review, \
                 we'll examine the key features, trading conditions, and overall value proposition \
                 that {name} offers to forex traders worldwide."
            )
        } else if lower.contains("conclusion") {
            format!(
                "{name} presents a solid option for forex traders seeking a reliable and feature-rich \
                 trading environment. With its competitive pricing, robust platform offerings, and \
                 commitment to trader education, {name} has positioned itself well in the competitive \
                 forex broker landscape. As with any trading decision, we recommend conducting thorough \
                 research and considering your individual trading needs before making a final choice."
            )
        } else if lower.contains("faq") || prompt.contains('?') {
            format!(
                "{name} provides comprehensive support and transparent information to help traders \
                 make informed decisions. For the most current and detailed information, we recommend \
                 visiting their official website or contacting their customer support team directly."
            )
        } else {
            format!(
                "{name} offers a comprehensive trading experience with features designed to meet the \
                 needs of modern forex traders. The platform combines advanced technology with \
                 user-friendly interfaces, making it accessible to both beginners and experienced \
                 traders. Key features include competitive spreads, multiple account types, and robust \
                 customer support to ensure a smooth trading experience."
            )
        }
    }
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> BlogResult<String> {
        Ok(Self::render(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_extraction() {
        assert_eq!(
            TemplateGenerator::subject("Write a conclusion for a Acme FX review."),
            "Acme FX"
        );
        assert_eq!(TemplateGenerator::subject("no match here"), DEFAULT_SUBJECT);
    }

    #[test]
    fn test_prompt_keyword_routing() {
        let intro = TemplateGenerator::render("Introduction: Pepperstone review");
        assert!(intro.starts_with("Pepperstone has established itself"));

        let conclusion = TemplateGenerator::render("Conclusion: Pepperstone review");
        assert!(conclusion.starts_with("Pepperstone presents a solid option"));

        let faq = TemplateGenerator::render("Is it regulated?");
        assert!(faq.starts_with("this broker provides comprehensive support"));

        let section = TemplateGenerator::render("Section: Fees");
        assert!(section.starts_with("this broker offers a comprehensive trading experience"));
    }

    #[tokio::test]
    async fn test_generate_never_fails() {
        let text = TemplateGenerator::new()
            .generate("", &GenerationOptions::default())
            .await
            .expect("template always answers");
        assert!(!text.is_empty());
    }
}
