//! Introduction, section, FAQ and conclusion writers
//!
//! One generation call per unit of work, issued in order. Each call has its
//! own deterministic fallback so a document can mix generated and canned text.

use std::sync::Arc;

use tracing::instrument;

use blog_core::{with_fallback, BlogError, BlogResult, BrokerData, PlannedSection};

use crate::generation::{GenerationOptions, TextGenerator};
use crate::seo::generate_anchor;

const INTRODUCTION_TOKENS: u32 = 300;
const SECTION_TOKENS: u32 = 600;
const FAQ_ANSWER_TOKENS: u32 = 150;
const CONCLUSION_TOKENS: u32 = 300;

pub struct ArticleWriter {
    generator: Arc<dyn TextGenerator>,
}

impl ArticleWriter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> BlogResult<String> {
        self.generator
            .generate(prompt, &GenerationOptions::with_max_tokens(max_tokens))
            .await
    }

    /// Opening paragraph, followed by a blank line
    #[instrument(skip(self, broker))]
    pub async fn introduction(&self, title: &str, broker: &BrokerData) -> String {
        let prompt = format!(
            r#"Write an engaging introduction (200-250 words) for a blog post titled "{title}".

Include:
- Hook that grabs attention
- Brief overview of {name}
- What readers will learn
- Primary keyword: "{keyword} review"

Write in a professional but accessible tone for forex traders."#,
            name = broker.name,
            keyword = broker.name.to_lowercase(),
        );

        with_fallback(
            "Introduction",
            async {
                let text = self.generate(&prompt, INTRODUCTION_TOKENS).await?;
                Ok::<_, BlogError>(format!("{}\n\n", text))
            },
            || introduction_fallback(broker),
        )
        .await
    }

    /// `## heading` followed by prose, or the key points as a bullet list
    #[instrument(skip_all, fields(heading = %section.heading))]
    pub async fn section(&self, section: &PlannedSection, broker: &BrokerData) -> String {
        let prompt = format!(
            r#"Write a detailed section for a {name} review blog post.

Section: {heading}
Key points to cover: {points}
Subheadings: {subheadings}

Requirements:
- 400-500 words
- Include relevant subheadings (H3)
- Mention specific features and benefits
- Include data and facts where possible
- Professional tone for forex traders
- Include internal linking opportunities

Write in markdown format."#,
            name = broker.name,
            heading = section.heading,
            points = section.key_points.join(", "),
            subheadings = section.subheadings.join(", "),
        );

        with_fallback(
            "Section generation",
            async {
                let text = self.generate(&prompt, SECTION_TOKENS).await?;
                Ok::<_, BlogError>(format!("## {}\n\n{}\n\n", section.heading, text))
            },
            || section_fallback(section),
        )
        .await
    }

    /// FAQ block with one `###` question and answer per entry, in input order
    #[instrument(skip_all, fields(questions = questions.len()))]
    pub async fn faq(&self, questions: &[String], broker: &BrokerData) -> String {
        let mut faq = String::from("## Frequently Asked Questions\n\n");

        for question in questions {
            let prompt = format!(
                r#"Answer this question about {name} in 2-3 sentences:
"{question}"

Provide a helpful, accurate answer based on typical broker features. Be specific but concise."#,
                name = broker.name,
            );

            let answer = with_fallback(
                "FAQ answer",
                self.generate(&prompt, FAQ_ANSWER_TOKENS),
                || faq_fallback_answer(broker),
            )
            .await;
            faq.push_str(&format!("### {}\n\n{}\n\n", question, answer));
        }

        faq
    }

    /// `## Conclusion` block summarising the key takeaways
    #[instrument(skip_all)]
    pub async fn conclusion(&self, broker: &BrokerData, key_takeaways: &[String]) -> String {
        let takeaways = key_takeaways
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            r#"Write a compelling conclusion (200-250 words) for a {name} review.

Key takeaways to summarize:
{takeaways}

Include:
- Summary of main points
- Final recommendation
- Call to action to visit broker or read more reviews
- Encourage readers to do their own research

Professional tone for forex traders."#,
            name = broker.name,
        );

        with_fallback(
            "Conclusion",
            async {
                let text = self.generate(&prompt, CONCLUSION_TOKENS).await?;
                Ok::<_, BlogError>(format!("## Conclusion\n\n{}\n\n", text))
            },
            || conclusion_fallback(broker),
        )
        .await
    }
}

pub fn introduction_fallback(broker: &BrokerData) -> String {
    format!(
        "In this comprehensive review, we'll examine {name} in detail, covering everything from \
         trading conditions to platform features. Whether you're a beginner or experienced trader, \
         this analysis will help you determine if {name} is the right broker for your trading needs.\n\n",
        name = broker.name
    )
}

pub fn section_fallback(section: &PlannedSection) -> String {
    let points = section
        .key_points
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n");
    format!("## {}\n\n{}\n\n", section.heading, points)
}

pub fn faq_fallback_answer(broker: &BrokerData) -> String {
    format!(
        "Please check {}'s official website for the most current information about this topic.",
        broker.name
    )
}

pub fn conclusion_fallback(broker: &BrokerData) -> String {
    format!(
        "## Conclusion\n\n{} offers a comprehensive trading experience with competitive features for \
         forex traders. Based on our analysis, it provides good value for both beginners and \
         experienced traders. We recommend visiting their official website to learn more and consider \
         opening a demo account to test their platform.\n\n**Remember**: Always conduct your own \
         research and consider your risk tolerance before choosing a forex broker.\n\n",
        broker.name
    )
}

/// Numbered links to every section, then the FAQ and the conclusion
pub fn table_of_contents(sections: &[PlannedSection]) -> String {
    let mut toc = String::from("## Table of Contents\n\n");
    for (i, section) in sections.iter().enumerate() {
        toc.push_str(&format!(
            "{}. [{}](#{})\n",
            i + 1,
            section.heading,
            generate_anchor(&section.heading)
        ));
    }
    toc.push_str(&format!(
        "{}. [Frequently Asked Questions](#frequently-asked-questions)\n",
        sections.len() + 1
    ));
    toc.push_str(&format!("{}. [Conclusion](#conclusion)\n\n", sections.len() + 2));
    toc
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> BlogResult<String> {
            Err(BlogError::api("unavailable"))
        }
    }

    /// Fails every other call, starting with a success
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn generate(&self, _prompt: &str, options: &GenerationOptions) -> BlogResult<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 0 {
                Ok(format!("generated answer ({} tokens)", options.max_tokens))
            } else {
                Err(BlogError::network("timeout"))
            }
        }
    }

    fn broker() -> BrokerData {
        BrokerData::new("1", "Acme FX")
    }

    fn section() -> PlannedSection {
        PlannedSection {
            heading: "Trading Conditions and Fees".to_string(),
            subheadings: vec!["Spreads".to_string()],
            key_points: vec!["Competitive spreads".to_string(), "Fee structure".to_string()],
        }
    }

    #[tokio::test]
    async fn test_fallbacks_when_generation_fails() {
        let writer = ArticleWriter::new(Arc::new(Failing));
        let broker = broker();

        let intro = writer.introduction("Acme FX Review", &broker).await;
        assert_eq!(intro, introduction_fallback(&broker));

        let section = writer.section(&section(), &broker).await;
        assert_eq!(
            section,
            "## Trading Conditions and Fees\n\n- Competitive spreads\n- Fee structure\n\n"
        );

        let conclusion = writer.conclusion(&broker, &["Regulated".to_string()]).await;
        assert!(conclusion.starts_with("## Conclusion\n\nAcme FX offers a comprehensive trading experience"));
    }

    #[tokio::test]
    async fn test_generated_section_keeps_heading() {
        let writer = ArticleWriter::new(Arc::new(Flaky {
            calls: AtomicUsize::new(0),
        }));
        let text = writer.section(&section(), &broker()).await;
        assert_eq!(
            text,
            "## Trading Conditions and Fees\n\ngenerated answer (600 tokens)\n\n"
        );
    }

    #[tokio::test]
    async fn test_faq_mixes_generated_and_fallback_answers_in_order() {
        let writer = ArticleWriter::new(Arc::new(Flaky {
            calls: AtomicUsize::new(0),
        }));
        let questions = vec!["Is Acme FX safe?".to_string(), "What are the fees?".to_string()];
        let faq = writer.faq(&questions, &broker()).await;

        assert!(faq.starts_with("## Frequently Asked Questions\n\n"));
        let first = faq.find("### Is Acme FX safe?\n\ngenerated answer (150 tokens)");
        let second = faq.find(
            "### What are the fees?\n\nPlease check Acme FX's official website for the most current information about this topic.",
        );
        assert!(first.is_some());
        assert!(second.is_some());
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_faq_with_no_questions_is_header_only() {
        let writer = ArticleWriter::new(Arc::new(Failing));
        assert_eq!(
            writer.faq(&[], &broker()).await,
            "## Frequently Asked Questions\n\n"
        );
    }

    #[test]
    fn test_table_of_contents() {
        let sections = vec![
            section(),
            PlannedSection {
                heading: "Acme FX Pros and Cons".to_string(),
                subheadings: vec![],
                key_points: vec![],
            },
        ];
        assert_eq!(
            table_of_contents(&sections),
            "## Table of Contents\n\n\
             1. [Trading Conditions and Fees](#trading-conditions-and-fees)\n\
             2. [Acme FX Pros and Cons](#acme-fx-pros-and-cons)\n\
             3. [Frequently Asked Questions](#frequently-asked-questions)\n\
             4. [Conclusion](#conclusion)\n\n"
        );
    }
}
