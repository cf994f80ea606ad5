//! Structure planning: content template plus research into a concrete outline

use std::sync::Arc;

use tracing::{debug, instrument};

use blog_core::{
    with_fallback, BlogError, BlogResult, BlogStructure, BrokerData, ContentType, PlannedSection,
};

use crate::generation::{GenerationOptions, TextGenerator};

/// Questions and trends sampled into the planning prompt
const PROMPT_QUESTIONS: usize = 8;
const PROMPT_TRENDS: usize = 5;

const FALLBACK_NAME: &str = "Trading Platform";
const FALLBACK_WORD_COUNT: u32 = 2000;

pub struct StructurePlanner {
    generator: Arc<dyn TextGenerator>,
}

impl StructurePlanner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Outline for one article; never fails
    ///
    /// A provider error, a reply without JSON, or JSON missing any list the
    /// writers rely on all yield [`fallback_structure`].
    #[instrument(skip_all, fields(content_type = content_type.id))]
    pub async fn plan(
        &self,
        content_type: &ContentType,
        broker: Option<&BrokerData>,
        questions: &[String],
        keywords: &[String],
        trends: &[String],
    ) -> BlogStructure {
        let prompt = structure_prompt(content_type, broker, questions, keywords, trends);
        with_fallback(
            "Blog structure generation",
            self.request_structure(&prompt),
            || fallback_structure(broker),
        )
        .await
    }

    async fn request_structure(&self, prompt: &str) -> BlogResult<BlogStructure> {
        let options = GenerationOptions {
            max_tokens: 1000,
            temperature: 0.7,
        };
        let reply = self.generator.generate(prompt, &options).await?;
        let structure = parse_structure(&reply)?;
        debug!(
            "Planned '{}' with {} sections",
            structure.title,
            structure.sections.len()
        );
        Ok(structure)
    }
}

/// Parse a model reply into a complete structure
pub fn parse_structure(reply: &str) -> BlogResult<BlogStructure> {
    let json = extract_json(reply)?;
    let structure: BlogStructure = serde_json::from_str(json)
        .map_err(|e| BlogError::parse(format!("Failed to parse blog structure: {}", e)))?;

    if !structure.is_complete() {
        return Err(BlogError::parse("Blog structure is missing required fields"));
    }
    Ok(structure)
}

fn extract_json(content: &str) -> BlogResult<&str> {
    // Fenced block first
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim());
        }
    }

    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            return Ok(&content[start..=end]);
        }
    }

    Err(BlogError::parse("No JSON found in response"))
}

fn structure_prompt(
    content_type: &ContentType,
    broker: Option<&BrokerData>,
    questions: &[String],
    keywords: &[String],
    trends: &[String],
) -> String {
    let structure = &content_type.structure;
    let sample = |items: &[String], n: usize| {
        items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
    };

    let broker_focus = broker
        .map(|broker| {
            format!(
                "Broker Focus:\n- Broker: {}\n- Rating: {}/5\n- Regulation: {}\n- Min Deposit: {}\n\n",
                broker.name,
                broker
                    .rating
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                broker.regulation.as_deref().unwrap_or("Check official website"),
                broker
                    .min_deposit
                    .map(|d| format!("${}", d))
                    .unwrap_or_else(|| "Varies".to_string()),
            )
        })
        .unwrap_or_default();

    let template: String = structure
        .sections
        .iter()
        .map(|section| {
            format!(
                "- {}\n  Subheadings: {}\n  Key Points: {}\n  Target Words: {}\n",
                section.heading,
                section.subheadings.join(", "),
                section.key_points.join(", "),
                section.estimated_words,
            )
        })
        .collect();

    format!(
        r#"Create a comprehensive blog post structure for a financial website.

Content Type: {name}
Category: {category}
Target Audience: {audience}

{broker_focus}Research Context:
- Current trending questions: {questions}
- Market trends: {trends}
- Primary keywords: {keywords}

Content Structure Template:
{template}
Requirements:
1. Create an engaging, SEO-optimized title (50-60 characters)
2. Include primary keyword: "{primary_keyword}"
3. Use the provided content structure as a guide
4. Target {words}+ words total
5. Include {takeaways} key takeaways
6. Create {faqs} FAQ questions
7. Suggest 8-10 relevant tags for {category}

Focus on providing value to {audience}.

Return as JSON with this structure:
{{
  "title": "Blog post title",
  "sections": [
    {{
      "heading": "Section heading",
      "subheadings": ["Sub 1", "Sub 2"],
      "keyPoints": ["Point 1", "Point 2", "Point 3"]
    }}
  ],
  "faqQuestions": ["Question 1?", "Question 2?"],
  "keyTakeaways": ["Takeaway 1", "Takeaway 2"],
  "tags": ["tag1", "tag2"],
  "targetWordCount": {words}
}}
"#,
        name = content_type.name,
        category = content_type.category,
        audience = content_type.target_audience,
        questions = sample(questions, PROMPT_QUESTIONS),
        trends = sample(trends, PROMPT_TRENDS),
        keywords = keywords.join(", "),
        primary_keyword = keywords.first().map(String::as_str).unwrap_or_default(),
        words = structure.estimated_word_count,
        takeaways = structure.key_takeaways_count,
        faqs = structure.faq_count,
    )
}

fn planned(heading: String, subheadings: [&str; 3], key_points: [&str; 3]) -> PlannedSection {
    PlannedSection {
        heading,
        subheadings: subheadings.iter().map(|s| s.to_string()).collect(),
        key_points: key_points.iter().map(|s| s.to_string()).collect(),
    }
}

/// Review-style outline used whenever planning fails
pub fn fallback_structure(broker: Option<&BrokerData>) -> BlogStructure {
    let name = broker.map(|b| b.name.as_str()).unwrap_or(FALLBACK_NAME);
    let tag = match broker {
        Some(b) => b.tag(),
        None => FALLBACK_NAME.to_lowercase().replace(' ', "-"),
    };

    BlogStructure {
        title: format!("{} Review 2025: Complete Trading Platform Analysis", name),
        sections: vec![
            planned(
                format!("{} Overview and Key Features", name),
                ["Platform Overview", "Key Trading Features", "Account Types"],
                ["Regulation and safety", "Trading platforms", "Account options"],
            ),
            planned(
                "Trading Conditions and Fees".to_string(),
                ["Spreads and Commissions", "Deposit and Withdrawal", "Trading Costs"],
                ["Competitive spreads", "Fee structure", "Payment methods"],
            ),
            planned(
                "Platform and Tools Analysis".to_string(),
                ["Trading Platforms", "Research Tools", "Mobile Trading"],
                ["Platform features", "Analysis tools", "Mobile app"],
            ),
            planned(
                format!("{} Pros and Cons", name),
                ["Advantages", "Disadvantages", "Who Should Use"],
                ["Main benefits", "Potential drawbacks", "Target audience"],
            ),
        ],
        faq_questions: vec![
            format!("Is {} regulated and safe?", name),
            format!("What are {}'s trading fees?", name),
            format!("Does {} offer demo accounts?", name),
            format!("What trading platforms does {} provide?", name),
            format!("How does {} compare to other brokers?", name),
        ],
        key_takeaways: vec![
            format!("{} is a trading broker with competitive features", name),
            "Multiple trading platforms available for different trader types".to_string(),
            "Comprehensive fee structure with transparent pricing".to_string(),
            "Suitable for both beginner and experienced traders".to_string(),
            "Strong customer support and educational resources".to_string(),
        ],
        tags: [
            tag.as_str(),
            "forex-broker",
            "trading-platform",
            "broker-review",
            "forex-trading",
            "online-trading",
            "trading-analysis",
            "broker-comparison",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect(),
        target_word_count: Some(FALLBACK_WORD_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::catalog::{find_content_type, CONTENT_TYPES};

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn generate(&self, _prompt: &str, options: &GenerationOptions) -> BlogResult<String> {
            assert_eq!(options.max_tokens, 1000);
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> BlogResult<String> {
            Err(BlogError::network("connection refused"))
        }
    }

    const VALID_REPLY: &str = r#"Here you go:
```json
{
  "title": "Forex Trading Strategies That Work in 2025",
  "sections": [{"heading": "Scalping", "subheadings": ["Setup"], "keyPoints": ["Tight stops"]}],
  "faqQuestions": ["What is scalping?"],
  "keyTakeaways": ["Manage risk"],
  "tags": ["forex"],
  "targetWordCount": 2000
}
```"#;

    fn keywords() -> Vec<String> {
        vec!["forex trading".to_string()]
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json("```json\n{\"a\":1}\n```").ok(), Some("{\"a\":1}"));
        assert_eq!(extract_json("noise {\"a\":1} trailing").ok(), Some("{\"a\":1}"));
        assert!(extract_json("no json at all").is_err());
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn test_fallback_structure_for_broker() {
        let broker = BrokerData::new("1", "Acme FX");
        let structure = fallback_structure(Some(&broker));

        assert_eq!(structure.title, "Acme FX Review 2025: Complete Trading Platform Analysis");
        assert_eq!(structure.sections.len(), 4);
        assert_eq!(structure.sections[3].heading, "Acme FX Pros and Cons");
        assert_eq!(structure.faq_questions.len(), 5);
        assert_eq!(structure.key_takeaways.len(), 5);
        assert_eq!(structure.tags.len(), 8);
        assert_eq!(structure.tags[0], "acme-fx");
        assert!(structure.tags.contains(&"forex-broker".to_string()));
        assert!(structure.is_complete());
    }

    #[test]
    fn test_fallback_structure_without_broker() {
        let structure = fallback_structure(None);
        assert!(structure.title.starts_with("Trading Platform Review 2025"));
        assert_eq!(structure.tags[0], "trading-platform");
        assert!(structure.is_complete());
    }

    #[test]
    fn test_prompt_includes_broker_and_template() {
        let content_type = &CONTENT_TYPES[0];
        let mut broker = BrokerData::new("1", "Acme FX");
        broker.rating = Some(4.5);
        broker.min_deposit = Some(100.0);
        let questions: Vec<String> = (0..12).map(|i| format!("q{}?", i)).collect();

        let prompt = structure_prompt(content_type, Some(&broker), &questions, &keywords(), &[]);
        assert!(prompt.contains("- Broker: Acme FX"));
        assert!(prompt.contains("- Rating: 4.5/5"));
        assert!(prompt.contains("- Regulation: Check official website"));
        assert!(prompt.contains("- Min Deposit: $100"));
        assert!(prompt.contains("q7?"));
        assert!(!prompt.contains("q8?"));
        assert!(prompt.contains("Include primary keyword: \"forex trading\""));
        assert!(prompt.contains("Trading Conditions and Fees"));
        assert!(prompt.contains("\"targetWordCount\": 1800"));
    }

    #[test]
    fn test_prompt_without_broker() {
        let content_type = find_content_type("crypto-guide").expect("in catalog");
        let prompt = structure_prompt(content_type, None, &[], &[], &[]);
        assert!(!prompt.contains("Broker Focus"));
        assert!(prompt.contains("Include primary keyword: \"\""));
    }

    #[tokio::test]
    async fn test_plan_parses_fenced_reply() {
        let planner = StructurePlanner::new(Arc::new(Canned(VALID_REPLY)));
        let structure = planner
            .plan(&CONTENT_TYPES[1], None, &[], &keywords(), &[])
            .await;
        assert_eq!(structure.title, "Forex Trading Strategies That Work in 2025");
        assert_eq!(structure.sections[0].key_points, vec!["Tight stops"]);
    }

    #[tokio::test]
    async fn test_plan_falls_back_on_prose_reply() {
        let planner = StructurePlanner::new(Arc::new(Canned("I cannot produce JSON today.")));
        let broker = BrokerData::new("1", "Acme FX");
        let structure = planner
            .plan(&CONTENT_TYPES[0], Some(&broker), &[], &keywords(), &[])
            .await;
        assert_eq!(structure, fallback_structure(Some(&broker)));
    }

    #[tokio::test]
    async fn test_plan_falls_back_on_incomplete_json() {
        let planner = StructurePlanner::new(Arc::new(Canned(r#"{"title": "Only a title"}"#)));
        let structure = planner.plan(&CONTENT_TYPES[0], None, &[], &[], &[]).await;
        assert_eq!(structure, fallback_structure(None));
    }

    #[tokio::test]
    async fn test_plan_falls_back_on_provider_error() {
        let planner = StructurePlanner::new(Arc::new(Failing));
        let structure = planner.plan(&CONTENT_TYPES[0], None, &[], &[], &[]).await;
        assert!(structure.is_complete());
    }
}
