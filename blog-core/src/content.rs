//! Content templates, planned structures and the generated article record

use serde::{Deserialize, Serialize};

use crate::broker::BrokerData;

/// One flavour of article (review, guide, analysis) with its outline and target length
///
/// The catalog is static, so every field borrows from `'static` data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentType {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    /// Relative probability mass used by the weighted selector
    pub weight: u32,
    pub keywords: &'static [&'static str],
    pub search_terms: &'static [&'static str],
    pub target_audience: &'static str,
    pub structure: ContentStructure,
}

/// Section outline and length targets for a content type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentStructure {
    pub sections: &'static [ContentSection],
    pub estimated_word_count: u32,
    pub faq_count: u32,
    pub key_takeaways_count: u32,
}

impl ContentStructure {
    /// Sum of the per-section word targets (advisory, compared against `estimated_word_count`)
    pub fn section_word_total(&self) -> u32 {
        self.sections.iter().map(|s| s.estimated_words).sum()
    }
}

/// Template for one section of an article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentSection {
    pub heading: &'static str,
    pub subheadings: &'static [&'static str],
    pub key_points: &'static [&'static str],
    pub estimated_words: u32,
}

/// A concrete section produced by structure planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSection {
    pub heading: String,
    #[serde(default)]
    pub subheadings: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Titled outline of one article, consumed by every writer downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStructure {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<PlannedSection>,
    #[serde(default)]
    pub faq_questions: Vec<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub target_word_count: Option<u32>,
}

impl BlogStructure {
    /// Whether every list the writers rely on is populated
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.sections.is_empty()
            && self.sections.iter().all(|s| !s.heading.trim().is_empty())
            && !self.faq_questions.is_empty()
            && !self.key_takeaways.is_empty()
            && !self.tags.is_empty()
    }
}

/// Input to a single content-generation run
#[derive(Debug, Clone, Default)]
pub struct BlogContentRequest {
    pub broker: Option<BrokerData>,
    /// Explicit content type; drawn from the catalog when absent
    pub content_type: Option<&'static ContentType>,
    pub search_query: String,
    pub target_keywords: Vec<String>,
    /// Restricts the weighted draw to one category when no content type is given
    pub category: Option<String>,
}

/// The finished article handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBlogContent {
    pub title: String,
    pub slug: String,
    /// Full markdown document
    pub content: String,
    pub excerpt: String,
    pub seo_title: String,
    pub seo_description: String,
    /// Minutes at 225 words per minute, rounded up
    pub reading_time: u32,
    pub tags: Vec<String>,
    pub featured_image: String,
    pub key_takeaways: Vec<String>,
}
