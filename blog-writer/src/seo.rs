//! Slugs, excerpts, SEO metadata and reading time
//!
//! All functions here are pure. [`SeoMetadataBuilder`] carries the site-wide
//! [`SeoConfig`] and turns a finished article into head props and JSON-LD.

use std::env;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use blog_core::GeneratedBlogContent;

pub const SLUG_MAX_CHARS: usize = 60;
pub const SEO_TITLE_MAX_CHARS: usize = 60;
pub const EXCERPT_CHARS: usize = 160;
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 225;

struct Patterns {
    non_word: Regex,
    whitespace: Regex,
    dashes: Regex,
    heading: Regex,
    bold: Regex,
    italic: Regex,
    link: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        non_word: Regex::new(r"[^a-zA-Z0-9_\s-]").expect("valid regex"),
        whitespace: Regex::new(r"\s+").expect("valid regex"),
        dashes: Regex::new(r"-+").expect("valid regex"),
        heading: Regex::new(r"#{1,6}\s").expect("valid regex"),
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"),
        italic: Regex::new(r"\*(.*?)\*").expect("valid regex"),
        link: Regex::new(r"\[(.*?)\]\(.*?\)").expect("valid regex"),
    })
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Heading anchor: lowercase, punctuation stripped, whitespace runs to `-`
pub fn generate_anchor(heading: &str) -> String {
    let p = patterns();
    let lower = heading.to_lowercase();
    let stripped = p.non_word.replace_all(&lower, "");
    p.whitespace.replace_all(&stripped, "-").into_owned()
}

/// URL slug for a title, at most 60 characters
pub fn generate_slug(title: &str) -> String {
    let anchor = generate_anchor(title);
    let collapsed = patterns().dashes.replace_all(&anchor, "-");
    truncate_chars(&collapsed, SLUG_MAX_CHARS).to_string()
}

/// [`generate_slug`] of `title`, or of `fallback` when the title has no ASCII
/// letters or digits to keep
pub fn generate_slug_or(title: &str, fallback: &str) -> String {
    let slug = generate_slug(title);
    if slug.chars().any(|c| c.is_ascii_alphanumeric()) {
        slug
    } else {
        generate_slug(fallback)
    }
}

/// Plain-text description: markdown stripped, first 160 characters plus "..."
pub fn generate_excerpt(content: &str) -> String {
    let p = patterns();
    let text = p.heading.replace_all(content, "");
    let text = p.bold.replace_all(&text, "$1");
    let text = p.italic.replace_all(&text, "$1");
    let text = p.link.replace_all(&text, "$1");
    // Stray markers that the paired patterns leave behind
    let plain: String = text.chars().filter(|c| !matches!(c, '#' | '*')).collect();

    format!("{}...", truncate_chars(&plain, EXCERPT_CHARS).trim())
}

/// Title cut to 60 characters, ending in "..." when cut
pub fn seo_title(title: &str) -> String {
    if title.chars().count() > SEO_TITLE_MAX_CHARS {
        format!("{}...", truncate_chars(title, SEO_TITLE_MAX_CHARS - 3))
    } else {
        title.to_string()
    }
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Minutes to read `words` words, rounded up
pub fn reading_time(words: usize, words_per_minute: u32) -> u32 {
    let words = u32::try_from(words).unwrap_or(u32::MAX);
    words.div_ceil(words_per_minute.max(1))
}

/// Search-engine metadata for one article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    /// Comma-joined target keywords for the keywords meta tag
    pub keywords: String,
}

/// Site-wide SEO settings, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SeoConfig {
    pub site_name: String,
    /// Absolute origin used for canonical and image URLs, without a trailing `/`
    pub site_url: Option<String>,
    pub locale: String,
    /// Used when a request names no target keywords
    pub default_keywords: Vec<String>,
    pub twitter_site: Option<String>,
    pub twitter_handle: Option<String>,
    pub structured_data: bool,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            site_name: "BrokerAnalysis".to_string(),
            site_url: None,
            locale: "en_US".to_string(),
            default_keywords: ["forex", "broker", "review"].map(String::from).to_vec(),
            twitter_site: None,
            twitter_handle: None,
            structured_data: true,
        }
    }
}

impl SeoConfig {
    pub fn from_env() -> Self {
        let var = |key: &str| env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let default_keywords = var("BLOG_SEO_KEYWORDS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.default_keywords);

        Self {
            site_name: var("BLOG_SITE_NAME").unwrap_or(defaults.site_name),
            site_url: var("BLOG_SITE_URL").map(|url| url.trim_end_matches('/').to_string()),
            locale: var("BLOG_SEO_LOCALE").unwrap_or(defaults.locale),
            default_keywords,
            twitter_site: var("BLOG_TWITTER_SITE"),
            twitter_handle: var("BLOG_TWITTER_HANDLE"),
            structured_data: var("BLOG_STRUCTURED_DATA")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
                .unwrap_or(defaults.structured_data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraphImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub images: Vec<OpenGraphImage>,
    #[serde(rename = "type")]
    pub kind: String,
    pub locale: String,
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    pub card_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub title: String,
    pub description: String,
    pub image: String,
}

/// Everything a page head needs for one article
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadProps {
    pub title: String,
    pub description: String,
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

#[derive(Debug, Clone, Default)]
pub struct SeoMetadataBuilder {
    config: SeoConfig,
}

impl SeoMetadataBuilder {
    pub fn new(config: SeoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SeoConfig {
        &self.config
    }

    fn keywords<'a>(&'a self, requested: &'a [String]) -> &'a [String] {
        if requested.is_empty() {
            &self.config.default_keywords
        } else {
            requested
        }
    }

    fn absolute(&self, path: &str) -> String {
        match &self.config.site_url {
            Some(origin) if path.starts_with('/') => format!("{}{}", origin, path),
            _ => path.to_string(),
        }
    }

    fn canonical(&self, slug: &str) -> Option<String> {
        self.config
            .site_url
            .as_ref()
            .map(|origin| format!("{}/blog/{}", origin, slug))
    }

    pub fn build(&self, title: &str, content: &str, keywords: &[String]) -> SeoMetadata {
        SeoMetadata {
            title: seo_title(title),
            description: generate_excerpt(content),
            keywords: self.keywords(keywords).join(", "),
        }
    }

    /// Head props for a finished article; `keywords` are the request's targets
    pub fn head_props(&self, post: &GeneratedBlogContent, keywords: &[String]) -> HeadProps {
        let keywords = self.keywords(keywords);
        let image = self.absolute(&post.featured_image);
        let canonical = self.canonical(&post.slug);

        HeadProps {
            title: post.seo_title.clone(),
            description: self.enhance_paragraph(&post.seo_description, keywords),
            keywords: keywords.join(", "),
            open_graph: OpenGraph {
                title: self.enhance_heading(&post.title, keywords),
                description: post.seo_description.clone(),
                images: vec![OpenGraphImage {
                    url: image.clone(),
                    alt: post.title.clone(),
                }],
                kind: "article".to_string(),
                locale: self.config.locale.clone(),
                site_name: self.config.site_name.clone(),
                url: canonical.clone(),
            },
            twitter: TwitterCard {
                card_type: "summary_large_image".to_string(),
                site: self.config.twitter_site.clone(),
                handle: self.config.twitter_handle.clone(),
                title: post.seo_title.clone(),
                description: post.seo_description.clone(),
                image,
            },
            canonical,
        }
    }

    /// Article JSON-LD wrapped in its script tag; `None` when disabled
    pub fn structured_data(&self, post: &GeneratedBlogContent, keywords: &[String]) -> Option<String> {
        if !self.config.structured_data {
            return None;
        }

        let mut article = json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": post.seo_title,
            "description": post.seo_description,
            "image": self.absolute(&post.featured_image),
            "keywords": self.keywords(keywords).join(", "),
            "articleSection": post.tags.first(),
            "publisher": { "@type": "Organization", "name": self.config.site_name },
        });
        if let Some(url) = self.canonical(&post.slug) {
            article["mainEntityOfPage"] = json!({ "@type": "WebPage", "@id": url });
        }

        Some(format!(
            r#"<script type="application/ld+json">{}</script>"#,
            json!([article])
        ))
    }

    /// Heading with the first of the top three keywords it lacks
    pub fn enhance_heading(&self, heading: &str, keywords: &[String]) -> String {
        self.keywords(keywords)
            .iter()
            .take(3)
            .find(|keyword| lacks_keyword(heading, keyword))
            .map(|keyword| inject_keyword(heading, keyword))
            .unwrap_or_else(|| heading.to_string())
    }

    /// Paragraph with the primary keyword worked in when missing
    pub fn enhance_paragraph(&self, paragraph: &str, keywords: &[String]) -> String {
        match self.keywords(keywords).first() {
            Some(primary) if lacks_keyword(paragraph, primary) => inject_keyword(paragraph, primary),
            _ => paragraph.to_string(),
        }
    }
}

/// True unless every word of `keyword` already appears in `text`
fn lacks_keyword(text: &str, keyword: &str) -> bool {
    let text = text.to_lowercase();
    let keyword = keyword.to_lowercase();
    !text.contains(&keyword) && !keyword.split(' ').all(|word| text.contains(word))
}

fn inject_keyword(text: &str, keyword: &str) -> String {
    if text.chars().count() < 100 {
        return format!("{} for {}", text, keyword);
    }

    let mut sentences: Vec<String> = text.split(". ").map(String::from).collect();
    if sentences.len() > 1 {
        let idx = sentences.len() - 2;
        sentences[idx].push_str(&format!(" regarding {}", keyword));
        return sentences.join(". ");
    }

    match text.rfind('.') {
        Some(idx) if idx > 0 && idx < text.len() - 1 => {
            format!("{} with {}{}", &text[..idx], keyword, &text[idx..])
        }
        _ => format!("{} - Learn more about {}.", text, keyword),
    }
}
