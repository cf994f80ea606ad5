//! Article writing for the broker blog pipeline
//!
//! Text-generation providers (Context7, OpenAI, Anthropic and a canned
//! template last resort) resolved into one ranked strategy, the content-type
//! catalog, structure planning, the prose writers, featured images and SEO
//! helpers. Every stage that talks to an external service degrades to a
//! deterministic fallback instead of failing.

pub mod anthropic;
pub mod catalog;
pub mod context7;
pub mod generation;
pub mod image;
pub mod openai;
pub mod planner;
pub mod seo;
pub mod template;
pub mod unsplash;
pub mod writers;

pub use anthropic::AnthropicGenerator;
pub use catalog::{
    all_categories, content_types_by_category, find_content_type, select_content_type,
    select_content_type_with, TopicSelector, CONTENT_TYPES,
};
pub use context7::Context7Generator;
pub use generation::{GenerationConfig, GenerationOptions, TextGeneration, TextGenerator};
pub use image::{ImageConfig, ImageResolver};
pub use openai::OpenAIGenerator;
pub use planner::{fallback_structure, StructurePlanner};
pub use seo::{
    generate_anchor, generate_excerpt, generate_slug, generate_slug_or, reading_time, seo_title,
    word_count, HeadProps, OpenGraph, OpenGraphImage, SeoConfig, SeoMetadata, SeoMetadataBuilder,
    TwitterCard,
};
pub use template::TemplateGenerator;
pub use unsplash::{ImageProvider, UnsplashClient};
pub use writers::{table_of_contents, ArticleWriter};
