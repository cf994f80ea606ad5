//! Core types for the broker blog content pipeline
//!
//! This crate defines the shared data structures used across the workspace,
//! including broker records, search results, content templates and the
//! generated article record.

pub mod broker;
pub mod content;
pub mod error;
pub mod fallback;
pub mod search;

pub use broker::BrokerData;
pub use content::{
    BlogContentRequest, BlogStructure, ContentSection, ContentStructure, ContentType,
    GeneratedBlogContent, PlannedSection,
};
pub use error::{BlogError, BlogResult};
pub use fallback::with_fallback;
pub use search::{DateRange, SearchOptions, SearchResponse, SearchResult};
