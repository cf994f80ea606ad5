//! Blog assembler
//!
//! Sequences topic selection, research, structure planning, the writers, SEO
//! metadata and the featured image into one finished article. Every external
//! call is awaited in order and degrades to its own fallback, so `generate`
//! always returns a complete record.

use std::sync::Arc;

use tracing::{info, instrument};

use blog_core::{BlogContentRequest, BrokerData, GeneratedBlogContent};
use blog_search::{SearchProvider, TrendResearcher};
use blog_writer::{
    generate_slug_or, reading_time, table_of_contents, word_count, ArticleWriter, ImageResolver,
    SeoMetadataBuilder, StructurePlanner, TextGenerator, TopicSelector,
};

/// Tunables for one pipeline instance
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Results requested for the seed search query
    pub seed_results: u32,
    pub words_per_minute: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed_results: 10,
            words_per_minute: 225,
        }
    }
}

pub struct BlogAssembler {
    selector: TopicSelector,
    research: TrendResearcher,
    planner: StructurePlanner,
    writer: ArticleWriter,
    images: ImageResolver,
    seo: SeoMetadataBuilder,
    config: PipelineConfig,
}

impl BlogAssembler {
    pub fn new(
        search: SearchProvider,
        generator: Arc<dyn TextGenerator>,
        images: ImageResolver,
        config: PipelineConfig,
    ) -> Self {
        Self {
            selector: TopicSelector::default(),
            research: TrendResearcher::new(search).with_seed_results(config.seed_results),
            planner: StructurePlanner::new(generator.clone()),
            writer: ArticleWriter::new(generator),
            images,
            seo: SeoMetadataBuilder::default(),
            config,
        }
    }

    pub fn with_seo(mut self, seo: SeoMetadataBuilder) -> Self {
        self.seo = seo;
        self
    }

    pub fn seo(&self) -> &SeoMetadataBuilder {
        &self.seo
    }

    pub fn selector(&self) -> &TopicSelector {
        &self.selector
    }

    /// Produce one article for `request`
    #[instrument(skip_all, fields(query = %request.search_query))]
    pub async fn generate(&self, request: BlogContentRequest) -> GeneratedBlogContent {
        let content_type = match request.content_type {
            Some(content_type) => content_type,
            None => self
                .selector
                .select_in(request.category.as_deref(), &mut rand::rng()),
        };

        info!("Generating {} content", content_type.name);
        match &request.broker {
            Some(broker) => info!("Broker focus: {}", broker.name),
            None => info!("Category focus: {}", content_type.category),
        }

        let findings = self
            .research
            .research(&request.search_query, content_type.category)
            .await;

        let structure = self
            .planner
            .plan(
                content_type,
                request.broker.as_ref(),
                &findings.questions,
                &request.target_keywords,
                &findings.trends,
            )
            .await;

        let broker = request
            .broker
            .clone()
            .unwrap_or_else(BrokerData::placeholder);

        let mut content = self.writer.introduction(&structure.title, &broker).await;
        content.push_str(&table_of_contents(&structure.sections));
        for section in &structure.sections {
            content.push_str(&self.writer.section(section, &broker).await);
        }
        content.push_str(&self.writer.faq(&structure.faq_questions, &broker).await);
        content.push_str(
            &self
                .writer
                .conclusion(&broker, &structure.key_takeaways)
                .await,
        );

        let seo = self
            .seo
            .build(&structure.title, &content, &request.target_keywords);

        let subject = request
            .broker
            .as_ref()
            .map(|b| b.name.as_str())
            .unwrap_or(content_type.category);
        let featured_image = self
            .images
            .resolve(subject, &structure.title, content_type.category)
            .await;

        let words = word_count(&content);
        let reading_time = reading_time(words, self.config.words_per_minute);
        let slug = generate_slug_or(&structure.title, content_type.id);

        info!(
            "Generated '{}' ({}), {} words, {} min read",
            structure.title, slug, words, reading_time
        );

        GeneratedBlogContent {
            slug,
            excerpt: seo.description.clone(),
            seo_title: seo.title,
            seo_description: seo.description,
            reading_time,
            featured_image,
            title: structure.title,
            content,
            tags: structure.tags,
            key_takeaways: structure.key_takeaways,
        }
    }
}
