//! Featured image resolution with per-category defaults

use std::env;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, instrument};

use blog_core::with_fallback;

use crate::unsplash::{ImageProvider, UnsplashClient};

const GENERIC_DEFAULT_IMAGE: &str = "/images/blog/default-trading.jpg";

#[derive(Debug, Clone, Default)]
pub struct ImageConfig {
    pub unsplash_access_key: Option<String>,
}

impl ImageConfig {
    /// `UNSPLASH_ACCESS_KEY`, falling back to `UNSPLASH_API_KEY`
    pub fn from_env() -> Self {
        let key = ["UNSPLASH_ACCESS_KEY", "UNSPLASH_API_KEY"]
            .iter()
            .find_map(|k| env::var(k).ok().filter(|v| !v.trim().is_empty()));
        Self {
            unsplash_access_key: key,
        }
    }
}

/// Image search terms for a category; unknown categories use the "trading" set
pub fn search_terms(category: &str) -> &'static [&'static str] {
    match category {
        "brokers" => &["forex trading", "trading platform", "financial charts", "stock market"],
        "forex" => &["forex trading", "currency exchange", "financial charts", "trading desk"],
        "stocks" => &["stock market", "financial charts", "trading floor", "investment"],
        "crypto" => &["cryptocurrency", "bitcoin", "blockchain", "digital currency"],
        "options" => &["options trading", "financial derivatives", "trading charts", "investment"],
        "cfd" => &["CFD trading", "financial charts", "trading platform", "derivatives"],
        "etf" => &["ETF investing", "index funds", "portfolio", "investment"],
        "investing" => &["investment", "portfolio", "financial planning", "wealth management"],
        _ => &["day trading", "financial charts", "trading desk", "market analysis"],
    }
}

/// Static image path served when the image provider fails
pub fn default_image(category: &str) -> &'static str {
    match category {
        "brokers" => "/images/blog/default-broker.jpg",
        "forex" => "/images/blog/default-forex.jpg",
        "stocks" => "/images/blog/default-stocks.jpg",
        "crypto" => "/images/blog/default-crypto.jpg",
        "options" => "/images/blog/default-options.jpg",
        "cfd" => "/images/blog/default-cfd.jpg",
        "etf" => "/images/blog/default-etf.jpg",
        "investing" => "/images/blog/default-investing.jpg",
        _ => GENERIC_DEFAULT_IMAGE,
    }
}

/// One search term for `category`; callers draw it before awaiting
fn pick_term<R: Rng + ?Sized>(category: &str, rng: &mut R) -> &'static str {
    search_terms(category)
        .choose(rng)
        .copied()
        .unwrap_or("financial charts")
}

#[derive(Clone)]
pub struct ImageResolver {
    provider: Arc<dyn ImageProvider>,
}

impl ImageResolver {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self::new(Arc::new(UnsplashClient::new(
            config.unsplash_access_key.clone(),
        )))
    }

    /// Featured image URL; never fails
    pub async fn resolve(&self, subject: &str, title: &str, category: &str) -> String {
        let term = pick_term(category, &mut rand::rng());
        self.resolve_term(subject, title, category, term).await
    }

    /// Like [`resolve`](Self::resolve) with the term drawn from `rng`
    pub async fn resolve_with<R: Rng + ?Sized>(
        &self,
        subject: &str,
        title: &str,
        category: &str,
        rng: &mut R,
    ) -> String {
        let term = pick_term(category, rng);
        self.resolve_term(subject, title, category, term).await
    }

    #[instrument(skip(self, title), fields(provider = self.provider.name()))]
    async fn resolve_term(&self, subject: &str, title: &str, category: &str, term: &str) -> String {
        debug!("Looking up featured image for '{}'", title);
        with_fallback("Featured image", self.provider.image_url(term), || {
            default_image(category).to_string()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use blog_core::{BlogError, BlogResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Recording {
        queries: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ImageProvider for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn image_url(&self, query: &str) -> BlogResult<String> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.fail {
                Err(BlogError::api("rate limited"))
            } else {
                Ok(format!("https://img.example/{}", query.replace(' ', "-")))
            }
        }
    }

    fn resolver(fail: bool) -> (ImageResolver, Arc<Recording>) {
        let provider = Arc::new(Recording {
            queries: Mutex::new(Vec::new()),
            fail,
        });
        (ImageResolver::new(provider.clone()), provider)
    }

    #[test]
    fn test_default_images() {
        assert_eq!(default_image("brokers"), "/images/blog/default-broker.jpg");
        assert_eq!(default_image("etf"), "/images/blog/default-etf.jpg");
        assert_eq!(default_image("commodities"), GENERIC_DEFAULT_IMAGE);
    }

    #[test]
    fn test_unknown_category_uses_trading_terms() {
        assert_eq!(search_terms("commodities"), search_terms("trading"));
        assert_eq!(search_terms("crypto")[1], "bitcoin");
    }

    #[test]
    fn test_pick_term_stays_in_category() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            assert!(search_terms("etf").contains(&pick_term("etf", &mut rng)));
        }
    }

    #[tokio::test]
    async fn test_resolve_uses_category_term() {
        let (resolver, provider) = resolver(false);
        let mut rng = StdRng::seed_from_u64(3);
        let url = resolver
            .resolve_with("Acme FX", "Acme FX Review", "crypto", &mut rng)
            .await;

        let queries = provider.queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 1);
        assert!(search_terms("crypto").contains(&queries[0].as_str()));
        assert!(url.starts_with("https://img.example/"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_category_default() {
        let (resolver, _) = resolver(true);
        assert_eq!(
            resolver.resolve("forex", "Forex Guide", "forex").await,
            "/images/blog/default-forex.jpg"
        );
        assert_eq!(
            resolver.resolve("x", "y", "commodities").await,
            GENERIC_DEFAULT_IMAGE
        );
    }

    #[tokio::test]
    async fn test_missing_unsplash_key_falls_back() {
        let resolver = ImageResolver::from_config(&ImageConfig::default());
        assert_eq!(
            resolver.resolve("Acme FX", "Acme FX Review", "brokers").await,
            "/images/blog/default-broker.jpg"
        );
    }
}
