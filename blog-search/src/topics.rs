//! Static catalog of trending topics per category

use rand::seq::SliceRandom;
use rand::Rng;

/// Number of topics returned for an unknown or missing category
pub const MIXED_TOPIC_COUNT: usize = 20;

const TOPICS: &[(&str, &[&str])] = &[
    (
        "forex",
        &[
            "forex trading strategies 2025",
            "best currency pairs to trade",
            "forex market analysis today",
            "EUR/USD forecast 2025",
            "forex trading psychology",
            "forex risk management",
            "forex scalping strategies",
            "forex swing trading",
            "major currency pairs analysis",
            "forex economic calendar impact",
        ],
    ),
    (
        "stocks",
        &[
            "best stocks to buy 2025",
            "stock market analysis today",
            "dividend investing strategies",
            "growth vs value stocks",
            "stock market predictions 2025",
            "how to analyze stocks",
            "stock trading for beginners",
            "blue chip stocks 2025",
            "penny stocks to watch",
            "stock market volatility analysis",
        ],
    ),
    (
        "crypto",
        &[
            "cryptocurrency market analysis 2025",
            "best crypto to invest 2025",
            "Bitcoin price prediction",
            "Ethereum vs Bitcoin comparison",
            "DeFi investing strategies",
            "crypto trading strategies",
            "altcoin analysis 2025",
            "crypto market trends",
            "blockchain technology impact",
            "crypto regulation updates",
        ],
    ),
    (
        "options",
        &[
            "options trading strategies 2025",
            "call vs put options explained",
            "options trading for beginners",
            "covered call strategies",
            "options Greeks explained",
            "iron condor strategy",
            "options expiration strategies",
            "volatility trading with options",
            "options vs stocks comparison",
            "weekly options strategies",
        ],
    ),
    (
        "cfd",
        &[
            "CFD trading strategies",
            "CFD vs stocks comparison",
            "CFD trading risks explained",
            "best CFD brokers 2025",
            "CFD margin requirements",
            "CFD trading psychology",
            "commodity CFD trading",
            "index CFD strategies",
            "CFD leverage explained",
            "CFD trading platforms comparison",
        ],
    ),
    (
        "etf",
        &[
            "best ETFs to buy 2025",
            "ETF vs mutual funds",
            "dividend ETF strategies",
            "sector ETF analysis",
            "international ETF investing",
            "ETF portfolio diversification",
            "low cost ETF investing",
            "thematic ETF trends 2025",
            "bond ETF strategies",
            "ETF tax efficiency",
        ],
    ),
    (
        "trading",
        &[
            "day trading strategies 2025",
            "swing trading vs day trading",
            "technical analysis patterns",
            "trading psychology tips",
            "risk management strategies",
            "trading platform comparison",
            "algorithmic trading basics",
            "social trading platforms",
            "trading journal importance",
            "market sentiment analysis",
        ],
    ),
    (
        "investing",
        &[
            "investment strategies 2025",
            "passive vs active investing",
            "portfolio diversification tips",
            "retirement investing strategies",
            "ESG investing trends",
            "value investing principles",
            "growth investing strategies",
            "international investing guide",
            "tax efficient investing",
            "robo advisor comparison",
        ],
    ),
];

/// Trending topics for a category, or a shuffled mix when the category is unknown
pub fn trending_topics(category: Option<&str>) -> Vec<String> {
    trending_topics_with(category, &mut rand::rng())
}

/// [`trending_topics`] with a caller-supplied random source
pub fn trending_topics_with<R: Rng + ?Sized>(category: Option<&str>, rng: &mut R) -> Vec<String> {
    if let Some(topics) = category.and_then(category_topics) {
        return topics.iter().map(|t| t.to_string()).collect();
    }

    let mut all: Vec<&str> = TOPICS.iter().flat_map(|(_, t)| t.iter().copied()).collect();
    all.shuffle(rng);
    all.into_iter()
        .take(MIXED_TOPIC_COUNT)
        .map(String::from)
        .collect()
}

fn category_topics(category: &str) -> Option<&'static [&'static str]> {
    TOPICS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, topics)| *topics)
}
