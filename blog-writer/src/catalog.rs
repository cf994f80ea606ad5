//! Static content-type catalog and weighted topic selection

use rand::Rng;

use blog_core::{ContentSection, ContentStructure, ContentType};

/// Every article flavour the pipeline can produce, in selection order
pub static CONTENT_TYPES: &[ContentType] = &[
    ContentType {
        id: "broker-review",
        name: "Broker Review",
        category: "brokers",
        weight: 30,
        keywords: &["broker review", "trading platform", "forex broker", "broker comparison"],
        search_terms: &["broker review 2025", "best trading platform", "broker fees", "broker regulation"],
        target_audience: "traders looking for broker information",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "Broker Overview and Key Features",
                    subheadings: &["Platform Overview", "Key Trading Features", "Account Types"],
                    key_points: &["Regulation and safety", "Trading platforms", "Account options"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Trading Conditions and Fees",
                    subheadings: &["Spreads and Commissions", "Deposit and Withdrawal", "Trading Costs"],
                    key_points: &["Competitive spreads", "Fee structure", "Payment methods"],
                    estimated_words: 350,
                },
                ContentSection {
                    heading: "Platform and Tools Analysis",
                    subheadings: &["Trading Platforms", "Research Tools", "Mobile Trading"],
                    key_points: &["Platform features", "Analysis tools", "Mobile app"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Pros and Cons Analysis",
                    subheadings: &["Advantages", "Disadvantages", "Who Should Use"],
                    key_points: &["Main benefits", "Potential drawbacks", "Target audience"],
                    estimated_words: 300,
                },
            ],
            estimated_word_count: 1800,
            faq_count: 6,
            key_takeaways_count: 5,
        },
    },
    ContentType {
        id: "forex-guide",
        name: "Forex Trading Guide",
        category: "forex",
        weight: 25,
        keywords: &["forex trading", "currency pairs", "forex strategies", "forex analysis"],
        search_terms: &[
            "forex trading strategies",
            "currency pair analysis",
            "forex market trends",
            "forex for beginners",
        ],
        target_audience: "forex traders and beginners",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "Understanding Forex Markets",
                    subheadings: &["What is Forex Trading", "Major Currency Pairs", "Market Sessions"],
                    key_points: &["Forex basics", "Currency pair types", "Trading hours"],
                    estimated_words: 450,
                },
                ContentSection {
                    heading: "Forex Trading Strategies",
                    subheadings: &["Day Trading", "Swing Trading", "Scalping"],
                    key_points: &["Strategy types", "Risk management", "Entry and exit points"],
                    estimated_words: 500,
                },
                ContentSection {
                    heading: "Technical and Fundamental Analysis",
                    subheadings: &["Chart Patterns", "Economic Indicators", "News Impact"],
                    key_points: &["Analysis methods", "Key indicators", "Market drivers"],
                    estimated_words: 450,
                },
                ContentSection {
                    heading: "Risk Management and Psychology",
                    subheadings: &["Position Sizing", "Stop Losses", "Trading Psychology"],
                    key_points: &["Risk control", "Emotional management", "Trading discipline"],
                    estimated_words: 400,
                },
            ],
            estimated_word_count: 2000,
            faq_count: 8,
            key_takeaways_count: 6,
        },
    },
    ContentType {
        id: "stock-analysis",
        name: "Stock Market Analysis",
        category: "stocks",
        weight: 20,
        keywords: &["stock trading", "stock analysis", "stock market", "equity investing"],
        search_terms: &[
            "best stocks 2025",
            "stock market analysis",
            "stock trading strategies",
            "dividend stocks",
        ],
        target_audience: "stock traders and investors",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "Stock Market Fundamentals",
                    subheadings: &["Market Structure", "Stock Types", "Market Indices"],
                    key_points: &["Market basics", "Stock categories", "Index tracking"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Stock Analysis Methods",
                    subheadings: &["Fundamental Analysis", "Technical Analysis", "Valuation Metrics"],
                    key_points: &["Analysis techniques", "Key ratios", "Valuation methods"],
                    estimated_words: 500,
                },
                ContentSection {
                    heading: "Investment Strategies",
                    subheadings: &["Value Investing", "Growth Investing", "Dividend Investing"],
                    key_points: &["Strategy types", "Selection criteria", "Portfolio building"],
                    estimated_words: 450,
                },
                ContentSection {
                    heading: "Risk Management and Diversification",
                    subheadings: &["Portfolio Allocation", "Risk Assessment", "Diversification Benefits"],
                    key_points: &["Risk control", "Asset allocation", "Portfolio balance"],
                    estimated_words: 350,
                },
            ],
            estimated_word_count: 1900,
            faq_count: 7,
            key_takeaways_count: 5,
        },
    },
    ContentType {
        id: "crypto-guide",
        name: "Cryptocurrency Guide",
        category: "crypto",
        weight: 15,
        keywords: &["cryptocurrency", "crypto trading", "bitcoin", "blockchain"],
        search_terms: &[
            "crypto trading strategies",
            "best cryptocurrency 2025",
            "bitcoin analysis",
            "crypto market trends",
        ],
        target_audience: "crypto traders and investors",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "Cryptocurrency Fundamentals",
                    subheadings: &["Blockchain Technology", "Types of Cryptocurrencies", "Market Structure"],
                    key_points: &["Crypto basics", "Technology overview", "Market dynamics"],
                    estimated_words: 450,
                },
                ContentSection {
                    heading: "Crypto Trading Strategies",
                    subheadings: &["HODLing vs Trading", "DeFi Strategies", "Altcoin Analysis"],
                    key_points: &["Trading approaches", "DeFi opportunities", "Coin selection"],
                    estimated_words: 500,
                },
                ContentSection {
                    heading: "Market Analysis and Trends",
                    subheadings: &["Price Analysis", "Market Cycles", "Regulatory Impact"],
                    key_points: &["Technical analysis", "Market patterns", "Regulation effects"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Security and Risk Management",
                    subheadings: &["Wallet Security", "Exchange Safety", "Risk Mitigation"],
                    key_points: &["Security practices", "Platform safety", "Risk control"],
                    estimated_words: 350,
                },
            ],
            estimated_word_count: 1900,
            faq_count: 8,
            key_takeaways_count: 6,
        },
    },
    ContentType {
        id: "options-guide",
        name: "Options Trading Guide",
        category: "options",
        weight: 5,
        keywords: &["options trading", "call options", "put options", "options strategies"],
        search_terms: &[
            "options trading strategies",
            "options for beginners",
            "covered calls",
            "options Greeks",
        ],
        target_audience: "options traders and advanced investors",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "Options Trading Basics",
                    subheadings: &["What are Options", "Call vs Put Options", "Options Terminology"],
                    key_points: &["Options fundamentals", "Contract types", "Key terms"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Options Strategies",
                    subheadings: &["Basic Strategies", "Intermediate Strategies", "Advanced Strategies"],
                    key_points: &["Strategy types", "Risk profiles", "Profit potential"],
                    estimated_words: 500,
                },
                ContentSection {
                    heading: "Options Greeks and Pricing",
                    subheadings: &["Delta", "Gamma", "Theta", "Vega"],
                    key_points: &["Greeks explanation", "Price sensitivity", "Risk factors"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Risk Management",
                    subheadings: &["Position Sizing", "Exit Strategies", "Common Mistakes"],
                    key_points: &["Risk control", "Exit planning", "Error avoidance"],
                    estimated_words: 300,
                },
            ],
            estimated_word_count: 1800,
            faq_count: 6,
            key_takeaways_count: 5,
        },
    },
    ContentType {
        id: "cfd-guide",
        name: "CFD Trading Guide",
        category: "cfd",
        weight: 3,
        keywords: &["CFD trading", "contracts for difference", "CFD strategies", "CFD brokers"],
        search_terms: &[
            "CFD trading strategies",
            "CFD vs stocks",
            "CFD brokers comparison",
            "CFD risks",
        ],
        target_audience: "CFD traders and leveraged trading enthusiasts",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "Understanding CFDs",
                    subheadings: &["What are CFDs", "CFD vs Traditional Trading", "Market Access"],
                    key_points: &["CFD basics", "Comparison benefits", "Market coverage"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "CFD Trading Strategies",
                    subheadings: &["Long and Short Positions", "Leverage Usage", "Hedging Strategies"],
                    key_points: &["Position types", "Leverage benefits", "Risk hedging"],
                    estimated_words: 450,
                },
                ContentSection {
                    heading: "Costs and Risks",
                    subheadings: &["Spreads and Commissions", "Overnight Fees", "Risk Factors"],
                    key_points: &["Trading costs", "Fee structure", "Risk awareness"],
                    estimated_words: 350,
                },
                ContentSection {
                    heading: "Platform Selection and Tools",
                    subheadings: &["Broker Comparison", "Trading Platforms", "Analysis Tools"],
                    key_points: &["Broker selection", "Platform features", "Trading tools"],
                    estimated_words: 300,
                },
            ],
            estimated_word_count: 1700,
            faq_count: 6,
            key_takeaways_count: 4,
        },
    },
    ContentType {
        id: "etf-guide",
        name: "ETF Investment Guide",
        category: "etf",
        weight: 2,
        keywords: &["ETF investing", "exchange traded funds", "ETF strategies", "index funds"],
        search_terms: &["best ETFs 2025", "ETF vs mutual funds", "ETF portfolio", "dividend ETFs"],
        target_audience: "long-term investors and passive investment enthusiasts",
        structure: ContentStructure {
            sections: &[
                ContentSection {
                    heading: "ETF Fundamentals",
                    subheadings: &["What are ETFs", "ETF Types", "Benefits of ETF Investing"],
                    key_points: &["ETF basics", "Fund categories", "Investment advantages"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "ETF Selection and Analysis",
                    subheadings: &["Expense Ratios", "Tracking Error", "Liquidity Factors"],
                    key_points: &["Selection criteria", "Cost analysis", "Performance metrics"],
                    estimated_words: 450,
                },
                ContentSection {
                    heading: "Portfolio Construction",
                    subheadings: &["Asset Allocation", "Diversification", "Rebalancing"],
                    key_points: &["Portfolio building", "Risk spreading", "Maintenance strategies"],
                    estimated_words: 400,
                },
                ContentSection {
                    heading: "Tax Efficiency and Costs",
                    subheadings: &["Tax Benefits", "Cost Comparison", "Long-term Strategy"],
                    key_points: &["Tax advantages", "Fee comparison", "Investment planning"],
                    estimated_words: 300,
                },
            ],
            estimated_word_count: 1750,
            faq_count: 5,
            key_takeaways_count: 4,
        },
    },
];

/// Weighted-random choice over a content-type catalog
#[derive(Debug, Clone, Copy)]
pub struct TopicSelector {
    catalog: &'static [ContentType],
}

impl Default for TopicSelector {
    fn default() -> Self {
        Self::new(CONTENT_TYPES)
    }
}

impl TopicSelector {
    /// Selector over a custom catalog; an empty catalog falls back to the built-in one
    pub fn new(catalog: &'static [ContentType]) -> Self {
        if catalog.is_empty() {
            return Self {
                catalog: CONTENT_TYPES,
            };
        }
        Self { catalog }
    }

    pub fn catalog(&self) -> &'static [ContentType] {
        self.catalog
    }

    /// Draw one content type with probability proportional to its weight
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static ContentType {
        let candidates: Vec<&'static ContentType> = self.catalog.iter().collect();
        weighted_pick(&candidates, rng)
    }

    /// Like [`select`](Self::select) but limited to `category` when it names catalog entries
    pub fn select_in<R: Rng + ?Sized>(
        &self,
        category: Option<&str>,
        rng: &mut R,
    ) -> &'static ContentType {
        let candidates: Vec<&'static ContentType> = match category {
            Some(category) => self
                .catalog
                .iter()
                .filter(|t| t.category == category)
                .collect(),
            None => Vec::new(),
        };

        if candidates.is_empty() {
            self.select(rng)
        } else {
            weighted_pick(&candidates, rng)
        }
    }
}

/// Walk the candidates accumulating weight until the running sum passes the draw
///
/// `candidates` must be non-empty. A zero total weight, or a draw that never
/// lands, yields the first candidate.
fn weighted_pick<R: Rng + ?Sized>(
    candidates: &[&'static ContentType],
    rng: &mut R,
) -> &'static ContentType {
    let first = candidates[0];
    let total: u32 = candidates.iter().map(|t| t.weight).sum();
    if total == 0 {
        return first;
    }

    let draw = rng.random_range(0..total);
    let mut running = 0;
    for candidate in candidates {
        running += candidate.weight;
        if running > draw {
            return candidate;
        }
    }
    first
}

/// Draw from the built-in catalog using the thread RNG
pub fn select_content_type() -> &'static ContentType {
    TopicSelector::default().select(&mut rand::rng())
}

/// Draw from the built-in catalog using the given RNG
pub fn select_content_type_with<R: Rng + ?Sized>(rng: &mut R) -> &'static ContentType {
    TopicSelector::default().select(rng)
}

pub fn content_types_by_category(category: &str) -> Vec<&'static ContentType> {
    CONTENT_TYPES
        .iter()
        .filter(|t| t.category == category)
        .collect()
}

/// Distinct categories in catalog order
pub fn all_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for content_type in CONTENT_TYPES {
        if !categories.contains(&content_type.category) {
            categories.push(content_type.category);
        }
    }
    categories
}

pub fn find_content_type(id: &str) -> Option<&'static ContentType> {
    CONTENT_TYPES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_weights() {
        let weights: Vec<u32> = CONTENT_TYPES.iter().map(|t| t.weight).collect();
        assert_eq!(weights, vec![30, 25, 20, 15, 5, 3, 2]);
        assert_eq!(weights.iter().sum::<u32>(), 100);
    }

    #[test]
    fn test_every_type_has_a_full_template() {
        for content_type in CONTENT_TYPES {
            assert_eq!(content_type.structure.sections.len(), 4, "{}", content_type.id);
            assert!(content_type.structure.faq_count > 0);
            assert!(content_type.structure.key_takeaways_count > 0);
            assert!(content_type.structure.section_word_total() > 0);
            assert!(!content_type.keywords.is_empty());
        }
    }

    #[test]
    fn test_selection_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0u32; CONTENT_TYPES.len()];
        let draws = 10_000;

        for _ in 0..draws {
            let picked = select_content_type_with(&mut rng);
            let index = CONTENT_TYPES
                .iter()
                .position(|t| t.id == picked.id)
                .expect("selected type is in the catalog");
            counts[index] += 1;
        }

        for (content_type, count) in CONTENT_TYPES.iter().zip(&counts) {
            let share = *count as f64 / draws as f64 * 100.0;
            let expected = content_type.weight as f64;
            assert!(
                (share - expected).abs() < 3.0,
                "{} drawn {:.1}% of the time, expected about {}%",
                content_type.id,
                share,
                expected
            );
        }
    }

    #[test]
    fn test_category_hint_restricts_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        let selector = TopicSelector::default();
        for _ in 0..100 {
            assert_eq!(selector.select_in(Some("crypto"), &mut rng).id, "crypto-guide");
        }
    }

    #[test]
    fn test_unknown_category_hint_uses_full_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = TopicSelector::default().select_in(Some("commodities"), &mut rng);
        assert!(find_content_type(picked.id).is_some());
    }

    #[test]
    fn test_zero_weight_catalog_returns_first_entry() {
        static ZERO: &[ContentType] = &[ContentType {
            id: "only",
            name: "Only",
            category: "misc",
            weight: 0,
            keywords: &[],
            search_terms: &[],
            target_audience: "nobody",
            structure: ContentStructure {
                sections: &[],
                estimated_word_count: 0,
                faq_count: 0,
                key_takeaways_count: 0,
            },
        }];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(TopicSelector::new(ZERO).select(&mut rng).id, "only");
    }

    #[test]
    fn test_category_helpers() {
        assert_eq!(
            all_categories(),
            vec!["brokers", "forex", "stocks", "crypto", "options", "cfd", "etf"]
        );
        assert_eq!(content_types_by_category("forex").len(), 1);
        assert!(content_types_by_category("bonds").is_empty());
        assert_eq!(
            find_content_type("etf-guide").map(|t| t.name),
            Some("ETF Investment Guide")
        );
        assert!(find_content_type("missing").is_none());
    }
}
