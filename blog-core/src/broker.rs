//! Broker records supplied by the caller

use serde::{Deserialize, Serialize};

/// Descriptive facts about a broker used to focus an article
///
/// Only `id` and `name` are required; everything else is optional and is
/// rendered as "N/A" or a generic phrase in prompts when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerData {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_deposit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreads: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl BrokerData {
    /// Create a broker with only the required fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            rating: None,
            regulation: None,
            min_deposit: None,
            spreads: None,
            platforms: Vec::new(),
            website_url: None,
        }
    }

    /// Stand-in used by the writers when the request carries no broker
    pub fn placeholder() -> Self {
        Self {
            id: "unknown".to_string(),
            name: "Unknown Broker".to_string(),
            description: Some("A trading broker".to_string()),
            rating: Some(4.0),
            regulation: Some("Various".to_string()),
            min_deposit: Some(100.0),
            spreads: None,
            platforms: Vec::new(),
            website_url: None,
        }
    }

    /// Tag form of the broker name ("Acme FX" -> "acme-fx")
    pub fn tag(&self) -> String {
        self.name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}
