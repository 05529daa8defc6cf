//! Extraction limits and fetch settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Caps that keep every stage bounded on pathological documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Body text length in characters
    pub body_chars: usize,
    pub images: usize,
    pub faq_items: usize,
    pub variants: usize,
    /// Delivery text longer than this is treated as page copy, not a label
    pub delivery_text_chars: usize,
    pub headline_chars: usize,
    pub description_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            body_chars: 5000,
            images: 20,
            faq_items: 10,
            variants: 10,
            delivery_text_chars: 200,
            headline_chars: 110,
            description_chars: 300,
        }
    }
}

/// Settings for the HTTP document source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("schema-synth/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
