//! Extraction layers
//!
//! Each layer derives the same logical product fields from one independent
//! source of the document: visible markup, JSON-LD, or embedded script state.
//! Layers never read each other's output.

pub mod css;
mod dom;
mod js_literal;
mod js_state;
mod jsonld;
pub mod metadata;
pub mod page;

pub use dom::DomExtractor;
pub use js_state::JsStateExtractor;
pub use jsonld::JsonLdExtractor;

use crate::config::Limits;
use crate::graph::GraphIndex;
use crate::product::{Offer, Rating, Variant};
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier of an extraction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    #[serde(rename = "dom")]
    Dom,
    #[serde(rename = "jsonld")]
    JsonLd,
    #[serde(rename = "js_state")]
    JsState,
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Dom => "dom",
            Layer::JsonLd => "jsonld",
            Layer::JsState => "js_state",
        }
    }

    /// Fixed trust weight of the layer
    pub fn confidence(self) -> f64 {
        match self {
            Layer::Dom => 0.6,
            Layer::JsonLd => 0.9,
            Layer::JsState => 0.8,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One layer's opinion on the product fields. Unset means "not observed";
/// an empty list counts as unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayerResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<Offer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_text: Option<String>,
}

impl LayerResult {
    pub fn is_empty(&self) -> bool {
        *self == LayerResult::default()
    }

    /// Fill fields still unset from `other`; fields already set win.
    pub fn absorb(&mut self, other: LayerResult) {
        fill(&mut self.sku, other.sku);
        fill(&mut self.mpn, other.mpn);
        fill(&mut self.brand, other.brand);
        fill(&mut self.offer, other.offer);
        fill(&mut self.rating, other.rating);
        fill(&mut self.delivery_text, other.delivery_text);
        if self.images.is_empty() {
            self.images = other.images;
        }
        if self.variants.is_empty() {
            self.variants = other.variants;
        }
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// Everything a layer may look at for one document
#[derive(Clone, Copy)]
pub struct Page<'a> {
    pub document: &'a Html,
    pub graph: &'a GraphIndex,
    pub base_url: &'a Url,
    pub limits: &'a Limits,
}

/// An independent source of product fields
pub trait LayerExtractor {
    fn layer(&self) -> Layer;

    /// Never fails; a miss leaves the field unset
    fn extract(&self, page: &Page<'_>) -> LayerResult;
}
