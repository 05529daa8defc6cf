//! JSON-LD layer
//!
//! Reads every `Product` node of the graph index. Fields are merged across
//! nodes with the first node in document order that supplies a field winning.

use super::{Layer, LayerExtractor, LayerResult, Page};
use crate::graph::{FieldValue, StructuredNode};
use crate::product::{schema_availability, Offer, Rating};

const GTIN_KEYS: &[&str] = &["gtin", "gtin13", "gtin12", "gtin8", "gtin14"];

/// Highest-trust layer over author-declared structured data
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLdExtractor;

impl LayerExtractor for JsonLdExtractor {
    fn layer(&self) -> Layer {
        Layer::JsonLd
    }

    fn extract(&self, page: &Page<'_>) -> LayerResult {
        let mut result = LayerResult::default();
        let mut product_nodes = 0usize;

        for node in page.graph.nodes_of("Product") {
            result.absorb(parse_product(node));
            product_nodes += 1;
        }

        tracing::debug!(
            target: "schema_synth::extract",
            layer = %Layer::JsonLd,
            product_nodes,
            found = !result.is_empty(),
            "layer extracted"
        );

        result
    }
}

fn parse_product(node: &StructuredNode) -> LayerResult {
    LayerResult {
        sku: node
            .get("sku")
            .as_text()
            .map(String::from)
            .or_else(|| GTIN_KEYS.iter().find_map(|key| node.get(key).to_plain_string())),
        mpn: node.get("mpn").as_text().map(String::from),
        brand: parse_brand(node.get("brand")),
        offer: parse_offer(node.get("offers")),
        rating: parse_rating(node.get("aggregateRating")),
        images: parse_images(node.get("image")),
        variants: Vec::new(),
        delivery_text: None,
    }
}

/// Brand as a plain name, from a string or an object with `name`
pub(crate) fn parse_brand(value: &FieldValue) -> Option<String> {
    match value.first() {
        FieldValue::Object(_) => value.first().get("name").as_text().map(String::from),
        other => other.as_text().map(String::from),
    }
}

/// First offer in document order; absent without a usable price
fn parse_offer(value: &FieldValue) -> Option<Offer> {
    let offer = value.first();
    if offer.as_object().is_none() {
        return None;
    }

    let price = offer
        .get("price")
        .to_plain_string()
        .or_else(|| offer.get("lowPrice").to_plain_string());

    Offer {
        price,
        currency: offer.get("priceCurrency").as_text().map(String::from),
        availability: offer.get("availability").as_text().and_then(schema_availability),
        price_valid_until: offer.get("priceValidUntil").as_text().map(String::from),
        seller_name: match offer.get("seller") {
            FieldValue::Object(_) => offer.get("seller").get("name").as_text().map(String::from),
            other => other.as_text().map(String::from),
        },
    }
    .priced()
}

fn parse_rating(value: &FieldValue) -> Option<Rating> {
    let rating = value.first();
    if rating.as_object().is_none() {
        return None;
    }

    let count = |key: &str| {
        rating
            .get(key)
            .as_number()
            .filter(|n| *n >= 0.0)
            .map(|n| n.round() as u64)
    };

    Rating {
        rating_value: rating.get("ratingValue").as_number(),
        review_count: count("reviewCount"),
        rating_count: count("ratingCount"),
        best_rating: rating.get("bestRating").as_number(),
        worst_rating: rating.get("worstRating").as_number(),
    }
    .non_empty()
}

/// Every image entry as a URL string, in declared order
pub(crate) fn parse_images(value: &FieldValue) -> Vec<String> {
    value
        .items()
        .iter()
        .filter_map(|item| match item {
            FieldValue::Object(_) => ["url", "contentUrl", "@id"]
                .iter()
                .find_map(|key| item.get(key).as_text()),
            other => other.as_text(),
        })
        .map(|url| url.trim().to_string())
        .collect()
}
