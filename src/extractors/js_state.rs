//! Embedded script-state layer
//!
//! Scans inline scripts for a fixed set of well-known global state
//! assignments, captures the assigned object literal and decodes it
//! best-effort. Every pattern is tried independently; a literal that fails to
//! decode is skipped and the remaining patterns still run.

use super::js_literal;
use super::{Layer, LayerExtractor, LayerResult, Page};
use crate::product::{format_state_price, schema_availability, Offer, Rating, Variant};
use regex::Regex;
use scraper::Selector;
use serde_json::Value;
use std::sync::LazyLock;

static SCRIPT_SELECTOR: LazyLock<Option<Selector>> = LazyLock::new(|| {
    Selector::parse(r#"script:not([type="application/ld+json"])"#).ok()
});

/// How a decoded literal leads to the product object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateKind {
    /// Whole application state; the product is searched for
    StateTree,
    /// The literal is the product
    ProductObject,
    /// Analytics payload with a `product` or `items` entry
    AnalyticsMeta,
}

struct StatePattern {
    name: &'static str,
    regex: Regex,
    kind: StateKind,
    /// Decoded object must carry this key
    requires_key: Option<&'static str>,
}

// Each regex ends at the opening brace of the assigned literal
static STATE_PATTERNS: LazyLock<Vec<StatePattern>> = LazyLock::new(|| {
    [
        ("initial_state", r"window\.__INITIAL_STATE__\s*=\s*\{", StateKind::StateTree, None),
        ("preloaded_state", r"window\.__PRELOADED_STATE__\s*=\s*\{", StateKind::StateTree, None),
        ("next_data", r"__NEXT_DATA__\s*=\s*\{", StateKind::StateTree, None),
        ("product_object", r"\bproduct\s*=\s*\{", StateKind::ProductObject, None),
        ("analytics_meta", r"ShopifyAnalytics\.meta\s*=\s*\{", StateKind::AnalyticsMeta, None),
        ("meta_object", r"\bvar\s+meta\s*=\s*\{", StateKind::AnalyticsMeta, Some("product")),
    ]
    .into_iter()
    .filter_map(|(name, pattern, kind, requires_key)| {
        Regex::new(pattern).ok().map(|regex| StatePattern {
            name,
            regex,
            kind,
            requires_key,
        })
    })
    .collect()
});

const PRODUCT_INDICATORS: &[&str] = &["price", "variants", "sku", "title", "name"];
const PRODUCT_CONTAINERS: &[&str] = &["product", "products", "productData", "item", "items"];
const MAX_STATE_DEPTH: usize = 3;

/// Medium-trust layer over client-side application state
#[derive(Debug, Default, Clone, Copy)]
pub struct JsStateExtractor;

impl LayerExtractor for JsStateExtractor {
    fn layer(&self) -> Layer {
        Layer::JsState
    }

    fn extract(&self, page: &Page<'_>) -> LayerResult {
        let mut result = LayerResult::default();
        let mut matched = Vec::new();

        let Some(scripts) = SCRIPT_SELECTOR.as_ref() else {
            return result;
        };

        for script in page.document.select(scripts) {
            let text = script.text().collect::<String>();
            if text.trim().is_empty() {
                continue;
            }

            // Next.js ships its state as a bare JSON script
            if script.value().id() == Some("__NEXT_DATA__") {
                if let Some(product) = js_literal::decode(text.trim())
                    .as_ref()
                    .and_then(|state| locate_product(state, StateKind::StateTree))
                {
                    matched.push("next_data");
                    result.absorb(map_product(product, page.limits.variants));
                }
                continue;
            }

            for pattern in STATE_PATTERNS.iter() {
                let Some(m) = pattern.regex.find(&text) else {
                    continue;
                };
                let Some(literal) = capture_literal(&text, m.end() - 1) else {
                    continue;
                };
                let Some(state) = js_literal::decode(literal) else {
                    tracing::debug!(
                        target: "schema_synth::extract",
                        pattern = pattern.name,
                        "state literal failed to decode"
                    );
                    continue;
                };
                if pattern.requires_key.is_some_and(|key| state.get(key).is_none()) {
                    continue;
                }
                if let Some(product) = locate_product(&state, pattern.kind) {
                    matched.push(pattern.name);
                    result.absorb(map_product(product, page.limits.variants));
                }
            }
        }

        tracing::debug!(
            target: "schema_synth::extract",
            layer = %Layer::JsState,
            patterns = ?matched,
            found = !result.is_empty(),
            "layer extracted"
        );

        result
    }
}

/// Slice of the balanced `{...}` literal opening at byte `start`.
/// Braces inside string literals and comments are ignored.
fn capture_literal(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match (b, bytes.get(i + 1).copied()) {
            (b'/', Some(b'/')) => {
                i = bytes[i..].iter().position(|&c| c == b'\n').map_or(bytes.len(), |p| i + p);
                continue;
            }
            (b'/', Some(b'*')) => {
                i = i + 2 + text.get(i + 2..)?.find("*/")? + 2;
                continue;
            }
            (b'"' | b'\'' | b'`', _) => quote = Some(b),
            (b'{' | b'[', _) => depth += 1,
            (b'}' | b']', _) => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return text.get(start..=i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

fn locate_product(state: &Value, kind: StateKind) -> Option<&Value> {
    match kind {
        StateKind::StateTree => find_product_in_state(state, 0),
        StateKind::ProductObject => state.is_object().then_some(state),
        StateKind::AnalyticsMeta => state
            .get("product")
            .filter(|p| p.is_object())
            .or_else(|| state.get("items").and_then(|items| items.get(0)).filter(|p| p.is_object()))
            .or_else(|| state.is_object().then_some(state)),
    }
}

fn find_product_in_state(value: &Value, depth: usize) -> Option<&Value> {
    let obj = value.as_object()?;
    if depth > MAX_STATE_DEPTH {
        return None;
    }

    let indicators = PRODUCT_INDICATORS.iter().filter(|k| obj.contains_key(**k)).count();
    if indicators >= 2 {
        return Some(value);
    }

    for key in PRODUCT_CONTAINERS {
        match obj.get(*key) {
            Some(child @ Value::Object(_)) => return Some(child),
            Some(Value::Array(items)) => {
                if let Some(first @ Value::Object(_)) = items.first() {
                    return Some(first);
                }
            }
            _ => {}
        }
    }

    obj.values()
        .filter(|v| v.is_object())
        .find_map(|v| find_product_in_state(v, depth + 1))
}

fn map_product(product: &Value, variant_cap: usize) -> LayerResult {
    let variants_raw = product
        .get("variants")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let variants: Vec<Variant> = variants_raw
        .iter()
        .filter_map(map_variant)
        .take(variant_cap)
        .collect();

    // First variant's price describes the default selection
    let offer = variants_raw
        .first()
        .filter(|v| v.get("price").is_some_and(|p| !p.is_null()))
        .and_then(|v| state_offer(v, v.get("price")?, &["currency"]))
        .or_else(|| {
            let price = product.get("price").or_else(|| product.get("price_amount"))?;
            state_offer(product, price, &["currency", "currency_code"])
        });

    LayerResult {
        sku: ["sku", "productId", "product_id", "product_sku"]
            .iter()
            .find_map(|k| product.get(*k).and_then(plain_string)),
        mpn: product.get("mpn").and_then(plain_string),
        brand: ["brand", "vendor"].iter().find_map(|k| match product.get(*k)? {
            Value::Object(obj) => obj.get("name").and_then(plain_string),
            other => plain_string(other),
        }),
        offer,
        rating: product.get("aggregateRating").and_then(map_rating),
        images: Vec::new(),
        variants,
        delivery_text: None,
    }
}

fn map_variant(value: &Value) -> Option<Variant> {
    let name = ["title", "name", "option1"]
        .iter()
        .find_map(|k| value.get(*k).and_then(plain_string))?;

    Some(Variant {
        value: value.get("option1").and_then(plain_string).unwrap_or_else(|| name.clone()),
        name,
        price: value.get("price").and_then(format_state_price),
        sku: value.get("sku").and_then(plain_string),
        available: value.get("available").and_then(Value::as_bool),
    })
}

fn state_offer(source: &Value, price: &Value, currency_keys: &[&str]) -> Option<Offer> {
    Offer {
        price: format_state_price(price),
        currency: currency_keys
            .iter()
            .find_map(|k| source.get(*k).and_then(plain_string)),
        availability: source
            .get("available")
            .and_then(Value::as_bool)
            .and_then(|a| schema_availability(if a { "InStock" } else { "OutOfStock" })),
        ..Offer::default()
    }
    .priced()
}

fn map_rating(value: &Value) -> Option<Rating> {
    let number = |key: &str| match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let count = |key: &str| number(key).filter(|n| *n >= 0.0).map(|n| n.round() as u64);

    Rating {
        rating_value: number("ratingValue"),
        review_count: count("reviewCount"),
        rating_count: count("ratingCount"),
        best_rating: number("bestRating"),
        worst_rating: number("worstRating"),
    }
    .non_empty()
}

/// Non-empty string, or a number rendered as one
fn plain_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::graph::GraphIndex;
    use scraper::Html;
    use url::Url;

    fn extract(html: &str) -> LayerResult {
        let document = Html::parse_document(html);
        let graph = GraphIndex::default();
        let base_url = Url::parse("https://shop.example.com/products/tee").unwrap();
        let limits = Limits::default();
        let page = Page {
            document: &document,
            graph: &graph,
            base_url: &base_url,
            limits: &limits,
        };
        JsStateExtractor.extract(&page)
    }

    #[test]
    fn test_capture_literal_respects_strings() {
        let text = r#"x = {"a": "}{", "b": {"c": [1, 2]}}; y = 2;"#;
        let start = text.find('{').unwrap();
        assert_eq!(
            capture_literal(text, start),
            Some(r#"{"a": "}{", "b": {"c": [1, 2]}}"#)
        );
        assert_eq!(capture_literal("{ unterminated", 0), None);
    }

    #[test]
    fn test_capture_literal_skips_comments() {
        let text = "s = {\n  // don't stop here }\n  \"a\": 1, /* it's { fine */ \"b\": [2]\n}; t = 3;";
        let start = text.find('{').unwrap();
        let literal = capture_literal(text, start).unwrap();
        assert!(literal.ends_with("[2]\n}"));
        assert_eq!(capture_literal("{ /* open", 0), None);
    }

    #[test]
    fn test_commented_state_still_decodes() {
        let result = extract(
            r#"<script>
            var product = {
                // the shop's default variant
                "title": "Mug", "sku": "MUG-1", "price": 1500
            };
            </script>"#,
        );
        assert_eq!(result.sku.as_deref(), Some("MUG-1"));
        assert_eq!(result.offer.unwrap().price.as_deref(), Some("15.00"));
    }

    #[test]
    fn test_initial_state_product_with_variants() {
        let result = extract(
            r#"<script>
            window.__INITIAL_STATE__ = {"page": {"product": {
                "title": "Tee", "sku": "TEE-1", "vendor": "Acme",
                "variants": [
                    {"title": "Small", "option1": "S", "price": 2500, "available": true},
                    {"title": "Large", "option1": "L", "price": 2700, "available": false}
                ]
            }}};
            </script>"#,
        );

        assert_eq!(result.sku.as_deref(), Some("TEE-1"));
        assert_eq!(result.brand.as_deref(), Some("Acme"));
        assert_eq!(result.variants.len(), 2);
        assert_eq!(result.variants[0].value, "S");
        assert_eq!(result.variants[1].available, Some(false));

        let offer = result.offer.unwrap();
        assert_eq!(offer.price.as_deref(), Some("25.00"));
        assert_eq!(offer.availability.as_deref(), Some("https://schema.org/InStock"));
        assert_eq!(offer.currency, None);
    }

    #[test]
    fn test_relaxed_product_literal() {
        let result = extract(
            r#"<script>
            var product = {id: 991, name: 'Mug', price: 12.5, currency: 'EUR', productId: 'MUG-7',};
            </script>"#,
        );

        assert_eq!(result.sku.as_deref(), Some("MUG-7"));
        let offer = result.offer.unwrap();
        assert_eq!(offer.price.as_deref(), Some("12.50"));
        assert_eq!(offer.currency.as_deref(), Some("EUR"));
        assert_eq!(offer.availability, None);
    }

    #[test]
    fn test_bare_id_is_not_a_sku() {
        let result = extract(r#"<script>window.product = {"id": 123, "title": "Thing"};</script>"#);
        assert_eq!(result.sku, None);
    }

    #[test]
    fn test_failed_pattern_does_not_block_others() {
        let result = extract(
            r#"<script>
            window.__INITIAL_STATE__ = {"broken": someFunction()};
            ShopifyAnalytics.meta = {"product": {"id": 1, "vendor": "Gizmo", "variants": [{"name": "Blue", "price": 45}]}};
            </script>"#,
        );

        assert_eq!(result.brand.as_deref(), Some("Gizmo"));
        assert_eq!(result.variants.len(), 1);
        assert_eq!(result.offer.unwrap().price.as_deref(), Some("45.00"));
    }

    #[test]
    fn test_next_data_script() {
        let result = extract(
            r#"<script id="__NEXT_DATA__" type="application/json">
            {"props": {"pageProps": {"product": {"name": "Lamp", "sku": "L-1", "price": "89.00"}}}}
            </script>"#,
        );

        assert_eq!(result.sku.as_deref(), Some("L-1"));
        assert_eq!(result.offer.unwrap().price.as_deref(), Some("89.00"));
    }

    #[test]
    fn test_meta_object_requires_product_key() {
        let result = extract(r#"<script>var meta = {"page": {"pageType": "home"}};</script>"#);
        assert!(result.is_empty());
    }

    #[test]
    fn test_ld_json_scripts_ignored() {
        let result = extract(
            r#"<script type="application/ld+json">{"@type": "Product", "sku": "LD"}</script>"#,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_variant_cap() {
        let variants: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"title": "V{i}", "price": 10}}"#))
            .collect();
        let html = format!(
            r#"<script>window.product = {{"title": "Many", "variants": [{}]}};</script>"#,
            variants.join(",")
        );
        assert_eq!(extract(&html).variants.len(), 10);
    }

    #[test]
    fn test_unparsable_price_reports_no_offer() {
        let result = extract(r#"<script>window.product = {"title": "Mug", "price": "N/A", "available": true};</script>"#);
        assert_eq!(result.offer, None);
    }

    #[test]
    fn test_product_id_key_is_a_sku() {
        let result = extract(r#"<script>var product = {"id": 7, "product_id": "MUG-9", "price": 1200};</script>"#);
        assert_eq!(result.sku.as_deref(), Some("MUG-9"));
    }
}
