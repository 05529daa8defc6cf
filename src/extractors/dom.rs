//! Visible-markup layer
//!
//! Reads only generically named attributes and classes. Script and
//! structured-data content is never inspected here.

use super::css::{self, attr, element_text};
use super::{Layer, LayerExtractor, LayerResult, Page};
use crate::product::{parse_price_text, schema_availability, Offer, Variant};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static PRICE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "[itemprop='price']",
        "[data-price]",
        "[data-product-price]",
        ".price",
        ".product-price",
        ".current-price",
        ".sale-price",
        "[class*='price']",
    ])
});

static CURRENCY_SELECTOR: LazyLock<Vec<Selector>> =
    LazyLock::new(|| css::compile(&["[itemprop='priceCurrency']"]));

static AVAILABILITY_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "[itemprop='availability']",
        "[data-availability]",
        ".availability",
        ".stock-status",
        ".in-stock",
        ".out-of-stock",
    ])
});

static VARIANT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "select[name*='option'] option",
        "[data-option-index] option",
        ".variant-option",
        ".swatch-element",
        "[data-value]",
    ])
});

static DELIVERY_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "[class*='shipping']",
        "[class*='delivery']",
        "[data-shipping]",
        ".shipping-info",
        ".delivery-info",
    ])
});

static IMAGE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "img[itemprop='image']",
        "[itemprop='image'][content]",
        "[class*='product-image'] img",
        "[class*='product-gallery'] img",
        "img[class*='product-image']",
    ])
});

static SKU_SELECTOR: LazyLock<Vec<Selector>> = LazyLock::new(|| css::compile(&["[itemprop='sku']"]));
static MPN_SELECTOR: LazyLock<Vec<Selector>> = LazyLock::new(|| css::compile(&["[itemprop='mpn']"]));
static BRAND_SELECTOR: LazyLock<Vec<Selector>> =
    LazyLock::new(|| css::compile(&["[itemprop='brand'] [itemprop='name']", "[itemprop='brand']"]));

const PLACEHOLDER_OPTIONS: &[&str] = &["choose an option", "select", "select an option", "pick one"];

/// Lowest-trust layer over the visible page
#[derive(Debug, Default, Clone, Copy)]
pub struct DomExtractor;

impl LayerExtractor for DomExtractor {
    fn layer(&self) -> Layer {
        Layer::Dom
    }

    fn extract(&self, page: &Page<'_>) -> LayerResult {
        let document = page.document;

        let (price, printed_currency) = match extract_price(document) {
            Some((price, currency)) => (Some(price), currency),
            None => (None, None),
        };
        let currency = itemprop_value(document, &CURRENCY_SELECTOR).or(printed_currency);

        let offer = Offer {
            price,
            currency,
            availability: extract_availability(document),
            ..Offer::default()
        }
        .non_empty();

        let images = IMAGE_SELECTORS
            .iter()
            .flat_map(|sel| document.select(sel))
            .filter_map(|el| attr(&el, "content").or_else(|| attr(&el, "src")).or_else(|| attr(&el, "data-src")))
            .filter_map(|src| css::resolve_url(page.base_url, &src))
            .fold(Vec::new(), |mut acc, url| {
                if !acc.contains(&url) {
                    acc.push(url);
                }
                acc
            })
            .into_iter()
            .take(page.limits.images)
            .collect();

        let result = LayerResult {
            sku: itemprop_value(document, &SKU_SELECTOR),
            mpn: itemprop_value(document, &MPN_SELECTOR),
            brand: itemprop_value(document, &BRAND_SELECTOR),
            offer,
            rating: None,
            images,
            variants: extract_variants(document, page.limits.variants),
            delivery_text: extract_delivery_text(document, page.limits.delivery_text_chars),
        };

        tracing::debug!(
            target: "schema_synth::extract",
            layer = %Layer::Dom,
            found = !result.is_empty(),
            "layer extracted"
        );

        result
    }
}

/// Value of a microdata-style element: `content` attribute first, then text
fn itemprop_value(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors
        .iter()
        .flat_map(|sel| document.select(sel))
        .find_map(|el| attr(&el, "content").or_else(|| non_empty(element_text(&el))))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn extract_price(document: &Html) -> Option<(String, Option<String>)> {
    PRICE_SELECTORS
        .iter()
        .flat_map(|sel| document.select(sel))
        .find_map(|el| {
            let raw = attr(&el, "content")
                .or_else(|| attr(&el, "data-price"))
                .or_else(|| attr(&el, "data-product-price"))
                .or_else(|| non_empty(element_text(&el)))?;
            parse_price_text(&raw)
        })
}

fn extract_availability(document: &Html) -> Option<String> {
    let token = AVAILABILITY_SELECTORS
        .iter()
        .filter_map(|sel| document.select(sel).next())
        .find_map(|el| availability_token(&el))?;
    schema_availability(token)
}

fn availability_token(el: &ElementRef) -> Option<&'static str> {
    // Machine-readable hints before visible text
    for hint in [attr(el, "href"), attr(el, "content"), attr(el, "data-availability")]
        .into_iter()
        .flatten()
    {
        let hint = hint.to_lowercase();
        if hint.contains("outofstock") {
            return Some("OutOfStock");
        }
        if hint.contains("preorder") {
            return Some("PreOrder");
        }
        if hint.contains("instock") {
            return Some("InStock");
        }
    }

    // Negative phrases contain the positive ones ("unavailable")
    let text = element_text(el).to_lowercase();
    if ["out of stock", "sold out", "unavailable"].iter().any(|p| text.contains(p)) {
        Some("OutOfStock")
    } else if text.contains("pre-order") || text.contains("preorder") {
        Some("PreOrder")
    } else if text.contains("in stock") || text.contains("available") {
        Some("InStock")
    } else {
        None
    }
}

/// Options of the first selector that yields any
fn extract_variants(document: &Html, cap: usize) -> Vec<Variant> {
    for sel in VARIANT_SELECTORS.iter() {
        let variants: Vec<Variant> = document
            .select(sel)
            .filter_map(|el| {
                let label = element_text(&el);
                let value = attr(&el, "value")
                    .or_else(|| attr(&el, "data-value"))
                    .or_else(|| non_empty(label.clone()))?;
                if PLACEHOLDER_OPTIONS.contains(&value.to_lowercase().as_str()) {
                    return None;
                }
                Some(Variant {
                    name: if label.is_empty() { value.clone() } else { label },
                    value,
                    price: None,
                    sku: attr(&el, "data-sku"),
                    available: Some(el.value().attr("disabled").is_none()),
                })
            })
            .take(cap)
            .collect();

        if !variants.is_empty() {
            return variants;
        }
    }

    Vec::new()
}

fn extract_delivery_text(document: &Html, max_chars: usize) -> Option<String> {
    DELIVERY_SELECTORS
        .iter()
        .filter_map(|sel| document.select(sel).next())
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty() && text.chars().count() < max_chars)
}
