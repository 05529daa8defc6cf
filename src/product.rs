//! Product value types shared by the extraction layers and the content model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// schema.org namespace used for availability values and `@context`
pub const SCHEMA_ORG: &str = "https://schema.org";

static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.,]*").expect("static regex"));

static CURRENCY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(USD|EUR|GBP|JPY|CAD|AUD|INR|CHF|SEK|NOK|DKK|PLN|NZD|RUB)\b")
        .expect("static regex")
});

// Multi-character symbols first so "A$" is not read as "$"
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("US$", "USD"),
    ("A$", "AUD"),
    ("C$", "CAD"),
    ("NZ$", "NZD"),
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₽", "RUB"),
];

/// Price and availability of a product
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Offer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Always a schema.org URI, e.g. `https://schema.org/InStock`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
}

impl Offer {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.currency.is_none()
            && self.availability.is_none()
            && self.price_valid_until.is_none()
            && self.seller_name.is_none()
    }

    /// `None` when nothing was observed
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    /// `None` unless a nonzero price was observed.
    /// Layers above the DOM report offers only through this.
    pub fn priced(self) -> Option<Self> {
        self.price.as_deref().is_some_and(is_nonzero_price).then_some(self)
    }
}

/// Zero-valued prices carry no offer; non-numeric text is kept as observed
pub fn is_nonzero_price(price: &str) -> bool {
    match price.trim().parse::<f64>() {
        Ok(n) => n != 0.0,
        Err(_) => !price.trim().is_empty(),
    }
}

/// Aggregate rating; every subfield is only set when observed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_rating: Option<f64>,
}

impl Rating {
    pub fn is_empty(&self) -> bool {
        self.rating_value.is_none()
            && self.review_count.is_none()
            && self.rating_count.is_none()
            && self.best_rating.is_none()
            && self.worst_rating.is_none()
    }

    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// Product variant option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Product fields of a normalized record, without provenance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductData {
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
    pub variants: Vec<Variant>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_text: Option<String>,
}

/// Qualify an availability token with the schema.org namespace.
///
/// Values that already are schema.org URIs pass through unchanged.
pub fn schema_availability(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("https://schema.org/") || trimmed.starts_with("http://schema.org/") {
        return Some(trimmed.to_string());
    }
    Some(format!("{SCHEMA_ORG}/{trimmed}"))
}

/// Parse visible price text like "$1,299.00" or "12,99 €".
/// Returns the amount with two decimals and the currency if one is printed.
pub fn parse_price_text(text: &str) -> Option<(String, Option<String>)> {
    let m = PRICE_NUMBER.find(text)?;
    let raw = m.as_str().trim_end_matches(['.', ',']);

    let normalized = match (raw.rfind('.'), raw.rfind(',')) {
        // Both present: the later one is the decimal separator
        (Some(dot), Some(comma)) if dot > comma => raw.replace(',', ""),
        (Some(_), Some(_)) => raw.replace('.', "").replace(',', "."),
        (None, Some(comma)) if raw.len() - comma - 1 == 2 => raw.replace(',', "."),
        (None, Some(_)) => raw.replace(',', ""),
        _ => raw.to_string(),
    };

    let amount: f64 = normalized.parse().ok()?;
    Some((format!("{amount:.2}"), detect_currency(text)))
}

/// Currency printed in a price text, by ISO code or symbol
pub fn detect_currency(text: &str) -> Option<String> {
    if let Some(code) = CURRENCY_CODE.find(text) {
        return Some(code.as_str().to_string());
    }
    CURRENCY_SYMBOLS
        .iter()
        .find(|(symbol, _)| text.contains(symbol))
        .map(|(_, code)| code.to_string())
}

/// Format a price coming from script state. Integers above 100 are minor
/// units (cents) as most storefront engines emit them.
pub fn format_state_price(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(int) = n.as_u64() {
                let amount = if int > 100 { int as f64 / 100.0 } else { int as f64 };
                Some(format!("{amount:.2}"))
            } else {
                n.as_f64().map(|f| format!("{f:.2}"))
            }
        }
        serde_json::Value::String(s) => {
            let amount: f64 = s.trim().parse().ok()?;
            Some(format!("{amount:.2}"))
        }
        _ => None,
    }
}
