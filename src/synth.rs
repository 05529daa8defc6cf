//! Schema.org JSON-LD synthesis
//!
//! A pure mapping from a normalized record to JSON-LD documents. Optional
//! properties are emitted only when the matching capability holds; nothing
//! is defaulted or inferred. Object keys are sorted, so equal records always
//! serialize to identical bytes.

use crate::config::Limits;
use crate::content::{Capabilities, ContentCategory, NormalizedContent};
use crate::product::SCHEMA_ORG;
use serde_json::{json, Map, Value};

/// Synthesize with the default text limits
pub fn synthesize(content: &NormalizedContent) -> Vec<Value> {
    synthesize_with(content, &Limits::default())
}

/// Primary document for the record's category, then FAQPage, BreadcrumbList
/// and Organization when their data is present.
pub fn synthesize_with(content: &NormalizedContent, limits: &Limits) -> Vec<Value> {
    let caps = content.capabilities();
    let mut documents = vec![primary_document(content, &caps, limits)];

    if let Some(faq) = faq_page(content) {
        documents.push(faq);
    }
    if let Some(breadcrumbs) = breadcrumb_list(content) {
        documents.push(breadcrumbs);
    }
    if caps.has_organization {
        documents.push(organization_body(content, Doc::new("Organization")));
    }

    let types: Vec<&str> = documents
        .iter()
        .filter_map(|d| d.get("@type").and_then(Value::as_str))
        .collect();
    tracing::info!(
        target: "schema_synth::synth",
        url = %content.url,
        category = ?content.category,
        documents = documents.len(),
        types = ?types,
        capabilities = ?caps.available(),
        "schema synthesized"
    );

    documents
}

/// Render documents as one `<script type="application/ld+json">` tag.
/// A single document is emitted as an object, several as an array.
pub fn to_script_tag(documents: &[Value]) -> serde_json::Result<String> {
    let json = match documents {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    // Keep "</script>" inside string values from closing the tag
    let json = json.replace("</", "<\\/");
    Ok(format!("<script type=\"application/ld+json\">\n{json}\n</script>"))
}

/// JSON-LD object builder that skips absent values
struct Doc(Map<String, Value>);

impl Doc {
    fn new(schema_type: &str) -> Self {
        let mut map = Map::new();
        map.insert("@context".to_string(), Value::String(SCHEMA_ORG.to_string()));
        map.insert("@type".to_string(), Value::String(schema_type.to_string()));
        Doc(map)
    }

    /// Nested object without `@context`
    fn nested(schema_type: &str) -> Self {
        let mut map = Map::new();
        map.insert("@type".to_string(), Value::String(schema_type.to_string()));
        Doc(map)
    }

    fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    fn set_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    fn build(self) -> Value {
        Value::Object(self.0)
    }
}

fn primary_document(content: &NormalizedContent, caps: &Capabilities, limits: &Limits) -> Value {
    match content.category {
        ContentCategory::Product => product(content, caps, limits),
        ContentCategory::Article => article("Article", content, caps, limits),
        ContentCategory::BlogPost => article("BlogPosting", content, caps, limits),
        ContentCategory::Service => service(content, caps, limits),
        ContentCategory::Faq | ContentCategory::LocalBusiness | ContentCategory::Unknown => {
            web_page(content, limits)
        }
    }
}

fn description(content: &NormalizedContent, limits: &Limits) -> Option<String> {
    content
        .description
        .as_deref()
        .map(|d| truncate(d, limits.description_chars))
}

fn page_url(content: &NormalizedContent) -> Option<String> {
    (!content.url.is_empty()).then(|| content.url.clone())
}

fn product(content: &NormalizedContent, caps: &Capabilities, limits: &Limits) -> Value {
    let data = &content.product;

    let image = if caps.has_product_images {
        match data.images.as_slice() {
            [single] => Some(Value::String(single.clone())),
            many => Some(json!(many)),
        }
    } else {
        content
            .images
            .first()
            .map(|img| img.src.clone())
            .or_else(|| content.og_image.clone())
            .map(Value::String)
    };

    let brand = data
        .brand
        .as_ref()
        .filter(|_| caps.has_brand)
        .map(|name| Doc::nested("Brand").set("name", name.as_str()).build());

    let offers = data.offer.as_ref().filter(|_| caps.has_price).map(|offer| {
        Doc::nested("Offer")
            .set_opt("price", offer.price.clone())
            .set_opt("priceCurrency", offer.currency.clone().filter(|_| caps.has_currency))
            .set_opt("availability", offer.availability.clone().filter(|_| caps.has_availability))
            .set_opt(
                "priceValidUntil",
                offer.price_valid_until.clone().filter(|_| caps.has_price_valid_until),
            )
            .set_opt(
                "seller",
                offer
                    .seller_name
                    .as_ref()
                    .filter(|_| caps.has_seller)
                    .map(|name| Doc::nested("Organization").set("name", name.as_str()).build()),
            )
            .build()
    });

    let rating = data.rating.as_ref().filter(|_| caps.has_rating).map(|rating| {
        Doc::nested("AggregateRating")
            .set_opt("ratingValue", rating.rating_value)
            .set_opt("reviewCount", rating.review_count.filter(|_| caps.has_reviews))
            .set_opt("ratingCount", rating.rating_count.filter(|_| caps.has_rating_count))
            .set_opt("bestRating", rating.best_rating)
            .set_opt("worstRating", rating.worst_rating)
            .build()
    });

    Doc::new("Product")
        .set_opt("name", content.title.clone())
        .set_opt("description", description(content, limits))
        .set_opt("image", image)
        .set_opt("url", page_url(content))
        .set_opt("brand", brand)
        .set_opt("sku", data.sku.clone().filter(|_| caps.has_sku))
        .set_opt("mpn", data.mpn.clone().filter(|_| caps.has_mpn))
        .set_opt("offers", offers)
        .set_opt("aggregateRating", rating)
        .build()
}

fn article(schema_type: &str, content: &NormalizedContent, caps: &Capabilities, limits: &Limits) -> Value {
    let image = content
        .og_image
        .clone()
        .or_else(|| content.images.first().map(|img| img.src.clone()));

    let publisher = content
        .organization_name
        .as_ref()
        .filter(|_| caps.has_organization)
        .map(|name| {
            Doc::nested("Organization")
                .set("name", name.as_str())
                .set_opt(
                    "logo",
                    content
                        .organization_logo
                        .as_ref()
                        .map(|logo| Doc::nested("ImageObject").set("url", logo.as_str()).build()),
                )
                .build()
        });

    Doc::new(schema_type)
        .set_opt(
            "headline",
            content.title.as_deref().map(|t| truncate(t, limits.headline_chars)),
        )
        .set_opt("description", description(content, limits))
        .set_opt("image", image)
        .set_opt(
            "author",
            content
                .author
                .as_ref()
                .map(|name| Doc::nested("Person").set("name", name.as_str()).build()),
        )
        .set_opt("datePublished", content.published_date.clone())
        .set_opt("dateModified", content.modified_date.clone())
        .set_opt("mainEntityOfPage", page_url(content))
        .set_opt("publisher", publisher)
        .set_opt("inLanguage", content.language.clone())
        .build()
}

fn service(content: &NormalizedContent, caps: &Capabilities, limits: &Limits) -> Value {
    let provider = caps.has_organization.then(|| organization_body(content, Doc::nested("Organization")));

    Doc::new("Service")
        .set_opt("name", content.title.clone())
        .set_opt("description", description(content, limits))
        .set_opt("provider", provider)
        .set_opt("url", page_url(content))
        .build()
}

fn web_page(content: &NormalizedContent, limits: &Limits) -> Value {
    Doc::new("WebPage")
        .set_opt("name", content.title.clone())
        .set_opt("description", description(content, limits))
        .set_opt("url", page_url(content))
        .set_opt("inLanguage", content.language.clone())
        .build()
}

fn faq_page(content: &NormalizedContent) -> Option<Value> {
    let questions: Vec<Value> = content
        .faq
        .iter()
        .filter(|item| !item.question.trim().is_empty() && !item.answer.trim().is_empty())
        .map(|item| {
            Doc::nested("Question")
                .set("name", item.question.as_str())
                .set(
                    "acceptedAnswer",
                    Doc::nested("Answer").set("text", item.answer.as_str()).build(),
                )
                .build()
        })
        .collect();

    (questions.len() >= 2).then(|| Doc::new("FAQPage").set("mainEntity", questions).build())
}

fn breadcrumb_list(content: &NormalizedContent) -> Option<Value> {
    if content.breadcrumbs.len() < 2 {
        return None;
    }

    let items: Vec<Value> = content
        .breadcrumbs
        .iter()
        .map(|crumb| {
            Doc::nested("ListItem")
                .set("position", crumb.position)
                .set("name", crumb.name.as_str())
                .set_opt("item", crumb.url.clone())
                .build()
        })
        .collect();

    Some(Doc::new("BreadcrumbList").set("itemListElement", items).build())
}

fn organization_body(content: &NormalizedContent, doc: Doc) -> Value {
    doc.set_opt("name", content.organization_name.clone())
        .set_opt("url", root_url(&content.url))
        .set_opt("logo", content.organization_logo.clone())
        .build()
}

/// `scheme://host[:port]` of a page URL
fn root_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}

/// Cut to at most `max` characters, the last three being "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
