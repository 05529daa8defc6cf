//! Content-type classification
//!
//! A fixed-order decision list, first match wins. Structural signals are
//! checked before heading heuristics, which are checked before bare URL
//! patterns within each step.

use crate::content::{ContentCategory, Heading, NormalizedContent};
use crate::extractors::metadata::MetaTags;
use crate::graph::GraphIndex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static ARTICLE_ELEMENT: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("article").ok());

const LOCAL_BUSINESS_TYPES: &[&str] = &[
    "LocalBusiness",
    "Restaurant",
    "FoodEstablishment",
    "Store",
    "ProfessionalService",
    "MedicalBusiness",
    "Dentist",
    "LegalService",
    "AutoRepair",
    "HomeAndConstructionBusiness",
];

const PRODUCT_URL_PATTERNS: &[&str] = &["/product", "/shop/"];
const ARTICLE_URL_PATTERNS: &[&str] = &["/blog", "/post", "/news/", "/article", "/story/"];
const BLOG_URL_PATTERNS: &[&str] = &["/blog", "/post"];

/// Site-chrome phrases that mention service without offering one
const NON_OFFERING_PHRASES: &[&str] = &["customer service", "terms of service", "service status"];

/// Document structure seen by the classifier. Records produced without a
/// document (CMS sources) use the empty default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralSignals {
    pub product_data: bool,
    pub article_element: bool,
    pub article_meta: bool,
    pub article_data: bool,
    pub blog_posting_data: bool,
    pub local_business_data: bool,
}

impl StructuralSignals {
    pub fn collect(document: &Html, graph: &GraphIndex, meta: &MetaTags) -> Self {
        Self {
            product_data: graph.has_type("Product"),
            article_element: ARTICLE_ELEMENT.iter().any(|s| document.select(s).next().is_some()),
            article_meta: meta.get("article:published_time").is_some()
                || meta.get("article:modified_time").is_some()
                || meta.get("article:author").is_some()
                || meta.get("og:type").is_some_and(|t| t.eq_ignore_ascii_case("article")),
            article_data: ["Article", "NewsArticle", "BlogPosting"]
                .iter()
                .any(|t| graph.has_type(t)),
            blog_posting_data: graph.has_type("BlogPosting"),
            local_business_data: LOCAL_BUSINESS_TYPES.iter().any(|t| graph.has_type(t)),
        }
    }
}

/// Assign one category to the record
pub fn classify(content: &NormalizedContent, signals: &StructuralSignals) -> ContentCategory {
    let (category, reason) = decide(content, signals);

    tracing::info!(
        target: "schema_synth::classify",
        url = %content.url,
        category = ?category,
        reason,
        "content classified"
    );

    category
}

fn decide(content: &NormalizedContent, signals: &StructuralSignals) -> (ContentCategory, &'static str) {
    let path = url_path(&content.url);
    let path_has = |patterns: &[&str]| patterns.iter().any(|p| path.contains(p));

    if signals.product_data {
        return (ContentCategory::Product, "product_structured_data");
    }
    if path_has(PRODUCT_URL_PATTERNS) {
        return (ContentCategory::Product, "product_url");
    }

    let article_reason = if signals.article_element {
        Some("article_element")
    } else if signals.article_meta {
        Some("article_meta")
    } else if signals.article_data {
        Some("article_structured_data")
    } else if path_has(ARTICLE_URL_PATTERNS) {
        Some("article_url")
    } else {
        None
    };
    if let Some(reason) = article_reason {
        let category = if signals.blog_posting_data || path_has(BLOG_URL_PATTERNS) {
            ContentCategory::BlogPost
        } else {
            ContentCategory::Article
        };
        return (category, reason);
    }

    if content.headings.iter().any(is_service_heading) {
        return (ContentCategory::Service, "service_heading");
    }
    if path.contains("/service") {
        return (ContentCategory::Service, "service_url");
    }

    if content.faq.len() >= 3 {
        return (ContentCategory::Faq, "faq_pairs");
    }

    if signals.local_business_data {
        return (ContentCategory::LocalBusiness, "local_business_structured_data");
    }

    (ContentCategory::Unknown, "no_signal")
}

/// Page title heading naming a service as a whole word
fn is_service_heading(heading: &Heading) -> bool {
    if heading.level != 1 {
        return false;
    }
    let text = heading.text.to_lowercase();
    if NON_OFFERING_PHRASES.iter().any(|p| text.contains(p)) {
        return false;
    }
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| word == "service" || word == "services")
}

fn url_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FaqItem;

    fn record(url: &str) -> NormalizedContent {
        NormalizedContent {
            url: url.to_string(),
            ..NormalizedContent::default()
        }
    }

    fn signals_of(html: &str) -> StructuralSignals {
        let document = Html::parse_document(html);
        let graph = GraphIndex::from_document(&document);
        let meta = MetaTags::from_document(&document);
        StructuralSignals::collect(&document, &graph, &meta)
    }

    #[test]
    fn test_product_data_outranks_everything() {
        let signals = signals_of(
            r#"<article><script type="application/ld+json">{"@type": "Product"}</script></article>"#,
        );
        assert_eq!(
            classify(&record("https://example.com/blog/review"), &signals),
            ContentCategory::Product
        );
    }

    #[test]
    fn test_product_url() {
        let signals = StructuralSignals::default();
        assert_eq!(classify(&record("https://example.com/products/tee"), &signals), ContentCategory::Product);
        assert_eq!(classify(&record("https://example.com/shop/mug"), &signals), ContentCategory::Product);
    }

    #[test]
    fn test_article_versus_blog_post() {
        let signals = signals_of("<article><p>Text</p></article>");
        assert_eq!(
            classify(&record("https://example.com/news/2024/story"), &signals),
            ContentCategory::Article
        );
        assert_eq!(
            classify(&record("https://example.com/blog/hello"), &signals),
            ContentCategory::BlogPost
        );

        let signals = signals_of(r#"<script type="application/ld+json">{"@type": "BlogPosting"}</script>"#);
        assert_eq!(classify(&record("https://example.com/hello"), &signals), ContentCategory::BlogPost);

        let signals = signals_of(r#"<meta property="og:type" content="article">"#);
        assert_eq!(classify(&record("https://example.com/hello"), &signals), ContentCategory::Article);

        // URL alone is enough
        assert_eq!(
            classify(&record("https://example.com/posts/1"), &StructuralSignals::default()),
            ContentCategory::BlogPost
        );
    }

    #[test]
    fn test_service_from_heading_or_url() {
        let mut content = record("https://example.com/what-we-do");
        content.headings.push(Heading {
            level: 1,
            text: "Our Cleaning Services".to_string(),
        });
        assert_eq!(classify(&content, &StructuralSignals::default()), ContentCategory::Service);

        assert_eq!(
            classify(&record("https://example.com/services/repair"), &StructuralSignals::default()),
            ContentCategory::Service
        );
    }

    #[test]
    fn test_site_chrome_headings_are_not_services() {
        let heading = |level, text: &str| Heading {
            level,
            text: text.to_string(),
        };
        let mut content = record("https://example.com/about-us");
        content.headings = vec![
            heading(2, "Customer Service"),
            heading(1, "Terms of Service"),
            heading(2, "Our Services"),
            heading(1, "Serviceable parts catalogue"),
        ];
        assert_eq!(classify(&content, &StructuralSignals::default()), ContentCategory::Unknown);

        content.headings.push(heading(1, "Plumbing services"));
        assert_eq!(classify(&content, &StructuralSignals::default()), ContentCategory::Service);
    }

    #[test]
    fn test_faq_threshold() {
        let pair = FaqItem {
            question: "Q?".to_string(),
            answer: "A.".to_string(),
        };
        let mut content = record("https://example.com/help");
        content.faq = vec![pair.clone(), pair.clone()];
        assert_eq!(classify(&content, &StructuralSignals::default()), ContentCategory::Unknown);

        content.faq.push(pair);
        assert_eq!(classify(&content, &StructuralSignals::default()), ContentCategory::Faq);
    }

    #[test]
    fn test_local_business_and_fallback() {
        let signals = signals_of(r#"<script type="application/ld+json">{"@type": "Restaurant", "name": "Diner"}</script>"#);
        assert_eq!(classify(&record("https://example.com/"), &signals), ContentCategory::LocalBusiness);
        assert_eq!(
            classify(&record("https://example.com/"), &StructuralSignals::default()),
            ContentCategory::Unknown
        );
    }
}
