//! WordPress REST normalizer
//!
//! Maps a post or page object as returned by `/wp-json/wp/v2/...` (with
//! `_embed`) onto [`NormalizedContent`]. The object is fetched elsewhere;
//! this module does no I/O.

use crate::classify::{classify, StructuralSignals};
use crate::config::Limits;
use crate::content::{FaqItem, NormalizedContent, SourceKind};
use crate::error::{Error, Result};
use crate::extractors::css::{collapse_whitespace, element_text};
use crate::extractors::page::{extract_headings, extract_images};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

static QUESTION_HEADINGS: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("h2, h3, h4").ok());

/// Normalize one REST post or page object
pub fn normalize_post(url: &str, post: &Value, authenticated: bool, limits: &Limits) -> Result<NormalizedContent> {
    let base = Url::parse(url).map_err(|source| Error::InvalidBaseUrl {
        url: url.to_string(),
        source,
    })?;

    let title = rendered(post, "title").map(|t| html_text(&t)).filter(|t| !t.is_empty());
    let description = rendered(post, "excerpt")
        .map(|e| html_text(&e))
        .filter(|e| !e.is_empty());

    let body_html = rendered(post, "content").unwrap_or_default();
    let fragment = Html::parse_fragment(&body_html);
    let body: String = collapse_whitespace(&fragment.root_element().text().collect::<String>())
        .chars()
        .take(limits.body_chars)
        .collect();

    // A WordPress post is a blog posting whatever its URL looks like
    let signals = match post.get("type").and_then(Value::as_str) {
        Some("post") => StructuralSignals {
            article_data: true,
            blog_posting_data: true,
            ..StructuralSignals::default()
        },
        _ => StructuralSignals::default(),
    };

    let mut content = NormalizedContent {
        url: url.to_string(),
        title,
        description,
        confidence: if body.is_empty() { 0.7 } else { 0.9 },
        body: (!body.is_empty()).then_some(body),
        headings: extract_headings(&fragment),
        images: extract_images(&fragment, &base, limits.images),
        faq: extract_faq(&fragment, limits.faq_items),
        source: if authenticated {
            SourceKind::WordpressRestAuthenticated
        } else {
            SourceKind::WordpressRest
        },
        author: post
            .pointer("/_embedded/author/0/name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from),
        published_date: string_field(post, "date"),
        modified_date: string_field(post, "modified"),
        canonical_url: string_field(post, "link"),
        ..NormalizedContent::default()
    };
    content.category = classify(&content, &signals);

    let caps = content.capabilities();
    tracing::info!(
        target: "schema_synth::extract",
        url = %content.url,
        source = ?content.source,
        category = ?content.category,
        confidence = content.confidence,
        missing = ?caps.missing(),
        "wordpress content normalized"
    );

    Ok(content)
}

/// `field.rendered`, or the field itself when the API returned a bare string
fn rendered(post: &Value, field: &str) -> Option<String> {
    match post.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("rendered").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

fn string_field(post: &Value, field: &str) -> Option<String> {
    post.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Rendered HTML to plain text, entities decoded
fn html_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    collapse_whitespace(&fragment.root_element().text().collect::<String>())
}

/// Question headings answered by the next paragraph or block
fn extract_faq(fragment: &Html, cap: usize) -> Vec<FaqItem> {
    let Some(selector) = QUESTION_HEADINGS.as_ref() else {
        return Vec::new();
    };

    fragment
        .select(selector)
        .filter_map(|heading| {
            let question = element_text(&heading);
            if !question.ends_with('?') {
                return None;
            }
            let answer = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|el| matches!(el.value().name(), "p" | "div"))
                .map(|el| element_text(&el))
                .filter(|a| !a.is_empty())?;
            Some(FaqItem { question, answer })
        })
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentCategory;
    use serde_json::json;

    fn sample_post() -> Value {
        json!({
            "id": 42,
            "type": "post",
            "link": "https://blog.example.com/2024/05/hello-world/",
            "date": "2024-05-01T09:30:00",
            "modified": "2024-05-03T12:00:00",
            "title": {"rendered": "Hello &#8211; World"},
            "excerpt": {"rendered": "<p>A short <em>intro</em>.</p>\n"},
            "content": {"rendered": "<h2>Setup</h2><p>Install it.</p><img src=\"/wp-content/uploads/a.png\" alt=\"Diagram\" width=\"640\"><h3>Does it work?</h3><p>Yes.</p>"},
            "_embedded": {"author": [{"id": 1, "name": "Jane Writer"}]}
        })
    }

    #[test]
    fn test_normalize_post() {
        let content = normalize_post(
            "https://blog.example.com/2024/05/hello-world/",
            &sample_post(),
            false,
            &Limits::default(),
        )
        .unwrap();

        assert_eq!(content.title.as_deref(), Some("Hello \u{2013} World"));
        assert_eq!(content.description.as_deref(), Some("A short intro."));
        assert_eq!(content.category, ContentCategory::BlogPost);
        assert_eq!(content.source, SourceKind::WordpressRest);
        assert_eq!(content.author.as_deref(), Some("Jane Writer"));
        assert_eq!(content.published_date.as_deref(), Some("2024-05-01T09:30:00"));
        assert_eq!(content.modified_date.as_deref(), Some("2024-05-03T12:00:00"));
        assert_eq!(content.headings.len(), 2);
        assert_eq!(content.images[0].src, "https://blog.example.com/wp-content/uploads/a.png");
        assert_eq!(content.images[0].width, Some(640));
        assert_eq!(content.faq.len(), 1);
        assert_eq!(content.faq[0].answer, "Yes.");
        assert!(content.body.as_deref().unwrap().starts_with("Setup Install it."));
        assert!((content.confidence - 0.9).abs() < f64::EPSILON);
        assert!(content.product_sources.is_empty());
    }

    #[test]
    fn test_authenticated_page_without_body() {
        let page = json!({
            "type": "page",
            "title": {"rendered": "Our Services"},
            "content": {"rendered": ""}
        });
        let content = normalize_post("https://example.com/services/cleaning/", &page, true, &Limits::default()).unwrap();

        assert_eq!(content.source, SourceKind::WordpressRestAuthenticated);
        assert_eq!(content.category, ContentCategory::Service);
        assert_eq!(content.body, None);
        assert!((content.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bare_string_title_and_missing_fields() {
        let page = json!({"type": "page", "title": "About"});
        let content = normalize_post("https://example.com/about", &page, false, &Limits::default()).unwrap();

        assert_eq!(content.title.as_deref(), Some("About"));
        assert_eq!(content.category, ContentCategory::Unknown);
        assert_eq!(content.author, None);
        assert_eq!(content.published_date, None);
    }

    #[test]
    fn test_synthesizes_like_scraped_content() {
        let content = normalize_post(
            "https://blog.example.com/2024/05/hello-world/",
            &sample_post(),
            false,
            &Limits::default(),
        )
        .unwrap();
        let docs = crate::synth::synthesize(&content);

        assert_eq!(docs[0]["@type"], "BlogPosting");
        assert_eq!(docs[0]["author"]["name"], "Jane Writer");
        assert_eq!(docs[0]["datePublished"], "2024-05-01T09:30:00");
    }

    #[test]
    fn test_pages_use_the_shared_classifier() {
        let faq_page = json!({
            "type": "page",
            "title": {"rendered": "Help"},
            "content": {"rendered": "<h2>Do you ship?</h2><p>Yes.</p><h2>Can I return?</h2><p>Within 30 days.</p><h2>Is it warm?</h2><p>Very.</p>"}
        });
        let content = normalize_post("https://example.com/help", &faq_page, false, &Limits::default()).unwrap();
        assert_eq!(content.category, ContentCategory::Faq);

        // A title alone does not make a service page
        let titled = json!({"type": "page", "title": {"rendered": "Customer Services"}});
        let content = normalize_post("https://example.com/contact", &titled, false, &Limits::default()).unwrap();
        assert_eq!(content.category, ContentCategory::Unknown);
    }

    #[test]
    fn test_invalid_url() {
        let err = normalize_post("relative/path", &sample_post(), false, &Limits::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }
}
