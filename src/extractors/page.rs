//! Generic page content
//!
//! Title, description, body text, headings, images, FAQ pairs, breadcrumbs
//! and article/organization metadata. Structured data is read from the
//! shared graph index; nothing here re-parses JSON-LD.

use super::css::{self, attr, collapse_whitespace, element_text, resolve_url};
use super::metadata::MetaTags;
use super::Page;
use crate::content::{BreadcrumbItem, FaqItem, Heading, ImageData};
use crate::graph::{FieldValue, StructuredNode};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::io::Cursor;
use std::sync::LazyLock;
use url::Url;

static TITLE: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("title").ok());
static H1: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("h1").ok());
static HEADINGS: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").ok());
static IMG: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("img").ok());
static HTML_ROOT: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("html").ok());
static DL: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("dl").ok());
static DT: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("dt").ok());
static DD: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("dd").ok());
static QUESTION_HEADINGS: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("h2, h3, h4").ok());
static ANCHOR: LazyLock<Option<Selector>> = LazyLock::new(|| Selector::parse("a").ok());
static TIME: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("time[datetime]").ok());

static MAIN_CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "main",
        "article",
        "[class*='content']",
        "[class*='post']",
        "[class*='entry']",
        "body",
    ])
});

static BREADCRUMB_NAV: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "[aria-label*='breadcrumb']",
        "[aria-label*='Breadcrumb']",
        "[class*='breadcrumb']",
        "[class*='Breadcrumb']",
    ])
});

static AUTHOR_MARKUP: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "[itemprop='author'] [itemprop='name']",
        "[itemprop='author']",
        "[rel='author']",
        "address a",
        "address",
        ".author-name",
        ".post-author-name",
        ".byline-name",
        ".article-author-name",
        ".entry-author-name",
        ".author__name",
    ])
});

static LOGO_IMAGES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    css::compile(&[
        "header img[class*='logo']",
        "header img[src*='logo']",
        "header img[src*='brand']",
        "img.site-logo, img.brand-logo, img.company-logo",
        "img[class*='logo']",
    ])
});

static BY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^by\s+").expect("static regex"));
static DATE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b|\b\d{1,2}/\d{1,2}\b").expect("static regex"));
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,;:!?(){}\[\]|·]").expect("static regex"));
static MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(tember)?|oct(ober)?|nov(ember)?|dec(ember)?)\b")
        .expect("static regex")
});

const ARTICLE_TYPES: &[&str] = &["Article", "NewsArticle", "BlogPosting"];
const AUTHOR_VERBS: &[&str] = &[
    "written", "posted", "published", "updated", "edited", "reviewed", "contributed",
];
const AUTHOR_UI_NOISE: &[&str] = &[
    "share", "follow", "subscribe", "comment", "read more", "click", "twitter", "facebook",
    "linkedin", "instagram", "min read", "likes", "views",
];
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "ref", "source", "campaign", "mc_cid", "mc_eid"];

/// Generic attributes of a page, independent of the product layers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub headings: Vec<Heading>,
    pub images: Vec<ImageData>,
    pub faq: Vec<FaqItem>,
    pub breadcrumbs: Vec<BreadcrumbItem>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub modified_date: Option<String>,
    pub language: Option<String>,
    pub canonical_url: Option<String>,
    pub og_image: Option<String>,
    pub organization_name: Option<String>,
    pub organization_logo: Option<String>,
}

/// Extract the generic attributes. `raw` is the markup `page.document` was
/// parsed from.
pub fn extract(page: &Page<'_>, raw: &str, meta: &MetaTags) -> GenericContent {
    let document = page.document;
    let base = page.base_url;

    GenericContent {
        title: meta
            .get("og:title")
            .map(collapse_whitespace)
            .or_else(|| TITLE.as_ref().and_then(|s| css::first_text(document, s)))
            .or_else(|| H1.as_ref().and_then(|s| css::first_text(document, s)))
            .filter(|t| !t.is_empty()),
        description: meta
            .first_of(&["description", "og:description"])
            .map(collapse_whitespace),
        body: extract_body(document, raw, base, page.limits.body_chars),
        headings: extract_headings(document),
        images: extract_images(document, base, page.limits.images),
        faq: extract_faq(page),
        breadcrumbs: extract_breadcrumbs(page),
        author: extract_author(page, meta),
        published_date: structured_date(page, "datePublished")
            .or_else(|| meta.get("article:published_time").map(String::from))
            .or_else(|| TIME.as_ref().and_then(|s| css::first_attr(document, s, "datetime"))),
        modified_date: structured_date(page, "dateModified")
            .or_else(|| meta.get("article:modified_time").map(String::from)),
        language: extract_language(document, meta),
        canonical_url: canonical_url(meta, base),
        og_image: meta
            .first_of(&["og:image", "og:image:url", "twitter:image"])
            .and_then(|src| resolve_url(base, src)),
        organization_name: meta
            .get("og:site_name")
            .map(collapse_whitespace)
            .or_else(|| organization_name(page)),
        organization_logo: extract_logo(page, meta),
    }
}

fn extract_body(document: &Html, raw: &str, base: &Url, cap: usize) -> Option<String> {
    let mut cursor = Cursor::new(raw.as_bytes());
    let readable = readability::extractor::extract(&mut cursor, base)
        .map(|product| collapse_whitespace(&product.text))
        .unwrap_or_default();

    let text = if readable.is_empty() {
        MAIN_CONTENT
            .iter()
            .filter_map(|sel| document.select(sel).next())
            .map(|el| css::visible_text(&el))
            .find(|t| !t.is_empty())
            .unwrap_or_default()
    } else {
        readable
    };

    (!text.is_empty()).then(|| text.chars().take(cap).collect())
}

pub(crate) fn extract_headings(document: &Html) -> Vec<Heading> {
    HEADINGS
        .iter()
        .flat_map(|s| document.select(s))
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            let text = element_text(&el);
            (!text.is_empty()).then_some(Heading { level, text })
        })
        .collect()
}

pub(crate) fn extract_images(document: &Html, base: &Url, cap: usize) -> Vec<ImageData> {
    IMG.iter()
        .flat_map(|s| document.select(s))
        .filter_map(|el| {
            let src = attr(&el, "src").or_else(|| attr(&el, "data-src"))?;
            Some(ImageData {
                src: resolve_url(base, &src)?,
                alt: attr(&el, "alt"),
                width: attr(&el, "width").and_then(|w| w.parse().ok()),
                height: attr(&el, "height").and_then(|h| h.parse().ok()),
            })
        })
        .take(cap)
        .collect()
}

fn extract_faq(page: &Page<'_>) -> Vec<FaqItem> {
    let cap = page.limits.faq_items;

    let structured: Vec<FaqItem> = page
        .graph
        .nodes_of("FAQPage")
        .flat_map(|node| node.get("mainEntity").items())
        .filter_map(|question| {
            let name = question.get("name").as_text()?;
            let answer = question.get("acceptedAnswer").first().get("text").as_text()?;
            Some(FaqItem {
                question: collapse_whitespace(name),
                answer: collapse_whitespace(answer),
            })
        })
        .take(cap)
        .collect();
    if !structured.is_empty() {
        return structured;
    }

    let document = page.document;
    let mut faq = Vec::new();

    for dl in DL.iter().flat_map(|s| document.select(s)) {
        let terms = DT.iter().flat_map(|s| dl.select(s));
        let definitions = DD.iter().flat_map(|s| dl.select(s));
        for (dt, dd) in terms.zip(definitions) {
            let (question, answer) = (element_text(&dt), element_text(&dd));
            if !question.is_empty() && !answer.is_empty() {
                faq.push(FaqItem { question, answer });
            }
        }
    }

    for heading in QUESTION_HEADINGS.iter().flat_map(|s| document.select(s)) {
        let question = element_text(&heading);
        if !question.ends_with('?') {
            continue;
        }
        let answer = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "p")
            .map(|p| element_text(&p))
            .filter(|a| !a.is_empty());
        if let Some(answer) = answer {
            faq.push(FaqItem { question, answer });
        }
    }

    faq.truncate(cap);
    faq
}

fn extract_breadcrumbs(page: &Page<'_>) -> Vec<BreadcrumbItem> {
    for list in page.graph.nodes_of("BreadcrumbList") {
        let crumbs = parse_breadcrumb_list(list);
        if !crumbs.is_empty() {
            return crumbs;
        }
    }

    let Some(nav) = BREADCRUMB_NAV
        .iter()
        .find_map(|sel| page.document.select(sel).next())
    else {
        return Vec::new();
    };

    ANCHOR
        .iter()
        .flat_map(|s| nav.select(s))
        .filter_map(|a| {
            let name = element_text(&a);
            (!name.is_empty()).then(|| (name, attr(&a, "href")))
        })
        .zip(1u32..)
        .map(|((name, href), position)| BreadcrumbItem {
            name,
            url: href.and_then(|h| resolve_url(page.base_url, &h)),
            position,
        })
        .collect()
}

fn parse_breadcrumb_list(node: &StructuredNode) -> Vec<BreadcrumbItem> {
    let mut crumbs = Vec::new();

    for entry in node.get("itemListElement").items() {
        let item = entry.get("item");
        let Some(name) = entry
            .get("name")
            .as_text()
            .or_else(|| item.get("name").as_text())
        else {
            continue;
        };

        let url = match item {
            FieldValue::Object(_) => item.get("@id").as_text().or_else(|| item.get("url").as_text()),
            other => other.as_text(),
        };
        let position = entry
            .get("position")
            .as_number()
            .filter(|p| *p >= 1.0)
            .map(|p| p as u32)
            .unwrap_or(crumbs.len() as u32 + 1);

        crumbs.push(BreadcrumbItem {
            name: collapse_whitespace(name),
            url: url.map(String::from),
            position,
        });
    }

    crumbs
}

/// Nodes of article types first, then every other node
fn article_first<'a>(page: &'a Page<'_>) -> impl Iterator<Item = &'a StructuredNode> + 'a {
    let articles = ARTICLE_TYPES.iter().flat_map(move |t| page.graph.nodes_of(t));
    let rest = page
        .graph
        .nodes()
        .iter()
        .filter(|n| !ARTICLE_TYPES.iter().any(|t| n.has_type(t)));
    articles.chain(rest)
}

fn extract_author(page: &Page<'_>, meta: &MetaTags) -> Option<String> {
    let structured = article_first(page).find_map(|node| {
        let author = node.get("author").first();
        let raw = match author {
            FieldValue::Object(_) => author.get("name").as_text(),
            other => other.as_text(),
        }?;
        sanitize_author(raw)
    });
    if structured.is_some() {
        return structured;
    }

    if let Some(name) = meta.get("author").and_then(sanitize_author) {
        return Some(name);
    }

    AUTHOR_MARKUP
        .iter()
        .filter_map(|sel| page.document.select(sel).next())
        .find_map(|el| sanitize_author(&element_text(&el)))
}

/// Accept only text that reads as a person's name. A missing author is
/// fine; a wrong one is not.
pub fn sanitize_author(raw: &str) -> Option<String> {
    let clean = collapse_whitespace(&BY_PREFIX.replace(raw.trim(), ""));
    let len = clean.chars().count();
    if !(2..=80).contains(&len) {
        return None;
    }

    let lower = clean.to_lowercase();
    let rejected = lower.contains("http://")
        || lower.contains("https://")
        || (clean.contains('@') && clean.contains('.'))
        || AUTHOR_VERBS.iter().any(|v| lower.contains(v))
        || AUTHOR_UI_NOISE.iter().any(|n| lower.contains(n))
        || DATE_LIKE.is_match(&lower)
        || MONTH.is_match(&lower)
        || PUNCTUATION.find_iter(&clean).count() > 2
        || clean.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());

    (!rejected).then_some(clean)
}

fn structured_date(page: &Page<'_>, key: &str) -> Option<String> {
    article_first(page).find_map(|node| node.get(key).as_text().map(|d| d.trim().to_string()))
}

fn extract_language(document: &Html, meta: &MetaTags) -> Option<String> {
    HTML_ROOT
        .iter()
        .find_map(|s| document.select(s).next())
        .and_then(|html| attr(&html, "lang"))
        .filter(|lang| lang.len() <= 10)
        .or_else(|| meta.get("http-equiv:content-language").map(String::from))
}

fn canonical_url(meta: &MetaTags, base: &Url) -> Option<String> {
    let candidate = [meta.link("canonical"), meta.get("og:url")]
        .into_iter()
        .flatten()
        .find_map(|href| base.join(href.trim()).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or_else(|| base.clone());

    Some(strip_tracking_params(candidate).to_string())
}

/// Drop the fragment and analytics query parameters
pub fn strip_tracking_params(mut url: Url) -> Url {
    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| {
            let key = k.to_lowercase();
            !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&key.as_str())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url
}

fn organization_name(page: &Page<'_>) -> Option<String> {
    page.graph
        .nodes_of("Organization")
        .find_map(|org| org.get("name").as_text())
        .or_else(|| {
            article_first(page).find_map(|node| node.get("publisher").first().get("name").as_text())
        })
        .map(collapse_whitespace)
}

fn extract_logo(page: &Page<'_>, meta: &MetaTags) -> Option<String> {
    let logo_url = |logo: &FieldValue| -> Option<String> {
        let logo = logo.first();
        let src = match logo {
            FieldValue::Object(_) => logo.get("url").as_text().or_else(|| logo.get("contentUrl").as_text()),
            other => other.as_text(),
        }?;
        resolve_url(page.base_url, src)
    };

    let structured = page
        .graph
        .nodes_of("Organization")
        .find_map(|org| logo_url(org.get("logo")))
        .or_else(|| article_first(page).find_map(|node| logo_url(node.get("publisher").first().get("logo"))));
    if structured.is_some() {
        return structured;
    }

    LOGO_IMAGES
        .iter()
        .flat_map(|sel| page.document.select(sel))
        .find_map(|img| attr(&img, "src"))
        .and_then(|src| resolve_url(page.base_url, &src))
        .or_else(|| {
            meta.link("apple-touch-icon")
                .and_then(|href| resolve_url(page.base_url, href))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::graph::GraphIndex;

    fn extract_html(html: &str, url: &str) -> GenericContent {
        let document = Html::parse_document(html);
        let graph = GraphIndex::from_document(&document);
        let base_url = Url::parse(url).unwrap();
        let limits = Limits::default();
        let page = Page {
            document: &document,
            graph: &graph,
            base_url: &base_url,
            limits: &limits,
        };
        let meta = MetaTags::from_document(&document);
        extract(&page, html, &meta)
    }

    #[test]
    fn test_title_and_description_fallbacks() {
        let content = extract_html(
            r#"<html><head><title>Doc Title</title>
               <meta property="og:description" content="From OG"></head>
               <body><h1>Heading</h1></body></html>"#,
            "https://example.com/",
        );
        assert_eq!(content.title.as_deref(), Some("Doc Title"));
        assert_eq!(content.description.as_deref(), Some("From OG"));

        let content = extract_html(
            r#"<html><head><meta property="og:title" content="OG Title">
               <meta name="description" content="Meta desc"></head><body></body></html>"#,
            "https://example.com/",
        );
        assert_eq!(content.title.as_deref(), Some("OG Title"));
        assert_eq!(content.description.as_deref(), Some("Meta desc"));

        let content = extract_html("<html><body><p>No title</p></body></html>", "https://example.com/");
        assert_eq!(content.title, None);
    }

    #[test]
    fn test_headings_in_document_order() {
        let content = extract_html(
            "<body><h2>Second level</h2><h1>Top</h1><h3> </h3><h6>Deep</h6></body>",
            "https://example.com/",
        );
        let levels: Vec<(u8, &str)> = content.headings.iter().map(|h| (h.level, h.text.as_str())).collect();
        assert_eq!(levels, vec![(2, "Second level"), (1, "Top"), (6, "Deep")]);
    }

    #[test]
    fn test_images_capped_and_resolved() {
        let imgs: String = (0..30)
            .map(|i| format!(r#"<img src="/img/{i}.jpg" alt="Image {i}" width="100">"#))
            .collect();
        let html = format!(r#"<body><img data-src="lazy.png">{imgs}</body>"#);
        let content = extract_html(&html, "https://example.com/gallery/");

        assert_eq!(content.images.len(), 20);
        assert_eq!(content.images[0].src, "https://example.com/gallery/lazy.png");
        assert_eq!(content.images[1].src, "https://example.com/img/0.jpg");
        assert_eq!(content.images[1].alt.as_deref(), Some("Image 0"));
        assert_eq!(content.images[1].width, Some(100));
    }

    #[test]
    fn test_body_capped() {
        let paragraph = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(40);
        let paragraphs: String = (0..5).map(|_| format!("<p>{paragraph}</p>")).collect();
        let html = format!("<html><body><article>{paragraphs}</article></body></html>");
        let content = extract_html(&html, "https://example.com/post");

        let body = content.body.unwrap();
        assert!(!body.is_empty());
        assert!(body.chars().count() <= 5000);
    }

    #[test]
    fn test_faq_from_structured_data() {
        let content = extract_html(
            r#"<script type="application/ld+json">
            {"@type": "FAQPage", "mainEntity": [
                {"@type": "Question", "name": "Do you ship?", "acceptedAnswer": {"@type": "Answer", "text": "Yes."}},
                {"@type": "Question", "name": "Returns?", "acceptedAnswer": {"text": "30 days."}}
            ]}
            </script>
            <dl><dt>Ignored</dt><dd>Because structured data wins</dd></dl>"#,
            "https://example.com/faq",
        );

        assert_eq!(content.faq.len(), 2);
        assert_eq!(content.faq[0].question, "Do you ship?");
        assert_eq!(content.faq[1].answer, "30 days.");
    }

    #[test]
    fn test_faq_from_markup() {
        let content = extract_html(
            r#"<body>
            <dl><dt>What is it?</dt><dd>A widget.</dd></dl>
            <h3>How long does delivery take?</h3><div>ad</div><p>Two days.</p>
            <h3>Not a question</h3><p>Skipped.</p>
            </body>"#,
            "https://example.com/",
        );

        assert_eq!(content.faq.len(), 2);
        assert_eq!(content.faq[0].question, "What is it?");
        assert_eq!(content.faq[1].question, "How long does delivery take?");
        assert_eq!(content.faq[1].answer, "Two days.");
    }

    #[test]
    fn test_breadcrumbs_structured_then_dom() {
        let content = extract_html(
            r#"<script type="application/ld+json">
            {"@type": "BreadcrumbList", "itemListElement": [
                {"@type": "ListItem", "position": 1, "name": "Home", "item": "https://example.com/"},
                {"@type": "ListItem", "position": 2, "item": {"@id": "https://example.com/shoes", "name": "Shoes"}}
            ]}
            </script>"#,
            "https://example.com/shoes/runner",
        );
        assert_eq!(content.breadcrumbs.len(), 2);
        assert_eq!(content.breadcrumbs[1].name, "Shoes");
        assert_eq!(content.breadcrumbs[1].url.as_deref(), Some("https://example.com/shoes"));
        assert_eq!(content.breadcrumbs[1].position, 2);

        let content = extract_html(
            r#"<nav aria-label="Breadcrumb"><a href="/">Home</a> / <a href="/blog">Blog</a></nav>"#,
            "https://example.com/blog/post",
        );
        assert_eq!(content.breadcrumbs.len(), 2);
        assert_eq!(content.breadcrumbs[1].url.as_deref(), Some("https://example.com/blog"));
        assert_eq!(content.breadcrumbs[1].position, 2);
    }

    #[test]
    fn test_article_metadata() {
        let content = extract_html(
            r#"<html lang="en-GB"><head>
            <meta property="og:site_name" content="Example News">
            <meta property="og:image" content="/hero.jpg">
            <meta property="article:modified_time" content="2024-02-02">
            <link rel="canonical" href="https://example.com/story?utm_source=x&amp;id=7#top">
            <script type="application/ld+json">
            {"@type": "NewsArticle", "author": [{"@type": "Person", "name": "By Jane Doe"}],
             "datePublished": "2024-02-01",
             "publisher": {"@type": "Organization", "name": "Example", "logo": {"url": "/logo.png"}}}
            </script>
            </head><body></body></html>"#,
            "https://example.com/story",
        );

        assert_eq!(content.author.as_deref(), Some("Jane Doe"));
        assert_eq!(content.published_date.as_deref(), Some("2024-02-01"));
        assert_eq!(content.modified_date.as_deref(), Some("2024-02-02"));
        assert_eq!(content.language.as_deref(), Some("en-GB"));
        assert_eq!(content.canonical_url.as_deref(), Some("https://example.com/story?id=7"));
        assert_eq!(content.og_image.as_deref(), Some("https://example.com/hero.jpg"));
        assert_eq!(content.organization_name.as_deref(), Some("Example News"));
        assert_eq!(content.organization_logo.as_deref(), Some("https://example.com/logo.png"));
    }

    #[test]
    fn test_logo_fallbacks() {
        let content = extract_html(
            r#"<html><head><link rel="apple-touch-icon" href="/touch.png"></head>
            <body><header><img class="site-logo" src="/brand/logo.svg"></header></body></html>"#,
            "https://example.com/",
        );
        assert_eq!(content.organization_logo.as_deref(), Some("https://example.com/brand/logo.svg"));

        let content = extract_html(
            r#"<html><head><link rel="apple-touch-icon" href="/touch.png"></head><body></body></html>"#,
            "https://example.com/",
        );
        assert_eq!(content.organization_logo.as_deref(), Some("https://example.com/touch.png"));
    }

    #[test]
    fn test_sanitize_author() {
        assert_eq!(sanitize_author("By  Jane\n Doe"), Some("Jane Doe".to_string()));
        assert_eq!(sanitize_author("Posted by admin"), None);
        assert_eq!(sanitize_author("March 3, 2024"), None);
        assert_eq!(sanitize_author("Share on Twitter"), None);
        assert_eq!(sanitize_author("https://example.com/me"), None);
        assert_eq!(sanitize_author("jane@example.com"), None);
        assert_eq!(sanitize_author("J"), None);
        assert_eq!(sanitize_author("12345"), None);
    }

    #[test]
    fn test_strip_tracking_params() {
        let url = Url::parse("https://example.com/p?utm_medium=mail&fbclid=1&color=red#reviews").unwrap();
        assert_eq!(strip_tracking_params(url).as_str(), "https://example.com/p?color=red");

        let url = Url::parse("https://example.com/p?gclid=abc").unwrap();
        assert_eq!(strip_tracking_params(url).as_str(), "https://example.com/p");
    }
}
