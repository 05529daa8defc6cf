//! Meta tag lookup
//!
//! Collects `<meta>` tags keyed by `property`, `name` or `http-equiv`
//! (OpenGraph, Twitter Card, article and standard tags) plus the `<link>`
//! relations the content extractor needs.

use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

static META_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("meta").ok());
static LINK_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse("link[rel][href]").ok());

/// First non-empty value per lowercase key
#[derive(Debug, Clone, Default)]
pub struct MetaTags {
    meta: HashMap<String, String>,
    links: HashMap<String, String>,
}

impl MetaTags {
    pub fn from_document(document: &Html) -> Self {
        let mut tags = MetaTags::default();

        for element in META_SELECTOR.iter().flat_map(|s| document.select(s)) {
            let el = element.value();
            let content = el.attr("content").map(str::trim).unwrap_or("");
            if content.is_empty() {
                continue;
            }

            let keys = [
                el.attr("property").map(str::to_lowercase),
                el.attr("name").map(str::to_lowercase),
                el.attr("http-equiv").map(|k| format!("http-equiv:{}", k.to_lowercase())),
            ];
            for key in keys.into_iter().flatten() {
                tags.meta.entry(key).or_insert_with(|| content.to_string());
            }
        }

        for element in LINK_SELECTOR.iter().flat_map(|s| document.select(s)) {
            let el = element.value();
            let href = el.attr("href").map(str::trim).unwrap_or("");
            if href.is_empty() {
                continue;
            }
            // rel is a space-separated token list
            for rel in el.attr("rel").unwrap_or("").split_whitespace() {
                tags.links
                    .entry(rel.to_lowercase())
                    .or_insert_with(|| href.to_string());
            }
        }

        tags
    }

    /// Meta content by `property`/`name`, e.g. `og:title` or `description`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// First of several keys that is present
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    /// `href` of the first `<link>` with this relation
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }
}
