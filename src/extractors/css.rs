//! CSS selector helpers
//!
//! Thin wrappers over the scraper crate shared by the DOM-reading extractors.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text never counts as visible page copy
const HIDDEN_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
];

/// Compile a selector list, dropping entries that fail to parse
pub fn compile(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element with whitespace collapsed
pub fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Non-empty trimmed attribute value
pub fn attr(element: &ElementRef, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// First matching element's non-empty text
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

/// First matching element's non-empty attribute
pub fn first_attr(document: &Html, selector: &Selector, attr_name: &str) -> Option<String> {
    document.select(selector).find_map(|el| attr(&el, attr_name))
}

/// Resolve a possibly relative link; only http(s) results are kept
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then(|| absolute.to_string())
}

/// Visible text below `element`, skipping scripts, styles and page chrome
pub fn visible_text(element: &ElementRef) -> String {
    let mut out = String::new();
    push_visible_text(element, &mut out);
    collapse_whitespace(&out)
}

fn push_visible_text(element: &ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !HIDDEN_TEXT_ELEMENTS.contains(&child_el.value().name()) {
                push_visible_text(&child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}
