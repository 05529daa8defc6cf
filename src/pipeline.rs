//! Single-document pipeline: markup in, normalized record and JSON-LD out

use crate::classify::{classify, StructuralSignals};
use crate::config::Limits;
use crate::content::{NormalizedContent, SourceKind};
use crate::error::{Error, Result};
use crate::extractors::metadata::MetaTags;
use crate::extractors::{page, DomExtractor, JsStateExtractor, JsonLdExtractor, Layer, LayerExtractor, Page};
use crate::graph::GraphIndex;
use crate::merge::{merge, LayerSet};
use crate::synth::synthesize_with;
use scraper::Html;
use serde_json::Value;
use url::Url;

/// Build the normalized record for one document.
///
/// Fails only when `base_url` is not an absolute URL; every data problem in
/// the markup degrades to absent fields.
pub fn extract_content(raw: &str, base_url: &str, limits: &Limits) -> Result<NormalizedContent> {
    let base = Url::parse(base_url).map_err(|source| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;

    let document = Html::parse_document(raw);
    let graph = GraphIndex::from_document(&document);
    let meta = MetaTags::from_document(&document);
    let page = Page {
        document: &document,
        graph: &graph,
        base_url: &base,
        limits,
    };

    let extractors: [&dyn LayerExtractor; 3] = [&DomExtractor, &JsonLdExtractor, &JsStateExtractor];
    let mut layers = LayerSet::default();
    for extractor in extractors {
        let result = extractor.extract(&page);
        match extractor.layer() {
            Layer::Dom => layers.dom = result,
            Layer::JsonLd => layers.json_ld = result,
            Layer::JsState => layers.js_state = result,
        }
    }

    let merged = merge(&layers);
    let product_sources = merged
        .provenance()
        .into_iter()
        .map(|(field, layer)| (field.as_str().to_string(), layer))
        .collect();
    let generic = page::extract(&page, raw, &meta);

    let mut content = NormalizedContent {
        url: base.to_string(),
        title: generic.title,
        description: generic.description,
        body: generic.body,
        headings: generic.headings,
        images: generic.images,
        faq: generic.faq,
        breadcrumbs: generic.breadcrumbs,
        source: SourceKind::HtmlScraper,
        author: generic.author,
        published_date: generic.published_date,
        modified_date: generic.modified_date,
        language: generic.language,
        canonical_url: generic.canonical_url,
        og_image: generic.og_image,
        organization_name: generic.organization_name,
        organization_logo: generic.organization_logo,
        product: merged.into_product(),
        product_sources,
        ..NormalizedContent::default()
    };

    let signals = StructuralSignals::collect(&document, &graph, &meta);
    content.category = classify(&content, &signals);
    content.confidence = confidence_score(&content);

    let caps = content.capabilities();
    tracing::debug!(
        target: "schema_synth::extract",
        url = %content.url,
        available = ?caps.available(),
        missing = ?caps.missing(),
        "capabilities"
    );

    Ok(content)
}

/// Extract and synthesize in one step
pub fn generate(raw: &str, base_url: &str, limits: &Limits) -> Result<Vec<Value>> {
    let content = extract_content(raw, base_url, limits)?;
    Ok(synthesize_with(&content, limits))
}

/// Quality score of the generic extraction in `[0, 1]`
pub fn confidence_score(content: &NormalizedContent) -> f64 {
    let tiered = |present: bool, rich: bool| match (present, rich) {
        (true, true) => 0.25,
        (true, false) => 0.15,
        _ => 0.0,
    };

    let description = content.description.as_deref().unwrap_or("");
    let body = content.body.as_deref().unwrap_or("");

    let mut score: f64 = if content.title.is_some() { 0.25 } else { 0.0 };
    score += tiered(!description.is_empty(), description.chars().count() > 50);
    score += tiered(!body.is_empty(), body.chars().count() > 500);
    score += tiered(!content.headings.is_empty(), content.headings.len() >= 3);
    if content.product.offer.is_some() {
        score += 0.1;
    }

    score.min(1.0)
}
