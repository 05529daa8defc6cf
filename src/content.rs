//! Normalized content record and its capability view

use crate::extractors::Layer;
use crate::product::{is_nonzero_price, ProductData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Content category driving the primary output document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Product,
    Article,
    BlogPost,
    Service,
    Faq,
    LocalBusiness,
    #[default]
    Unknown,
}

/// Producer of a record. Informational only; no downstream branch reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    HtmlScraper,
    WordpressRest,
    WordpressRestAuthenticated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 through 6
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub position: u32,
}

/// Document-level record handed to the classifier and synthesizer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedContent {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub headings: Vec<Heading>,
    pub images: Vec<ImageData>,
    pub faq: Vec<FaqItem>,
    pub breadcrumbs: Vec<BreadcrumbItem>,
    pub category: ContentCategory,
    pub source: SourceKind,
    pub confidence: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_logo: Option<String>,

    pub product: ProductData,
    /// Winning layer per product field
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub product_sources: BTreeMap<String, Layer>,
}

impl NormalizedContent {
    /// What the record actually holds. Recomputed on every call.
    pub fn capabilities(&self) -> Capabilities {
        let offer = self.product.offer.as_ref();
        let rating = self.product.rating.as_ref();

        Capabilities {
            has_title: self.title.is_some(),
            has_description: self.description.is_some(),
            has_author: self.author.is_some(),
            has_published_date: self.published_date.is_some(),
            has_modified_date: self.modified_date.is_some(),
            has_images: !self.images.is_empty() || self.og_image.is_some(),
            has_organization: self.organization_name.is_some(),
            has_logo: self.organization_logo.is_some(),
            has_price: offer
                .and_then(|o| o.price.as_deref())
                .is_some_and(is_nonzero_price),
            has_currency: offer.is_some_and(|o| o.currency.is_some()),
            has_availability: offer.is_some_and(|o| o.availability.is_some()),
            has_price_valid_until: offer.is_some_and(|o| o.price_valid_until.is_some()),
            has_seller: offer.is_some_and(|o| o.seller_name.is_some()),
            has_rating: rating.is_some_and(|r| r.rating_value.is_some()),
            has_reviews: rating.and_then(|r| r.review_count).is_some_and(|n| n > 0),
            has_rating_count: rating.and_then(|r| r.rating_count).is_some_and(|n| n > 0),
            has_variants: !self.product.variants.is_empty(),
            has_delivery_info: self.product.delivery_text.is_some(),
            has_sku: self.product.sku.is_some(),
            has_brand: self.product.brand.is_some(),
            has_mpn: self.product.mpn.is_some(),
            has_product_images: !self.product.images.is_empty(),
        }
    }
}

/// Boolean projection of a [`NormalizedContent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub has_title: bool,
    pub has_description: bool,
    pub has_author: bool,
    pub has_published_date: bool,
    pub has_modified_date: bool,
    pub has_images: bool,
    pub has_organization: bool,
    pub has_logo: bool,
    pub has_price: bool,
    pub has_currency: bool,
    pub has_availability: bool,
    pub has_price_valid_until: bool,
    pub has_seller: bool,
    pub has_rating: bool,
    pub has_reviews: bool,
    pub has_rating_count: bool,
    pub has_variants: bool,
    pub has_delivery_info: bool,
    pub has_sku: bool,
    pub has_brand: bool,
    pub has_mpn: bool,
    pub has_product_images: bool,
}

impl Capabilities {
    fn flags(&self) -> [(&'static str, bool); 22] {
        [
            ("has_title", self.has_title),
            ("has_description", self.has_description),
            ("has_author", self.has_author),
            ("has_published_date", self.has_published_date),
            ("has_modified_date", self.has_modified_date),
            ("has_images", self.has_images),
            ("has_organization", self.has_organization),
            ("has_logo", self.has_logo),
            ("has_price", self.has_price),
            ("has_currency", self.has_currency),
            ("has_availability", self.has_availability),
            ("has_price_valid_until", self.has_price_valid_until),
            ("has_seller", self.has_seller),
            ("has_rating", self.has_rating),
            ("has_reviews", self.has_reviews),
            ("has_rating_count", self.has_rating_count),
            ("has_variants", self.has_variants),
            ("has_delivery_info", self.has_delivery_info),
            ("has_sku", self.has_sku),
            ("has_brand", self.has_brand),
            ("has_mpn", self.has_mpn),
            ("has_product_images", self.has_product_images),
        ]
    }

    pub fn available(&self) -> Vec<&'static str> {
        self.flags().into_iter().filter(|(_, v)| *v).map(|(k, _)| k).collect()
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.flags().into_iter().filter(|(_, v)| !*v).map(|(k, _)| k).collect()
    }
}
