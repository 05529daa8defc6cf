//! Trust-based merge of the extraction layers
//!
//! Each product field has its own ordered list of layers. The first layer in
//! that list which reported the field wins and is recorded as provenance.
//! Layers missing from a field's list are never consulted for it.

use crate::extractors::{Layer, LayerResult};
use crate::product::{Offer, ProductData, Rating, Variant};
use serde::Serialize;
use std::collections::BTreeMap;

/// Logical product field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sku,
    Mpn,
    Brand,
    Offer,
    Rating,
    Images,
    Variants,
    DeliveryText,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Sku => "sku",
            Field::Mpn => "mpn",
            Field::Brand => "brand",
            Field::Offer => "offer",
            Field::Rating => "rating",
            Field::Images => "images",
            Field::Variants => "variants",
            Field::DeliveryText => "delivery_text",
        }
    }
}

const STRUCTURED_FIRST: &[Layer] = &[Layer::JsonLd, Layer::JsState, Layer::Dom];

/// Field → layers in descending precedence
pub const PRECEDENCE: &[(Field, &[Layer])] = &[
    (Field::Sku, STRUCTURED_FIRST),
    (Field::Mpn, STRUCTURED_FIRST),
    (Field::Brand, STRUCTURED_FIRST),
    (Field::Offer, STRUCTURED_FIRST),
    (Field::Rating, STRUCTURED_FIRST),
    // Script state is not trusted for curated imagery (pending product-owner confirmation)
    (Field::Images, &[Layer::JsonLd, Layer::Dom]),
    (Field::Variants, &[Layer::JsState, Layer::Dom]),
    (Field::DeliveryText, &[Layer::Dom]),
];

pub fn precedence(field: Field) -> &'static [Layer] {
    PRECEDENCE
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, layers)| *layers)
        .unwrap_or(&[])
}

/// Outputs of the three layers for one document
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    pub dom: LayerResult,
    pub json_ld: LayerResult,
    pub js_state: LayerResult,
}

impl LayerSet {
    pub fn get(&self, layer: Layer) -> &LayerResult {
        match layer {
            Layer::Dom => &self.dom,
            Layer::JsonLd => &self.json_ld,
            Layer::JsState => &self.js_state,
        }
    }
}

/// A merged value with the layer that supplied it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Layer,
}

/// One value per field, absent when no permitted layer reported it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedRecord {
    pub sku: Option<Sourced<String>>,
    pub mpn: Option<Sourced<String>>,
    pub brand: Option<Sourced<String>>,
    pub offer: Option<Sourced<Offer>>,
    pub rating: Option<Sourced<Rating>>,
    pub images: Option<Sourced<Vec<String>>>,
    pub variants: Option<Sourced<Vec<Variant>>>,
    pub delivery_text: Option<Sourced<String>>,
}

impl MergedRecord {
    /// Winning layer per reported field
    pub fn provenance(&self) -> BTreeMap<Field, Layer> {
        let sources = [
            (Field::Sku, self.sku.as_ref().map(|s| s.source)),
            (Field::Mpn, self.mpn.as_ref().map(|s| s.source)),
            (Field::Brand, self.brand.as_ref().map(|s| s.source)),
            (Field::Offer, self.offer.as_ref().map(|s| s.source)),
            (Field::Rating, self.rating.as_ref().map(|s| s.source)),
            (Field::Images, self.images.as_ref().map(|s| s.source)),
            (Field::Variants, self.variants.as_ref().map(|s| s.source)),
            (Field::DeliveryText, self.delivery_text.as_ref().map(|s| s.source)),
        ];
        sources
            .into_iter()
            .filter_map(|(field, source)| source.map(|s| (field, s)))
            .collect()
    }

    /// Drop provenance
    pub fn into_product(self) -> ProductData {
        ProductData {
            sku: self.sku.map(|s| s.value),
            mpn: self.mpn.map(|s| s.value),
            brand: self.brand.map(|s| s.value),
            offer: self.offer.map(|s| s.value),
            rating: self.rating.map(|s| s.value),
            variants: self.variants.map(|s| s.value).unwrap_or_default(),
            images: self.images.map(|s| s.value).unwrap_or_default(),
            delivery_text: self.delivery_text.map(|s| s.value),
        }
    }
}

/// Walk the field's precedence list; the first layer reporting a value wins
fn pick<T, F>(layers: &LayerSet, field: Field, read: F) -> Option<Sourced<T>>
where
    F: Fn(&LayerResult) -> Option<T>,
{
    precedence(field).iter().find_map(|&layer| {
        read(layers.get(layer)).map(|value| Sourced {
            value,
            source: layer,
        })
    })
}

fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    (!items.is_empty()).then(|| items.to_vec())
}

/// Resolve the three layer outputs into one record
pub fn merge(layers: &LayerSet) -> MergedRecord {
    let record = MergedRecord {
        sku: pick(layers, Field::Sku, |r| r.sku.clone()),
        mpn: pick(layers, Field::Mpn, |r| r.mpn.clone()),
        brand: pick(layers, Field::Brand, |r| r.brand.clone()),
        offer: pick(layers, Field::Offer, |r| r.offer.clone()),
        rating: pick(layers, Field::Rating, |r| r.rating.clone()),
        images: pick(layers, Field::Images, |r| non_empty(&r.images)),
        variants: pick(layers, Field::Variants, |r| non_empty(&r.variants)),
        delivery_text: pick(layers, Field::DeliveryText, |r| r.delivery_text.clone()),
    };

    let winners: BTreeMap<&str, &str> = record
        .provenance()
        .into_iter()
        .map(|(field, layer)| (field.as_str(), layer.as_str()))
        .collect();
    tracing::info!(
        target: "schema_synth::merge",
        fields = winners.len(),
        winners = ?winners,
        "layers merged"
    );

    record
}
