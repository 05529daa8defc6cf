//! Structured-data graph flattening
//!
//! Collects every `<script type="application/ld+json">` payload of a document,
//! resolves `@graph` containers and arrays, and indexes the resulting leaf
//! nodes by their declared `@type`. Raw property values are kept as a
//! [`FieldValue`] tagged union so each extractor does its own explicit match.

use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

static JSONLD_SCRIPT: LazyLock<Option<Selector>> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).ok()
});

static ABSENT: FieldValue = FieldValue::Absent;

/// Raw property map of one structured-data object
pub type Fields = BTreeMap<String, FieldValue>;

/// Scalar structured-data value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
}

/// One raw structured-data property value, uncoerced
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Scalar),
    List(Vec<FieldValue>),
    Object(Fields),
    #[default]
    Absent,
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => FieldValue::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => FieldValue::Scalar(Scalar::Text(s.clone())),
            Value::Array(arr) => FieldValue::List(arr.iter().map(FieldValue::from).collect()),
            Value::Object(obj) => FieldValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Non-blank string scalar, verbatim
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(Scalar::Text(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number, or a string that parses as one
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Scalar(Scalar::Number(n)) => n.as_f64(),
            FieldValue::Scalar(Scalar::Text(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    /// Text or number rendered as a string (prices, identifiers)
    pub fn to_plain_string(&self) -> Option<String> {
        match self {
            FieldValue::Scalar(Scalar::Text(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            FieldValue::Scalar(Scalar::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            FieldValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// View as a sequence: lists yield their entries, absent yields nothing,
    /// anything else is a sequence of one.
    pub fn items(&self) -> &[FieldValue] {
        match self {
            FieldValue::List(items) => items,
            FieldValue::Absent => &[],
            other => std::slice::from_ref(other),
        }
    }

    pub fn first(&self) -> &FieldValue {
        self.items().first().unwrap_or(&ABSENT)
    }

    /// Property lookup on an object value
    pub fn get(&self, key: &str) -> &FieldValue {
        match self {
            FieldValue::Object(fields) => fields.get(key).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }
}

/// One flattened structured-data object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredNode {
    /// Declared types, schema.org prefix stripped
    pub types: Vec<String>,
    pub fields: Fields,
}

impl StructuredNode {
    pub fn get(&self, key: &str) -> &FieldValue {
        self.fields.get(key).unwrap_or(&ABSENT)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}

/// Flat index of structured-data nodes keyed by semantic type.
///
/// Nodes are stored once in document order; a node declaring several types is
/// referenced from each type's entry.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    nodes: Vec<StructuredNode>,
    by_type: HashMap<String, Vec<usize>>,
    skipped_payloads: usize,
}

impl GraphIndex {
    /// Build the index from every JSON-LD script tag of a parsed document
    pub fn from_document(document: &Html) -> Self {
        let Some(selector) = JSONLD_SCRIPT.as_ref() else {
            return Self::from_payloads(std::iter::empty());
        };

        let payloads: Vec<String> = document
            .select(selector)
            .map(|el| el.text().collect::<String>())
            .collect();

        Self::from_payloads(payloads.iter().map(String::as_str))
    }

    /// Build the index from raw JSON payloads in document order.
    /// Payloads that fail to decode, or whose root is not an object or array,
    /// are skipped individually.
    pub fn from_payloads<'a, I>(payloads: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = GraphIndex::default();

        for payload in payloads {
            let trimmed = payload.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(trimmed) {
                Ok(json @ (Value::Object(_) | Value::Array(_))) => index.collect(&json),
                _ => index.skipped_payloads += 1,
            }
        }

        tracing::info!(
            target: "schema_synth::graph",
            total_nodes = index.nodes.len(),
            skipped_payloads = index.skipped_payloads,
            types = ?index.histogram(),
            "structured data flattened"
        );

        index
    }

    fn collect(&mut self, value: &Value) {
        match value {
            Value::Array(arr) => {
                for item in arr {
                    self.collect(item);
                }
            }
            Value::Object(obj) => {
                // A graph container is not itself a node
                if let Some(graph) = obj.get("@graph") {
                    self.collect(graph);
                } else {
                    self.push_leaf(value);
                }
            }
            _ => {}
        }
    }

    fn push_leaf(&mut self, value: &Value) {
        let types = match value.get("@type") {
            Some(Value::String(s)) => vec![clean_type(s)],
            Some(Value::Array(arr)) => arr
                .iter()
                .filter_map(|v| v.as_str())
                .map(clean_type)
                .collect(),
            _ => vec![],
        };

        let fields = match FieldValue::from(value) {
            FieldValue::Object(fields) => fields,
            _ => Fields::new(),
        };

        let idx = self.nodes.len();
        for type_name in &types {
            let entry = self.by_type.entry(type_name.clone()).or_default();
            if entry.last() != Some(&idx) {
                entry.push(idx);
            }
        }

        self.nodes.push(StructuredNode { types, fields });
    }

    /// Nodes declaring `type_name`, in document order
    pub fn nodes_of<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a StructuredNode> + 'a {
        self.by_type
            .get(type_name)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.nodes[i])
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.by_type.contains_key(type_name)
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[StructuredNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Payloads that were dropped as malformed
    pub fn skipped_payloads(&self) -> usize {
        self.skipped_payloads
    }

    /// Type → node count
    pub fn histogram(&self) -> BTreeMap<&str, usize> {
        self.by_type
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect()
    }
}

fn clean_type(raw: &str) -> String {
    raw.strip_prefix("https://schema.org/")
        .or_else(|| raw.strip_prefix("http://schema.org/"))
        .unwrap_or(raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object() {
        let html = r#"
        <html>
        <head>
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "Product",
                "name": "Test Product",
                "sku": "ABC123"
            }
            </script>
        </head>
        </html>
        "#;

        let index = GraphIndex::from_document(&Html::parse_document(html));
        assert_eq!(index.len(), 1);
        let product = index.nodes_of("Product").next().unwrap();
        assert_eq!(product.get("name").as_text(), Some("Test Product"));
        assert_eq!(product.get("sku").as_text(), Some("ABC123"));
    }

    #[test]
    fn test_graph_with_multiple_types() {
        let html = r#"
        <script type="application/ld+json">
        {
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "Product", "name": "Product 1"},
                {"@type": "BreadcrumbList", "itemListElement": [
                    {"@type": "ListItem", "position": 1, "name": "Home"},
                    {"@type": "ListItem", "position": 2, "name": "Shoes"},
                    {"@type": "ListItem", "position": 3, "name": "Runner"}
                ]}
            ]
        }
        </script>
        "#;

        let index = GraphIndex::from_document(&Html::parse_document(html));
        assert_eq!(index.nodes_of("Product").count(), 1);
        assert_eq!(index.nodes_of("BreadcrumbList").count(), 1);
        assert_eq!(index.len(), 2);
        // nested ListItems stay inside their parent node
        assert!(!index.has_type("ListItem"));
    }

    #[test]
    fn test_nested_containers_are_fully_flattened() {
        let payloads = [
            r#"[{"@type": "Organization", "name": "A"}, {"@graph": [{"@type": "WebPage"}, [{"@type": "Person"}]]}]"#,
            r#"{"@graph": {"@graph": [{"@type": "Product"}, {"@type": "Offer"}]}}"#,
            r#"{"@type": "Article"}"#,
        ];

        let index = GraphIndex::from_payloads(payloads);
        assert_eq!(index.len(), 6);
        let order: Vec<&str> = index.nodes().iter().map(|n| n.types[0].as_str()).collect();
        assert_eq!(order, ["Organization", "WebPage", "Person", "Product", "Offer", "Article"]);
    }

    #[test]
    fn test_multi_typed_node_indexed_under_each() {
        let index = GraphIndex::from_payloads([
            r#"{"@type": ["Product", "https://schema.org/Vehicle"], "name": "Car"}"#,
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.nodes_of("Product").count(), 1);
        assert_eq!(index.nodes_of("Vehicle").count(), 1);
        assert_eq!(index.histogram().get("Vehicle"), Some(&1));
    }

    #[test]
    fn test_malformed_payload_skipped() {
        let html = r#"
        <script type="application/ld+json">{ "@type": "Product", broken</script>
        <script type="application/ld+json">"just a string"</script>
        <script type="application/ld+json">{"@type": "Organization", "name": "Org"}</script>
        "#;

        let index = GraphIndex::from_document(&Html::parse_document(html));
        assert_eq!(index.skipped_payloads(), 2);
        assert_eq!(index.nodes_of("Organization").count(), 1);
        assert!(!index.has_type("Product"));
    }

    #[test]
    fn test_field_value_shapes() {
        let value = FieldValue::from(&serde_json::json!({
            "price": "29.99",
            "count": 12,
            "image": ["a.jpg", "b.jpg"],
            "brand": {"@type": "Brand", "name": "Acme"},
            "gone": null
        }));

        assert_eq!(value.get("price").as_number(), Some(29.99));
        assert_eq!(value.get("count").to_plain_string(), Some("12".to_string()));
        assert_eq!(value.get("image").items().len(), 2);
        assert_eq!(value.get("brand").get("name").as_text(), Some("Acme"));
        assert!(value.get("gone").is_absent());
        assert!(value.get("missing").is_absent());
        assert_eq!(value.get("price").items().len(), 1);
    }
}
