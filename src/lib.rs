//! Structured-data extraction and schema.org JSON-LD synthesis
//!
//! Reads a fetched HTML document through three layers:
//! - Visible DOM markup
//! - Embedded JSON-LD (with `@graph` flattening)
//! - Client-side JavaScript state (JSON or JS object literals parsed via SWC)
//!
//! The layers are merged per field by trust, the page is classified, and
//! schema.org documents are generated from whatever data was actually found.
//! A C FFI surface and a `schema-synth` binary sit on top.

pub mod classify;
pub mod config;
pub mod content;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod fetch;
pub mod graph;
pub mod merge;
pub mod pipeline;
pub mod product;
pub mod synth;
pub mod wordpress;

pub use classify::{classify, StructuralSignals};
pub use config::{FetchConfig, Limits};
pub use content::{Capabilities, ContentCategory, NormalizedContent, SourceKind};
pub use error::{Error, FetchError, Result};
pub use extractors::{Layer, LayerResult};
pub use fetch::{generate_from_source, DocumentSource, FetchedDocument, HttpSource};
pub use graph::{FieldValue, GraphIndex, StructuredNode};
pub use merge::{merge, Field, LayerSet, MergedRecord};
pub use pipeline::{extract_content, generate};
pub use product::{Offer, ProductData, Rating, Variant};
pub use synth::{synthesize, synthesize_with, to_script_tag};
pub use wordpress::normalize_post;
