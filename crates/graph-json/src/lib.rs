//! graph-json: JSON documents for property-graph vertices and edges.
//!
//! This crate encodes graph elements (vertices, edges and their properties)
//! to compact, field-ordered JSON text and decodes such text back into
//! generic documents.
//!
//! # Overview
//!
//! - **Ids are scalars**: numeric ids are written as JSON numbers, textual
//!   ids as JSON strings, never wrapped unless a type tag is requested
//! - **Stable layout**: `id`, `label`, `type`, endpoints for edges, then
//!   `properties` in insertion order
//! - **Explicit narrowing**: generic decoding widens every number to a
//!   double; [`narrow_number`] restores the intended kind
//!
//! # Quick Start
//!
//! ```rust
//! use graph_json::{from_text, to_text, ElementDoc, NumberKind, PropertyValue, VertexBuilder};
//!
//! let alice = VertexBuilder::new(42, "person")
//!     .properties(|p| p.text("name", "alice").int32("age", 30))
//!     .build();
//!
//! let text = to_text(&alice).unwrap();
//! assert_eq!(
//!     text,
//!     r#"{"id":42,"label":"person","type":"vertex","properties":{"name":"alice","age":30}}"#
//! );
//!
//! let doc: ElementDoc = from_text(&text).unwrap();
//! assert_eq!(doc.property_as("age", NumberKind::Int32), Some(PropertyValue::Int32(30)));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (Id, Timestamp, PropertyValue, Vertex, Edge)
//! - [`codec`]: Writer, per-type codecs, registry and text facade
//! - [`util`]: RFC 3339 datetime helpers
//! - [`error`]: Error types
//! - [`limits`]: Decode limits and precision bounds
//!
//! # Precision
//!
//! Integers beyond 2^53 are always encoded exactly, but a generic decode
//! reads them as doubles. Narrowing such a double to `Int64` logs a warning,
//! or fails under [`PrecisionPolicy::Reject`].

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;

// Re-export commonly used types at crate root
pub use codec::{
    default_registry, from_text, from_text_shape, narrow_number, narrow_number_checked, to_text,
    to_writer, ElementDoc, EndpointsDoc, Generic, JsonEncode, JsonWriter, PrecisionPolicy,
    Registry, RegistryBuilder, Shape, TimestampFormat, TypeTagStyle, TypeTagger,
};
pub use error::{DecodeError, EncodeError, FormatError};
pub use model::{
    Edge, EdgeBuilder, Element, ElementKind, Endpoint, Id, NumberKind, PropertiesBuilder,
    Property, PropertyMap, PropertyValue, Timestamp, Vertex, VertexBuilder,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
