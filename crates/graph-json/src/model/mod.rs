//! Data model types for graph JSON.
//!
//! This module contains the domain types the codec reads:
//! - Identifiers (numeric or textual)
//! - Property values, timestamps and property maps
//! - Vertices, edges and edge endpoints
//! - Builders (ergonomic construction)

pub mod builder;
pub mod element;
pub mod id;
pub mod value;

pub use builder::{EdgeBuilder, PropertiesBuilder, VertexBuilder};
pub use element::{Edge, Element, ElementKind, Endpoint, Vertex};
pub use id::{Id, NUMERIC_TYPE_NAME, TEXTUAL_TYPE_NAME};
pub use value::{NumberKind, Property, PropertyMap, PropertyValue, Timestamp};
