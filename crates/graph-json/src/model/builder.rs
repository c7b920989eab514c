//! Builder API for ergonomic vertex and edge construction.
//!
//! # Example
//!
//! ```rust
//! use graph_json::model::builder::{EdgeBuilder, VertexBuilder};
//! use graph_json::Timestamp;
//!
//! let alice = VertexBuilder::new(1, "person")
//!     .properties(|p| p.text("name", "alice").int32("age", 30))
//!     .build();
//! let bob = VertexBuilder::new(2, "person")
//!     .properties(|p| p.text("name", "bob"))
//!     .build();
//!
//! let knows = EdgeBuilder::new("S1:person>>knows>>S2:person", "knows", &alice, &bob)
//!     .properties(|p| p.timestamp("since", Timestamp::from_millis(1609459200000)))
//!     .build();
//!
//! assert_eq!(knows.out_vertex().label, "person");
//! ```

use crate::model::{Edge, Endpoint, Id, Property, PropertyMap, PropertyValue, Timestamp, Vertex};

/// Builder for a vertex.
#[derive(Debug, Clone)]
pub struct VertexBuilder {
    id: Id,
    label: String,
    properties: PropertyMap,
}

impl VertexBuilder {
    /// Creates a new VertexBuilder.
    pub fn new(id: impl Into<Id>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Adds properties using a builder function.
    pub fn properties<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PropertiesBuilder) -> PropertiesBuilder,
    {
        let builder = f(PropertiesBuilder { map: self.properties });
        self.properties = builder.map;
        self
    }

    /// Builds the final Vertex.
    pub fn build(self) -> Vertex {
        Vertex {
            id: self.id,
            label: self.label,
            properties: self.properties,
        }
    }
}

/// Builder for an edge between two endpoints.
#[derive(Debug, Clone)]
pub struct EdgeBuilder {
    id: Id,
    label: String,
    out_vertex: Endpoint,
    in_vertex: Endpoint,
    properties: PropertyMap,
}

impl EdgeBuilder {
    /// Creates a new EdgeBuilder.
    pub fn new(
        id: impl Into<Id>,
        label: impl Into<String>,
        out_vertex: impl Into<Endpoint>,
        in_vertex: impl Into<Endpoint>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            out_vertex: out_vertex.into(),
            in_vertex: in_vertex.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Adds properties using a builder function.
    pub fn properties<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PropertiesBuilder) -> PropertiesBuilder,
    {
        let builder = f(PropertiesBuilder { map: self.properties });
        self.properties = builder.map;
        self
    }

    /// Builds the final Edge.
    pub fn build(self) -> Edge {
        Edge {
            id: self.id,
            label: self.label,
            out_vertex: self.out_vertex,
            in_vertex: self.in_vertex,
            properties: self.properties,
        }
    }
}

/// Builder for element properties.
///
/// Every property is keyed by a textual id equal to its name; use
/// [`PropertiesBuilder::keyed`] when the property-key id differs.
#[derive(Debug, Clone, Default)]
pub struct PropertiesBuilder {
    map: PropertyMap,
}

impl PropertiesBuilder {
    /// Adds a property under an explicit property-key id.
    pub fn keyed(mut self, id: Id, key: &str, value: Option<PropertyValue>) -> Self {
        self.map.insert(
            id,
            Property {
                key: key.to_string(),
                value,
            },
        );
        self
    }

    /// Adds any property value.
    pub fn value(self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.keyed(Id::text(key), key, Some(value.into()))
    }

    /// Adds a TEXT value.
    pub fn text(self, key: &str, value: impl Into<String>) -> Self {
        self.value(key, PropertyValue::Text(value.into()))
    }

    /// Adds an INT8 value.
    pub fn int8(self, key: &str, value: i8) -> Self {
        self.value(key, PropertyValue::Int8(value))
    }

    /// Adds an INT32 value.
    pub fn int32(self, key: &str, value: i32) -> Self {
        self.value(key, PropertyValue::Int32(value))
    }

    /// Adds an INT64 value.
    pub fn int64(self, key: &str, value: i64) -> Self {
        self.value(key, PropertyValue::Int64(value))
    }

    /// Adds a FLOAT32 value.
    pub fn float32(self, key: &str, value: f32) -> Self {
        self.value(key, PropertyValue::Float32(value))
    }

    /// Adds a FLOAT64 value.
    pub fn float64(self, key: &str, value: f64) -> Self {
        self.value(key, PropertyValue::Float64(value))
    }

    /// Adds a BOOL value.
    pub fn bool(self, key: &str, value: bool) -> Self {
        self.value(key, PropertyValue::Bool(value))
    }

    /// Adds a TIMESTAMP value.
    pub fn timestamp(self, key: &str, value: Timestamp) -> Self {
        self.value(key, PropertyValue::Timestamp(value))
    }

    /// Adds an identifier value.
    pub fn id_value(self, key: &str, value: impl Into<Id>) -> Self {
        self.value(key, PropertyValue::Id(value.into()))
    }

    /// Adds a null value.
    pub fn null(self, key: &str) -> Self {
        self.keyed(Id::text(key), key, None)
    }
}
