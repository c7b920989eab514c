//! Vertices and edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Id, Property, PropertyMap, PropertyValue};

/// The two element shapes, written as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl ElementKind {
    /// The literal written in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Vertex => "vertex",
            ElementKind::Edge => "edge",
        }
    }
}

/// Capabilities shared by vertices and edges.
pub trait Element {
    fn id(&self) -> &Id;
    fn label(&self) -> &str;
    fn kind(&self) -> ElementKind;
    fn properties(&self) -> &PropertyMap;
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: Id,
    pub label: String,
    pub properties: PropertyMap,
}

impl Vertex {
    /// Creates a vertex with no properties.
    pub fn new(id: impl Into<Id>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Sets a property keyed by its name.
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(Id::text(key), Property::new(key, value));
        self
    }
}

impl Element for Vertex {
    fn id(&self) -> &Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Vertex
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertex {}:{}", self.id, self.label)
    }
}

/// The id and label of an edge endpoint.
///
/// Only these two fields of the endpoint vertex are surfaced when an edge is
/// encoded; nothing else of the vertex is carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub id: Id,
    pub label: String,
}

impl Endpoint {
    pub fn new(id: impl Into<Id>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Projects a vertex onto its id and label.
    pub fn of(vertex: &Vertex) -> Self {
        Self {
            id: vertex.id.clone(),
            label: vertex.label.clone(),
        }
    }
}

impl From<&Vertex> for Endpoint {
    fn from(vertex: &Vertex) -> Self {
        Endpoint::of(vertex)
    }
}

/// A directed edge from `out_vertex` to `in_vertex`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Id,
    pub label: String,
    pub out_vertex: Endpoint,
    pub in_vertex: Endpoint,
    pub properties: PropertyMap,
}

impl Edge {
    /// Creates an edge with no properties.
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

    /// Sets a property keyed by its name.
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(Id::text(key), Property::new(key, value));
        self
    }

    pub fn out_vertex(&self) -> &Endpoint {
        &self.out_vertex
    }

    pub fn in_vertex(&self) -> &Endpoint {
        &self.in_vertex
    }
}

impl Element for Edge {
    fn id(&self) -> &Id {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Edge
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edge {}:{} ({} -> {})",
            self.id, self.label, self.out_vertex.id, self.in_vertex.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_projection() {
        let v = Vertex::new(1, "person").with_property("name", "alice");
        let end = Endpoint::of(&v);
        assert_eq!(end, Endpoint::new(1, "person"));
    }

    #[test]
    fn test_edge_accessors() {
        let alice = Vertex::new(1, "person");
        let bob = Vertex::new(2, "person");
        let e = Edge::new("S1:person>>knows>>S2:person", "knows", &alice, &bob);

        assert_eq!(e.kind(), ElementKind::Edge);
        assert_eq!(e.out_vertex().id, Id::numeric(1));
        assert_eq!(e.in_vertex().id, Id::numeric(2));
        assert!(!e.id().is_numeric());
    }

    #[test]
    fn test_display_names_element() {
        let v = Vertex::new(42, "person");
        assert_eq!(v.to_string(), "vertex 42:person");

        let e = Edge::new("e1", "knows", Endpoint::new(1, "person"), Endpoint::new(2, "person"));
        assert_eq!(e.to_string(), "edge e1:knows (1 -> 2)");
    }

    #[test]
    fn test_kind_literal() {
        assert_eq!(ElementKind::Vertex.as_str(), "vertex");
        assert_eq!(serde_json::to_string(&ElementKind::Edge).unwrap(), "\"edge\"");
    }
}
