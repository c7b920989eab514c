//! Vertex and edge documents.
//!
//! Encoding walks an element once and writes an ordered object:
//! `id`, `label`, `type`, the four endpoint fields for edges, then
//! `properties`. Decoding goes through [`ElementDoc`], which keeps ids as raw
//! JSON scalars and properties as a generic map.

use std::fmt;

use serde::Deserialize;

use crate::codec::id::{encode_id, encode_id_with_type_tag, write_id_field};
use crate::codec::primitives::JsonWriter;
use crate::codec::registry::{IdFormat, Registry};
use crate::codec::scalar::{
    decode_timestamp_as, encode_timestamp_as, json_type_name, narrow_number, TimestampFormat,
};
use crate::error::{EncodeError, FormatError};
use crate::model::{
    Edge, Element, ElementKind, Endpoint, NumberKind, Property, PropertyValue, Timestamp, Vertex,
};

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a vertex.
pub fn encode_vertex(
    w: &mut JsonWriter,
    vertex: &Vertex,
    registry: &Registry,
) -> Result<(), EncodeError> {
    tracing::trace!(element = %vertex, properties = vertex.properties.len(), "encoding vertex");
    write_head(w, vertex)?;
    write_properties(w, vertex, registry)?;
    w.end_object()
}

/// Encodes an edge, including the id and label of both endpoints.
pub fn encode_edge(w: &mut JsonWriter, edge: &Edge, registry: &Registry) -> Result<(), EncodeError> {
    tracing::trace!(element = %edge, properties = edge.properties.len(), "encoding edge");
    write_head(w, edge)?;
    write_id_field(w, "outV", &edge.out_vertex.id)?;
    w.string_field("outVLabel", &edge.out_vertex.label)?;
    write_id_field(w, "inV", &edge.in_vertex.id)?;
    w.string_field("inVLabel", &edge.in_vertex.label)?;
    write_properties(w, edge, registry)?;
    w.end_object()
}

/// Encodes an endpoint on its own as `{"id":..,"label":..}`.
pub fn encode_endpoint(w: &mut JsonWriter, endpoint: &Endpoint) -> Result<(), EncodeError> {
    w.begin_object()?;
    write_id_field(w, "id", &endpoint.id)?;
    w.string_field("label", &endpoint.label)?;
    w.end_object()
}

/// Opens the object and writes `id`, `label` and `type`.
fn write_head<E: Element + ?Sized>(w: &mut JsonWriter, element: &E) -> Result<(), EncodeError> {
    w.begin_object()?;
    write_id_field(w, "id", element.id())?;
    w.string_field("label", element.label())?;
    w.string_field("type", element.kind().as_str())
}

/// Writes the `properties` field.
///
/// A failure on any property aborts the element and is reported with the
/// property key, its value and the element it belongs to.
pub fn write_properties<E: Element + fmt::Display + ?Sized>(
    w: &mut JsonWriter,
    element: &E,
    registry: &Registry,
) -> Result<(), EncodeError> {
    w.field_name("properties")?;
    w.begin_object()?;
    for property in element.properties().values() {
        if let Err(source) = write_property(w, property, registry) {
            return Err(EncodeError::Property {
                key: property.key.clone(),
                value: describe(property.value.as_ref()),
                element: element.to_string(),
                source: Box::new(source),
            });
        }
    }
    w.end_object()
}

fn write_property(
    w: &mut JsonWriter,
    property: &Property,
    registry: &Registry,
) -> Result<(), EncodeError> {
    w.field_name(&property.key)?;
    match &property.value {
        Some(value) => encode_property_value(w, value, registry),
        None => w.write_null(),
    }
}

fn describe(value: Option<&PropertyValue>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "null".to_string(),
    }
}

/// Writes a single property value.
pub fn encode_property_value(
    w: &mut JsonWriter,
    value: &PropertyValue,
    registry: &Registry,
) -> Result<(), EncodeError> {
    match value {
        PropertyValue::Timestamp(ts) => encode_timestamp_as(w, *ts, registry.timestamp_format()),
        PropertyValue::Int8(v) => w.write_i64(i64::from(*v)),
        PropertyValue::Int32(v) => w.write_i64(i64::from(*v)),
        PropertyValue::Int64(v) => w.write_i64(*v),
        PropertyValue::Float32(v) => w.write_f32(*v),
        PropertyValue::Float64(v) => w.write_f64(*v),
        PropertyValue::Text(s) => w.write_str(s),
        PropertyValue::Bool(b) => w.write_bool(*b),
        PropertyValue::Id(id) => match registry.id_format() {
            IdFormat::Plain => encode_id(w, id),
            IdFormat::Tagged(style) => encode_id_with_type_tag(w, id, &style),
        },
        PropertyValue::List(items) => {
            w.begin_array()?;
            for item in items {
                encode_property_value(w, item, registry)?;
            }
            w.end_array()
        }
        PropertyValue::Nested(v) => w.write_serialize(v),
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Endpoint fields of a decoded edge document.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointsDoc {
    pub out_v: serde_json::Value,
    pub out_v_label: String,
    pub in_v: serde_json::Value,
    pub in_v_label: String,
}

/// A decoded vertex or edge document.
///
/// Ids stay raw JSON scalars. Numbers in `properties` come back from the
/// generic decoder as they were parsed; use [`ElementDoc::property_as`] to
/// narrow them to a known kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawElementDoc")]
pub struct ElementDoc {
    pub id: serde_json::Value,
    pub label: String,
    pub kind: ElementKind,
    pub endpoints: Option<EndpointsDoc>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawElementDoc {
    id: serde_json::Value,
    label: String,
    #[serde(rename = "type")]
    kind: ElementKind,
    #[serde(rename = "outV")]
    out_v: Option<serde_json::Value>,
    #[serde(rename = "outVLabel")]
    out_v_label: Option<String>,
    #[serde(rename = "inV")]
    in_v: Option<serde_json::Value>,
    #[serde(rename = "inVLabel")]
    in_v_label: Option<String>,
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
}

fn check_id_scalar(value: &serde_json::Value) -> Result<(), FormatError> {
    match value {
        serde_json::Value::Number(_) | serde_json::Value::String(_) => Ok(()),
        other => Err(FormatError::TypeMismatch {
            expected: "number or string id",
            found: json_type_name(other),
        }),
    }
}

impl TryFrom<RawElementDoc> for ElementDoc {
    type Error = FormatError;

    fn try_from(raw: RawElementDoc) -> Result<Self, Self::Error> {
        check_id_scalar(&raw.id)?;

        let endpoints = match raw.kind {
            ElementKind::Vertex => {
                let present = [
                    ("outV", raw.out_v.is_some()),
                    ("outVLabel", raw.out_v_label.is_some()),
                    ("inV", raw.in_v.is_some()),
                    ("inVLabel", raw.in_v_label.is_some()),
                ];
                if let Some((field, _)) = present.into_iter().find(|(_, p)| *p) {
                    return Err(FormatError::UnexpectedEndpoint { field });
                }
                None
            }
            ElementKind::Edge => {
                let out_v = raw.out_v.ok_or(FormatError::MissingEndpoint { field: "outV" })?;
                let out_v_label = raw
                    .out_v_label
                    .ok_or(FormatError::MissingEndpoint { field: "outVLabel" })?;
                let in_v = raw.in_v.ok_or(FormatError::MissingEndpoint { field: "inV" })?;
                let in_v_label = raw
                    .in_v_label
                    .ok_or(FormatError::MissingEndpoint { field: "inVLabel" })?;
                check_id_scalar(&out_v)?;
                check_id_scalar(&in_v)?;
                Some(EndpointsDoc {
                    out_v,
                    out_v_label,
                    in_v,
                    in_v_label,
                })
            }
        };

        Ok(ElementDoc {
            id: raw.id,
            label: raw.label,
            kind: raw.kind,
            endpoints,
            properties: raw.properties,
        })
    }
}

impl ElementDoc {
    /// Returns a property as the generic decoder sees it, numbers widened to `Float64`.
    ///
    /// Missing keys and JSON `null` both yield `None`.
    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        self.properties
            .get(key)
            .cloned()
            .and_then(PropertyValue::from_json)
    }

    /// Returns a property narrowed to `kind`.
    pub fn property_as(&self, key: &str, kind: NumberKind) -> Option<PropertyValue> {
        self.property(key).map(|v| narrow_number(v, kind))
    }

    /// Reads a timestamp property written as epoch milliseconds or RFC 3339.
    pub fn timestamp(&self, key: &str) -> Result<Option<Timestamp>, FormatError> {
        match self.properties.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => decode_timestamp_as(value, TimestampFormat::Rfc3339).map(Some),
        }
    }

    pub fn is_edge(&self) -> bool {
        self.kind == ElementKind::Edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::TypeTagStyle;
    use crate::model::{EdgeBuilder, Id, VertexBuilder};
    use serde_json::json;

    fn encode_v(vertex: &Vertex, registry: &Registry) -> String {
        let mut w = JsonWriter::new();
        encode_vertex(&mut w, vertex, registry).unwrap();
        w.into_string().unwrap()
    }

    fn encode_e(edge: &Edge, registry: &Registry) -> String {
        let mut w = JsonWriter::new();
        encode_edge(&mut w, edge, registry).unwrap();
        w.into_string().unwrap()
    }

    fn alice() -> Vertex {
        VertexBuilder::new(42, "person")
            .properties(|p| p.text("name", "alice").int32("age", 30))
            .build()
    }

    #[test]
    fn test_vertex_golden() {
        assert_eq!(
            encode_v(&alice(), &Registry::default()),
            r#"{"id":42,"label":"person","type":"vertex","properties":{"name":"alice","age":30}}"#
        );
    }

    #[test]
    fn test_edge_golden() {
        let edge = EdgeBuilder::new(
            "S1:person>>knows>>S2:person",
            "knows",
            Endpoint::new(1, "person"),
            Endpoint::new(2, "person"),
        )
        .properties(|p| p.timestamp("since", Timestamp::from_millis(1609459200000)))
        .build();

        assert_eq!(
            encode_e(&edge, &Registry::default()),
            r#"{"id":"S1:person>>knows>>S2:person","label":"knows","type":"edge","outV":1,"outVLabel":"person","inV":2,"inVLabel":"person","properties":{"since":1609459200000}}"#
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let v = alice();
        let registry = Registry::default();
        assert_eq!(encode_v(&v, &registry), encode_v(&v, &registry));
    }

    #[test]
    fn test_top_level_field_order() {
        let registry = Registry::default();
        let vertex: serde_json::Value = serde_json::from_str(&encode_v(&alice(), &registry)).unwrap();
        let keys: Vec<&str> = vertex.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "label", "type", "properties"]);

        let edge = Edge::new(7, "knows", Endpoint::new(1, "a"), Endpoint::new(2, "b"));
        let edge: serde_json::Value = serde_json::from_str(&encode_e(&edge, &registry)).unwrap();
        let keys: Vec<&str> = edge.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["id", "label", "type", "outV", "outVLabel", "inV", "inVLabel", "properties"]
        );
    }

    #[test]
    fn test_null_property() {
        let v = VertexBuilder::new(1, "person").properties(|p| p.null("nickname")).build();
        assert_eq!(
            encode_v(&v, &Registry::default()),
            r#"{"id":1,"label":"person","type":"vertex","properties":{"nickname":null}}"#
        );
    }

    #[test]
    fn test_every_value_variant() {
        let v = VertexBuilder::new("v", "thing")
            .properties(|p| {
                p.int8("i8", -3)
                    .int64("i64", 1 << 40)
                    .float32("f32", 0.5)
                    .float64("f64", 2.25)
                    .bool("ok", false)
                    .id_value("ref", 9)
                    .value(
                        "list",
                        vec![PropertyValue::from(1i32), PropertyValue::from("x"), PropertyValue::from(Id::text("t"))],
                    )
                    .value("nested", json!({"a": [1, null]}))
            })
            .build();
        assert_eq!(
            encode_v(&v, &Registry::default()),
            concat!(
                r#"{"id":"v","label":"thing","type":"vertex","properties":{"#,
                r#""i8":-3,"i64":1099511627776,"f32":0.5,"f64":2.25,"ok":false,"ref":9,"#,
                r#""list":[1,"x","t"],"nested":{"a":[1,null]}}}"#
            )
        );
    }

    #[test]
    fn test_registry_controls_timestamps_and_tags() {
        let registry = Registry::builder()
            .timestamps(TimestampFormat::Rfc3339)
            .tag_ids(TypeTagStyle::WrapperArray)
            .build();
        let v = VertexBuilder::new(5, "event")
            .properties(|p| {
                p.timestamp("at", Timestamp::from_millis(1609459200000))
                    .id_value("by", 7)
                    .value("refs", vec![PropertyValue::Id(Id::text("x"))])
            })
            .build();
        // The element id itself is never tagged.
        assert_eq!(
            encode_v(&v, &registry),
            r#"{"id":5,"label":"event","type":"vertex","properties":{"at":"2021-01-01T00:00:00Z","by":["numeric",7],"refs":[["textual","x"]]}}"#
        );
    }

    #[test]
    fn test_property_failure_names_context() {
        let v = VertexBuilder::new(7, "person")
            .properties(|p| p.text("name", "bob").float64("score", f64::NAN))
            .build();
        let mut w = JsonWriter::new();
        let err = encode_vertex(&mut w, &v, &Registry::default()).unwrap_err();

        match &err {
            EncodeError::Property {
                key,
                value,
                element,
                source,
            } => {
                assert_eq!(key, "score");
                assert_eq!(value, "Float64(NaN)");
                assert_eq!(element, "vertex 7:person");
                assert!(matches!(**source, EncodeError::NonFiniteFloat { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Output up to the failing value stays in the writer.
        assert!(!w.is_complete());
        assert_eq!(
            std::str::from_utf8(w.as_bytes()).unwrap(),
            r#"{"id":7,"label":"person","type":"vertex","properties":{"name":"bob","score":"#
        );
    }

    #[test]
    fn test_nested_list_failure_is_wrapped() {
        let e = Edge::new(3, "rates", Endpoint::new(1, "a"), Endpoint::new(2, "b"))
            .with_property("weights", vec![PropertyValue::Float32(f32::INFINITY)]);
        let mut w = JsonWriter::new();
        let err = encode_edge(&mut w, &e, &Registry::default()).unwrap_err();
        assert!(err.to_string().contains("edge 3:rates (1 -> 2)"));
    }

    #[test]
    fn test_encode_endpoint() {
        let mut w = JsonWriter::new();
        encode_endpoint(&mut w, &Endpoint::new("a", "person")).unwrap();
        assert_eq!(w.into_string().unwrap(), r#"{"id":"a","label":"person"}"#);
    }

    #[test]
    fn test_decode_vertex_doc() {
        let doc: ElementDoc = serde_json::from_str(
            r#"{"properties":{"name":"alice","age":30},"type":"vertex","label":"person","id":42}"#,
        )
        .unwrap();
        assert_eq!(doc.id, json!(42));
        assert_eq!(doc.kind, ElementKind::Vertex);
        assert!(doc.endpoints.is_none());
        assert_eq!(doc.property("name"), Some(PropertyValue::Text("alice".to_string())));
        assert_eq!(doc.property("age"), Some(PropertyValue::Float64(30.0)));
        assert_eq!(doc.property_as("age", NumberKind::Int32), Some(PropertyValue::Int32(30)));
        assert_eq!(doc.property("missing"), None);
        let keys: Vec<&str> = doc.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "age"]);
    }

    #[test]
    fn test_decode_edge_doc() {
        let doc: ElementDoc = serde_json::from_str(
            r#"{"id":"e","label":"knows","type":"edge","outV":1,"outVLabel":"person","inV":"b","inVLabel":"person","properties":{"since":1609459200000}}"#,
        )
        .unwrap();
        assert!(doc.is_edge());
        let ends = doc.endpoints.as_ref().unwrap();
        assert_eq!(ends.out_v, json!(1));
        assert_eq!(ends.in_v, json!("b"));
        assert_eq!(doc.timestamp("since"), Ok(Some(Timestamp::from_millis(1609459200000))));
        assert_eq!(doc.timestamp("until"), Ok(None));
    }

    #[test]
    fn test_decode_rejects_bad_endpoints() {
        let err = serde_json::from_str::<ElementDoc>(
            r#"{"id":1,"label":"knows","type":"edge","outV":1,"outVLabel":"a","inV":2}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("inVLabel"));

        let err = serde_json::from_str::<ElementDoc>(
            r#"{"id":1,"label":"person","type":"vertex","outV":1}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("outV"));

        let err = serde_json::from_str::<ElementDoc>(r#"{"id":[1],"label":"x","type":"vertex"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_decode_missing_properties_is_empty() {
        let doc: ElementDoc =
            serde_json::from_str(r#"{"id":"v","label":"thing","type":"vertex"}"#).unwrap();
        assert!(doc.properties.is_empty());
    }

    #[test]
    fn test_round_trip_through_doc() {
        let text = encode_v(&alice(), &Registry::default());
        let doc: ElementDoc = serde_json::from_str(&text).unwrap();
        assert_eq!(doc.id.as_i64(), Some(42));
        assert_eq!(doc.label, "person");
        assert_eq!(doc.property_as("age", NumberKind::Int32), Some(PropertyValue::Int32(30)));
    }
}
