//! Text facade.
//!
//! `to_text` / `from_text` turn values into compact JSON text and back. The
//! free functions use [`default_registry`]; the methods on [`Registry`] use an
//! explicit table.

use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::element::{encode_edge, encode_endpoint, encode_property_value, encode_vertex};
use crate::codec::id::encode_id;
use crate::codec::primitives::JsonWriter;
use crate::codec::registry::{default_registry, PrecisionPolicy, Registry};
use crate::codec::scalar::{
    decode_timestamp_as, encode_timestamp_as, json_type_name, narrow_number, narrow_number_checked,
};
use crate::error::{DecodeError, EncodeError, FormatError};
use crate::model::{Edge, Endpoint, Id, NumberKind, PropertyValue, Timestamp, Vertex};

// =============================================================================
// ENCODING
// =============================================================================

/// Starting buffer size for one encoded document; a small element fits without regrowth.
const INITIAL_TEXT_CAPACITY: usize = 256;

/// A value the codec knows how to write.
pub trait JsonEncode {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError>;
}

/// Encodes any `Serialize` value with the generic structural encoder.
#[derive(Debug, Clone, Copy)]
pub struct Generic<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> JsonEncode for Generic<'_, T> {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_serialize(self.0)
    }
}

impl JsonEncode for Id {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        encode_id(w, self)
    }
}

impl JsonEncode for Timestamp {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        encode_timestamp_as(w, *self, registry.timestamp_format())
    }
}

impl JsonEncode for PropertyValue {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        encode_property_value(w, self, registry)
    }
}

impl JsonEncode for Vertex {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        encode_vertex(w, self, registry)
    }
}

impl JsonEncode for Edge {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        encode_edge(w, self, registry)
    }
}

impl JsonEncode for Endpoint {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        encode_endpoint(w, self)
    }
}

impl JsonEncode for serde_json::Value {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_serialize(self)
    }
}

impl JsonEncode for str {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_str(self)
    }
}

impl JsonEncode for String {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_str(self)
    }
}

impl JsonEncode for bool {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_bool(*self)
    }
}

impl JsonEncode for i64 {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_i64(*self)
    }
}

impl JsonEncode for f64 {
    fn encode_json(&self, w: &mut JsonWriter, _registry: &Registry) -> Result<(), EncodeError> {
        w.write_f64(*self)
    }
}

impl<T: JsonEncode> JsonEncode for Option<T> {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        match self {
            Some(value) => value.encode_json(w, registry),
            None => w.write_null(),
        }
    }
}

impl<T: JsonEncode> JsonEncode for [T] {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        w.begin_array()?;
        for item in self {
            item.encode_json(w, registry)?;
        }
        w.end_array()
    }
}

impl<T: JsonEncode> JsonEncode for Vec<T> {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        self.as_slice().encode_json(w, registry)
    }
}

impl<T: JsonEncode + ?Sized> JsonEncode for &T {
    fn encode_json(&self, w: &mut JsonWriter, registry: &Registry) -> Result<(), EncodeError> {
        (**self).encode_json(w, registry)
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Describes the expected type of a decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Whatever the generic decoder produces.
    Any,
    Number(NumberKind),
    Timestamp,
    Text,
    Bool,
    Id,
    List(Box<Shape>),
}

impl Shape {
    pub fn list_of(inner: Shape) -> Self {
        Shape::List(Box::new(inner))
    }

    fn name(&self) -> String {
        match self {
            Shape::Any => "any".to_string(),
            Shape::Number(kind) => kind.name().to_string(),
            Shape::Timestamp => "timestamp".to_string(),
            Shape::Text => "text".to_string(),
            Shape::Bool => "bool".to_string(),
            Shape::Id => "id".to_string(),
            Shape::List(inner) => format!("list<{}>", inner.name()),
        }
    }
}

impl Registry {
    /// Encodes a value to compact JSON text.
    pub fn to_text<T: JsonEncode + ?Sized>(&self, value: &T) -> Result<String, EncodeError> {
        let mut w = JsonWriter::with_capacity(INITIAL_TEXT_CAPACITY);
        value.encode_json(&mut w, self)?;
        let text = w.into_string()?;
        tracing::debug!(len = text.len(), "encoded json text");
        Ok(text)
    }

    /// Encodes a value and writes the whole text to `sink`.
    ///
    /// Nothing reaches the sink if encoding fails.
    pub fn to_writer<T, W>(&self, value: &T, mut sink: W) -> Result<(), EncodeError>
    where
        T: JsonEncode + ?Sized,
        W: io::Write,
    {
        let text = self.to_text(value)?;
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Decodes JSON text into `T`.
    pub fn from_text<T: DeserializeOwned>(&self, text: &str) -> Result<T, DecodeError> {
        let target = std::any::type_name::<T>();
        self.check_input(text, target)?;
        tracing::debug!(target_type = target, len = text.len(), "decoding json text");
        serde_json::from_str(text).map_err(|e| DecodeError::Parse {
            target: target.to_string(),
            message: e.to_string(),
        })
    }

    /// Decodes JSON text into a property value of the given shape.
    ///
    /// Numbers are decoded generically (as doubles) and then narrowed, so
    /// integers beyond 2^53 are subject to the registry's precision policy.
    /// A top-level `null` yields `None`.
    pub fn from_text_shape(
        &self,
        text: &str,
        shape: &Shape,
    ) -> Result<Option<PropertyValue>, DecodeError> {
        let target = shape.name();
        self.check_input(text, &target)?;
        tracing::debug!(shape = %target, len = text.len(), "decoding json text by shape");
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| DecodeError::Parse {
                target: target.clone(),
                message: e.to_string(),
            })?;
        Ok(self.apply_shape(value, shape)?)
    }

    fn check_input(&self, text: &str, target: &str) -> Result<(), DecodeError> {
        if text.trim().is_empty() {
            return Err(DecodeError::EmptyInput {
                target: target.to_string(),
            });
        }
        if text.len() > self.max_text_len() {
            return Err(DecodeError::InputTooLarge {
                len: text.len(),
                max: self.max_text_len(),
            });
        }
        Ok(())
    }

    fn apply_shape(
        &self,
        value: serde_json::Value,
        shape: &Shape,
    ) -> Result<Option<PropertyValue>, FormatError> {
        use serde_json::Value as Json;

        if value.is_null() {
            return Ok(None);
        }
        let decoded = match (shape, value) {
            (Shape::Any, value) => return Ok(PropertyValue::from_json(value)),
            (Shape::Number(kind), Json::Number(n)) => {
                let widened = n
                    .as_f64()
                    .map(PropertyValue::Float64)
                    .ok_or(FormatError::NotANumber { found: "number" })?;
                match self.precision() {
                    PrecisionPolicy::Warn => narrow_number(widened, *kind),
                    PrecisionPolicy::Reject => narrow_number_checked(widened, *kind)?,
                }
            }
            (Shape::Number(_), other) => {
                return Err(FormatError::NotANumber {
                    found: json_type_name(&other),
                });
            }
            (Shape::Timestamp, value) => {
                PropertyValue::Timestamp(decode_timestamp_as(&value, self.timestamp_format())?)
            }
            (Shape::Text, Json::String(s)) => PropertyValue::Text(s),
            (Shape::Bool, Json::Bool(b)) => PropertyValue::Bool(b),
            (Shape::Id, Json::String(s)) => PropertyValue::Id(Id::Textual(s)),
            (Shape::Id, Json::Number(n)) => PropertyValue::Id(Id::Numeric(numeric_id(&n)?)),
            (Shape::List(inner), Json::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let decoded = self
                        .apply_shape(item, inner)?
                        .unwrap_or(PropertyValue::Nested(Json::Null));
                    out.push(decoded);
                }
                PropertyValue::List(out)
            }
            (shape, other) => {
                return Err(FormatError::TypeMismatch {
                    expected: shape_json_type(shape),
                    found: json_type_name(&other),
                });
            }
        };
        Ok(Some(decoded))
    }
}

/// Reads an integral id, including whole numbers the parser kept as doubles (`42.0`, `1e3`).
fn numeric_id(n: &serde_json::Number) -> Result<i64, FormatError> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    let out_of_range = || FormatError::OutOfRange {
        value: n.to_string(),
        target: "numeric id",
    };
    let f = n.as_f64().ok_or_else(out_of_range)?;
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(FormatError::NotIntegral { value: f });
    }
    // i64::MIN is exactly representable, i64::MAX rounds up to 2^63.
    if f < -9_223_372_036_854_775_808.0 || f >= 9_223_372_036_854_775_808.0 {
        return Err(out_of_range());
    }
    Ok(f as i64)
}

fn shape_json_type(shape: &Shape) -> &'static str {
    match shape {
        Shape::Any => "any",
        Shape::Number(_) | Shape::Timestamp => "number",
        Shape::Text => "string",
        Shape::Bool => "bool",
        Shape::Id => "number or string id",
        Shape::List(_) => "array",
    }
}

// =============================================================================
// DEFAULT REGISTRY
// =============================================================================

/// Encodes a value with the default registry.
pub fn to_text<T: JsonEncode + ?Sized>(value: &T) -> Result<String, EncodeError> {
    default_registry().to_text(value)
}

/// Encodes a value with the default registry and writes it to `sink`.
pub fn to_writer<T: JsonEncode + ?Sized, W: io::Write>(
    value: &T,
    sink: W,
) -> Result<(), EncodeError> {
    default_registry().to_writer(value, sink)
}

/// Decodes JSON text with the default registry.
pub fn from_text<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    default_registry().from_text(text)
}

/// Decodes JSON text of a known shape with the default registry.
pub fn from_text_shape(text: &str, shape: &Shape) -> Result<Option<PropertyValue>, DecodeError> {
    default_registry().from_text_shape(text, shape)
}
