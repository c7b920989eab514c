//! Timestamp encoding and numeric narrowing.
//!
//! Generic JSON decoding yields a double for every unannotated number.
//! [`narrow_number`] converts such a value back to the numeric kind the
//! caller knows it was meant to be.

use crate::codec::primitives::JsonWriter;
use crate::error::{EncodeError, FormatError};
use crate::limits::MAX_SAFE_INTEGER;
use crate::model::{NumberKind, PropertyValue, Timestamp};
use crate::util::datetime::{
    format_timestamp_rfc3339, parse_timestamp_rfc3339, RFC3339_MAX_MILLIS, RFC3339_MIN_MILLIS,
};

/// How timestamps are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimestampFormat {
    /// Integer milliseconds since the Unix epoch.
    #[default]
    EpochMillis,
    /// RFC 3339 UTC string with millisecond precision.
    Rfc3339,
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Writes a timestamp as integer epoch milliseconds.
pub fn encode_timestamp(w: &mut JsonWriter, ts: Timestamp) -> Result<(), EncodeError> {
    w.write_i64(ts.as_millis())
}

/// Writes a timestamp in the given format.
///
/// RFC 3339 output needs a four-digit year; timestamps outside years
/// 0000..=9999 fail with [`EncodeError::TimestampOutOfRange`].
pub fn encode_timestamp_as(
    w: &mut JsonWriter,
    ts: Timestamp,
    format: TimestampFormat,
) -> Result<(), EncodeError> {
    match format {
        TimestampFormat::EpochMillis => encode_timestamp(w, ts),
        TimestampFormat::Rfc3339 => {
            let millis = ts.as_millis();
            if !(RFC3339_MIN_MILLIS..=RFC3339_MAX_MILLIS).contains(&millis) {
                return Err(EncodeError::TimestampOutOfRange { millis });
            }
            w.write_str(&format_timestamp_rfc3339(millis))
        }
    }
}

/// Reads a timestamp from an integral JSON number of epoch milliseconds.
pub fn decode_timestamp(value: &serde_json::Value) -> Result<Timestamp, FormatError> {
    let serde_json::Value::Number(n) = value else {
        return Err(FormatError::NotANumber {
            found: json_type_name(value),
        });
    };
    if let Some(millis) = n.as_i64() {
        return Ok(Timestamp::from_millis(millis));
    }
    if n.is_u64() {
        return Err(FormatError::OutOfRange {
            value: n.to_string(),
            target: "timestamp",
        });
    }
    match n.as_f64() {
        Some(f) => Timestamp::from_f64(f),
        None => Err(FormatError::NotANumber { found: "number" }),
    }
}

/// Reads a timestamp written in `format`.
///
/// RFC 3339 input also accepts epoch-millisecond numbers.
pub fn decode_timestamp_as(
    value: &serde_json::Value,
    format: TimestampFormat,
) -> Result<Timestamp, FormatError> {
    match (format, value) {
        (TimestampFormat::Rfc3339, serde_json::Value::String(s)) => parse_timestamp_rfc3339(s)
            .map(Timestamp::from_millis)
            .map_err(|e| FormatError::InvalidDatetime(e.message)),
        _ => decode_timestamp(value),
    }
}

/// Names the JSON type of a value for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// =============================================================================
// NARROWING
// =============================================================================

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

fn as_number(value: &PropertyValue) -> Option<Number> {
    match *value {
        PropertyValue::Int8(v) => Some(Number::Int(i64::from(v))),
        PropertyValue::Int32(v) => Some(Number::Int(i64::from(v))),
        PropertyValue::Int64(v) => Some(Number::Int(v)),
        PropertyValue::Float32(v) => Some(Number::Float(f64::from(v))),
        PropertyValue::Float64(v) => Some(Number::Float(v)),
        _ => None,
    }
}

/// Float -> int truncates toward zero and saturates; int -> narrower int wraps.
/// Bytes go through i32 first, as a byte cast of a double does.
fn convert(number: Number, kind: NumberKind) -> PropertyValue {
    match (number, kind) {
        (Number::Int(i), NumberKind::Int8) => PropertyValue::Int8(i as i8),
        (Number::Float(f), NumberKind::Int8) => PropertyValue::Int8((f as i32) as i8),
        (Number::Int(i), NumberKind::Int32) => PropertyValue::Int32(i as i32),
        (Number::Float(f), NumberKind::Int32) => PropertyValue::Int32(f as i32),
        (Number::Int(i), NumberKind::Int64) => PropertyValue::Int64(i),
        (Number::Float(f), NumberKind::Int64) => PropertyValue::Int64(f as i64),
        (Number::Int(i), NumberKind::Float32) => PropertyValue::Float32(i as f32),
        (Number::Float(f), NumberKind::Float32) => PropertyValue::Float32(f as f32),
        (Number::Int(i), NumberKind::Float64) => PropertyValue::Float64(i as f64),
        (Number::Float(f), NumberKind::Float64) => PropertyValue::Float64(f),
    }
}

/// Returns the float that may have lost integer precision before narrowing.
fn lossy_source(number: Number, kind: NumberKind) -> Option<f64> {
    match (number, kind) {
        (Number::Float(f), NumberKind::Int64) if f.abs() > MAX_SAFE_INTEGER as f64 => Some(f),
        _ => None,
    }
}

/// Narrows a numeric value to `kind`; non-numeric values pass through unchanged.
///
/// Doubles above 2^53 in magnitude may already have lost precision during
/// generic decoding. Narrowing them to `Int64` still succeeds but logs a
/// warning; use [`narrow_number_checked`] to reject them instead.
pub fn narrow_number(value: PropertyValue, kind: NumberKind) -> PropertyValue {
    let Some(number) = as_number(&value) else {
        return value;
    };
    if let Some(f) = lossy_source(number, kind) {
        tracing::warn!(
            value = f,
            kind = kind.name(),
            "narrowing a double beyond 2^53, integer precision may be lost"
        );
    }
    convert(number, kind)
}

/// Like [`narrow_number`], but fails instead of narrowing a double that
/// cannot be an exact 64-bit integer.
pub fn narrow_number_checked(
    value: PropertyValue,
    kind: NumberKind,
) -> Result<PropertyValue, FormatError> {
    let Some(number) = as_number(&value) else {
        return Ok(value);
    };
    if let Some(f) = lossy_source(number, kind) {
        return Err(FormatError::PrecisionLoss { value: f, kind });
    }
    Ok(convert(number, kind))
}
