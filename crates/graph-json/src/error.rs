//! Error types for graph JSON encoding and decoding.

use thiserror::Error;

use crate::model::NumberKind;

/// A malformed or type-mismatched scalar found while decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("expected a JSON number, found {found}")]
    NotANumber { found: &'static str },

    #[error("expected an integral number, found {value}")]
    NotIntegral { value: f64 },

    #[error("number {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{value} exceeds 2^53 and cannot be narrowed to {kind:?} without precision loss")]
    PrecisionLoss { value: f64, kind: NumberKind },

    #[error("invalid RFC 3339 datetime: {0}")]
    InvalidDatetime(String),

    #[error("edge document is missing endpoint field {field}")]
    MissingEndpoint { field: &'static str },

    #[error("vertex document carries endpoint field {field}")]
    UnexpectedEndpoint { field: &'static str },
}

/// Error while producing JSON text from a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("float value {value} is not finite")]
    NonFiniteFloat { value: f64 },

    #[error("timestamp {millis}ms falls outside years 0000..=9999 and has no RFC 3339 form")]
    TimestampOutOfRange { millis: i64 },

    #[error("writer misuse: {context}")]
    WriterState { context: &'static str },

    #[error("json serialization failed: {0}")]
    Json(String),

    #[error("failed to write output: {0}")]
    Io(String),

    #[error("failed to serialize property({key}: {value}) for {element}: {source}")]
    Property {
        key: String,
        value: String,
        element: String,
        source: Box<EncodeError>,
    },
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json(err.to_string())
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Io(err.to_string())
    }
}

/// Error while producing a value from JSON text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("json text can't be empty for '{target}'")]
    EmptyInput { target: String },

    #[error("json text length {len} exceeds maximum {max}")]
    InputTooLarge { len: usize, max: usize },

    #[error("failed to decode '{target}': {message}")]
    Parse { target: String, message: String },

    #[error(transparent)]
    Format(#[from] FormatError),
}
