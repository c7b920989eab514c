//! Identifiers for vertices, edges and property keys.
//!
//! An identifier is either a 64-bit integer or a string. The active variant
//! is always queried through [`Id::is_numeric`]; a textual id that happens to
//! look like a number stays textual.

use std::fmt;

use serde::{Serialize, Serializer};

/// Type id emitted for numeric identifiers in tagged positions.
pub const NUMERIC_TYPE_NAME: &str = "numeric";

/// Type id emitted for textual identifiers in tagged positions.
pub const TEXTUAL_TYPE_NAME: &str = "textual";

/// A vertex, edge or property-key identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Id {
    /// Integer identifier.
    Numeric(i64),
    /// String identifier.
    Textual(String),
}

impl Id {
    /// Creates a numeric identifier.
    pub fn numeric(value: i64) -> Self {
        Id::Numeric(value)
    }

    /// Creates a textual identifier.
    pub fn text(value: impl Into<String>) -> Self {
        Id::Textual(value.into())
    }

    /// Returns true if this is the numeric variant.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Id::Numeric(_))
    }

    /// Returns the integer value of a numeric id.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Id::Numeric(n) => Some(*n),
            Id::Textual(_) => None,
        }
    }

    /// Returns the string value of a textual id.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Id::Numeric(_) => None,
            Id::Textual(s) => Some(s),
        }
    }

    /// Returns the type id used when this identifier is written with a type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Id::Numeric(_) => NUMERIC_TYPE_NAME,
            Id::Textual(_) => TEXTUAL_TYPE_NAME,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Numeric(n) => write!(f, "{}", n),
            Id::Textual(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Numeric(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Id::Numeric(i64::from(value))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Textual(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Textual(value)
    }
}

/// Ids nested inside generic structures serialize as their plain scalar.
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Id::Numeric(n) => serializer.serialize_i64(*n),
            Id::Textual(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_is_never_inferred_from_content() {
        let id = Id::text("42");
        assert!(!id.is_numeric());
        assert_eq!(id.as_i64(), None);
        assert_eq!(id.as_str(), Some("42"));
        assert_eq!(id.type_name(), TEXTUAL_TYPE_NAME);
    }

    #[test]
    fn test_numeric_accessors() {
        let id = Id::numeric(-7);
        assert!(id.is_numeric());
        assert_eq!(id.as_i64(), Some(-7));
        assert_eq!(id.as_str(), None);
        assert_eq!(id.type_name(), NUMERIC_TYPE_NAME);
    }

    #[test]
    fn test_display() {
        assert_eq!(Id::numeric(42).to_string(), "42");
        assert_eq!(Id::text("S1:person").to_string(), "S1:person");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Id::from(5i64), Id::Numeric(5));
        assert_eq!(Id::from("a"), Id::Textual("a".to_string()));
        assert_eq!(Id::from("b".to_string()), Id::Textual("b".to_string()));
    }

    #[test]
    fn test_serialize_as_plain_scalar() {
        assert_eq!(serde_json::to_string(&Id::numeric(1)).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Id::text("x\"y")).unwrap(), r#""x\"y""#);
    }
}
