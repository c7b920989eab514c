//! Property values, timestamps and property maps.
//!
//! Property values form a closed set; the codec dispatches on them with an
//! exhaustive match instead of looking up an encoder by runtime type.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::FormatError;
use crate::model::Id;

/// Numeric kinds a decoded number can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Int8,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl NumberKind {
    /// All kinds, in widening order.
    pub const ALL: [NumberKind; 5] = [
        NumberKind::Int8,
        NumberKind::Int32,
        NumberKind::Int64,
        NumberKind::Float32,
        NumberKind::Float64,
    ];

    /// Returns the Rust name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            NumberKind::Int8 => "i8",
            NumberKind::Int32 => "i32",
            NumberKind::Int64 => "i64",
            NumberKind::Float32 => "f32",
            NumberKind::Float64 => "f64",
        }
    }
}

/// A point in time with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Returns milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the current time, truncated to milliseconds.
    pub fn now() -> Self {
        Timestamp::from(SystemTime::now())
    }

    /// Builds a timestamp from a JSON-decoded float that must be integral.
    pub fn from_f64(value: f64) -> Result<Self, FormatError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(FormatError::NotIntegral { value });
        }
        // i64::MIN is exactly representable, i64::MAX rounds up to 2^63.
        if value < -9_223_372_036_854_775_808.0 || value >= 9_223_372_036_854_775_808.0 {
            return Err(FormatError::OutOfRange {
                value: value.to_string(),
                target: "timestamp",
            });
        }
        Ok(Timestamp(value as i64))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Timestamp(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => {
                let millis = i64::try_from(before.duration().as_millis()).unwrap_or(i64::MAX);
                Timestamp(-millis)
            }
        }
    }
}

impl From<Timestamp> for SystemTime {
    fn from(ts: Timestamp) -> Self {
        let offset = Duration::from_millis(ts.0.unsigned_abs());
        if ts.0 >= 0 {
            UNIX_EPOCH + offset
        } else {
            UNIX_EPOCH - offset
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integral number of milliseconds since the epoch")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Ok(Timestamp(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        i64::try_from(v).map(Timestamp).map_err(|_| {
            E::custom(FormatError::OutOfRange {
                value: v.to_string(),
                target: "timestamp",
            })
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
        Timestamp::from_f64(v).map_err(E::custom)
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Point in time, encoded as epoch milliseconds by default.
    Timestamp(Timestamp),
    Int8(i8),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bool(bool),
    /// An identifier stored as a property value.
    Id(Id),
    /// Ordered values, each dispatched on its own.
    List(Vec<PropertyValue>),
    /// Any other structure, written by the generic JSON encoder.
    Nested(serde_json::Value),
}

impl PropertyValue {
    /// Returns the numeric kind of this value, if it is a number.
    pub fn number_kind(&self) -> Option<NumberKind> {
        match self {
            PropertyValue::Int8(_) => Some(NumberKind::Int8),
            PropertyValue::Int32(_) => Some(NumberKind::Int32),
            PropertyValue::Int64(_) => Some(NumberKind::Int64),
            PropertyValue::Float32(_) => Some(NumberKind::Float32),
            PropertyValue::Float64(_) => Some(NumberKind::Float64),
            _ => None,
        }
    }

    /// Returns true for the five numeric variants.
    pub fn is_number(&self) -> bool {
        self.number_kind().is_some()
    }

    /// Converts a generically decoded JSON value.
    ///
    /// Mirrors what an unannotated decode produces: every number is widened
    /// to `Float64`, objects stay `Nested`. Returns `None` for `null`; nulls
    /// inside arrays become `Nested(Null)`.
    pub fn from_json(value: serde_json::Value) -> Option<PropertyValue> {
        use serde_json::Value as Json;

        match value {
            Json::Null => None,
            Json::Bool(b) => Some(PropertyValue::Bool(b)),
            Json::Number(n) => n.as_f64().map(PropertyValue::Float64),
            Json::String(s) => Some(PropertyValue::Text(s)),
            Json::Array(items) => Some(PropertyValue::List(
                items
                    .into_iter()
                    .map(|item| {
                        PropertyValue::from_json(item)
                            .unwrap_or(PropertyValue::Nested(Json::Null))
                    })
                    .collect(),
            )),
            obj @ Json::Object(_) => Some(PropertyValue::Nested(obj)),
        }
    }
}

impl From<Timestamp> for PropertyValue {
    fn from(v: Timestamp) -> Self {
        PropertyValue::Timestamp(v)
    }
}

impl From<i8> for PropertyValue {
    fn from(v: i8) -> Self {
        PropertyValue::Int8(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int32(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int64(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float32(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float64(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

impl From<Id> for PropertyValue {
    fn from(v: Id) -> Self {
        PropertyValue::Id(v)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(v: Vec<PropertyValue>) -> Self {
        PropertyValue::List(v)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(v: serde_json::Value) -> Self {
        PropertyValue::Nested(v)
    }
}

/// A key/value attribute owned by an element. `None` is a null value.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The property key as written in the `properties` object.
    pub key: String,
    /// The value, or `None` for null.
    pub value: Option<PropertyValue>,
}

impl Property {
    /// Creates a property with a value.
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a property whose value is null.
    pub fn null(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

/// Properties of an element keyed by property-key id, in insertion order.
///
/// Re-inserting an existing id replaces the property in place, so encoded
/// output keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: Vec<(Id, Property)>,
    index: FxHashMap<Id, usize>,
}

impl PropertyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with room for `capacity` properties.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Inserts a property, returning the one it replaced.
    pub fn insert(&mut self, id: Id, property: Property) -> Option<Property> {
        if let Some(&pos) = self.index.get(&id) {
            return Some(std::mem::replace(&mut self.entries[pos].1, property));
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, property));
        None
    }

    /// Removes a property by id, preserving the order of the rest.
    pub fn remove(&mut self, id: &Id) -> Option<Property> {
        let pos = self.index.remove(id)?;
        let (_, property) = self.entries.remove(pos);
        for (_, slot) in self.index.iter_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(property)
    }

    /// Looks up a property by id.
    pub fn get(&self, id: &Id) -> Option<&Property> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    /// Looks up a property by its key string.
    pub fn get_by_key(&self, key: &str) -> Option<&Property> {
        self.entries.iter().map(|(_, p)| p).find(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(id, property)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &Property)> {
        self.entries.iter().map(|(id, p)| (id, p))
    }

    /// Iterates properties in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter().map(|(_, p)| p)
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(Id, Property)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (Id, Property)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = PropertyMap::with_capacity(iter.size_hint().0);
        for (id, property) in iter {
            map.insert(id, property);
        }
        map
    }
}
