//! Property-based tests for the JSON codec.

#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use crate::codec::element::ElementDoc;
use crate::codec::registry::Registry;
use crate::codec::scalar::{decode_timestamp_as, narrow_number, TimestampFormat};
use crate::codec::text::{from_text, to_text};
use crate::error::DecodeError;
use crate::model::{Id, NumberKind, PropertyValue, Timestamp, Vertex};
use crate::util::datetime::{RFC3339_MAX_MILLIS, RFC3339_MIN_MILLIS};

const RFC3339_MILLIS: std::ops::RangeInclusive<i64> = RFC3339_MIN_MILLIS..=RFC3339_MAX_MILLIS;

fn arb_kind() -> impl Strategy<Value = NumberKind> {
    prop::sample::select(NumberKind::ALL.to_vec())
}

fn arb_number() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        any::<i8>().prop_map(PropertyValue::Int8),
        any::<i32>().prop_map(PropertyValue::Int32),
        any::<i64>().prop_map(PropertyValue::Int64),
        any::<f32>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(PropertyValue::Float32),
        any::<f64>().prop_filter("not NaN", |f| !f.is_nan()).prop_map(PropertyValue::Float64),
    ]
}

fn arb_scalar() -> impl Strategy<Value = PropertyValue> {
    prop_oneof![
        any::<i32>().prop_map(PropertyValue::Int32),
        any::<i64>().prop_map(PropertyValue::Int64),
        any::<bool>().prop_map(PropertyValue::Bool),
        ".*".prop_map(PropertyValue::Text),
        any::<i64>().prop_map(|ms| PropertyValue::Timestamp(Timestamp::from_millis(ms))),
    ]
}

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    (
        any::<i64>(),
        "[a-z][a-z_]{0,12}",
        prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_]{0,8}", arb_scalar()), 0..8),
    )
        .prop_map(|(id, label, properties)| {
            properties
                .into_iter()
                .fold(Vertex::new(id, label), |v, (key, value)| v.with_property(&key, value))
        })
}

proptest! {
    #[test]
    fn timestamp_roundtrip(ms in any::<i64>()) {
        let ts = Timestamp::from_millis(ms);
        let text = to_text(&ts).unwrap();
        prop_assert_eq!(from_text::<Timestamp>(&text).unwrap(), ts);
    }

    #[test]
    fn timestamp_rfc3339_roundtrip(ms in RFC3339_MILLIS) {
        let registry = Registry::builder().timestamps(TimestampFormat::Rfc3339).build();
        let ts = Timestamp::from_millis(ms);
        let text = registry.to_text(&ts).unwrap();
        let value: serde_json::Value = registry.from_text(&text).unwrap();
        prop_assert_eq!(decode_timestamp_as(&value, TimestampFormat::Rfc3339).unwrap(), ts);
    }

    #[test]
    fn numeric_id_is_bare_number(n in any::<i64>()) {
        prop_assert_eq!(to_text(&Id::numeric(n)).unwrap(), n.to_string());
    }

    #[test]
    fn textual_id_is_json_string(s in ".*") {
        let text = to_text(&Id::text(s.clone())).unwrap();
        prop_assert_eq!(&text, &serde_json::to_string(&s).unwrap());
        prop_assert_eq!(from_text::<String>(&text).unwrap(), s);
    }

    #[test]
    fn narrowing_is_idempotent(value in arb_number(), kind in arb_kind()) {
        let once = narrow_number(value, kind);
        prop_assert_eq!(once.number_kind(), Some(kind));
        let twice = narrow_number(once.clone(), kind);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn blank_text_is_empty_input(text in "[ \t\r\n]{0,16}") {
        let is_empty_input = |r: Result<(), DecodeError>| matches!(r, Err(DecodeError::EmptyInput { .. }));
        prop_assert!(is_empty_input(from_text::<serde_json::Value>(&text).map(|_| ())));
        prop_assert!(is_empty_input(from_text::<ElementDoc>(&text).map(|_| ())));
        prop_assert!(is_empty_input(from_text::<Timestamp>(&text).map(|_| ())));
    }

    #[test]
    fn vertex_encodes_deterministically(vertex in arb_vertex()) {
        let first = to_text(&vertex).unwrap();
        prop_assert_eq!(&first, &to_text(&vertex).unwrap());

        let doc: ElementDoc = from_text(&first).unwrap();
        prop_assert_eq!(doc.id.as_i64(), vertex.id.as_i64());
        prop_assert_eq!(&doc.label, &vertex.label);
        let keys: Vec<&str> = doc.properties.keys().map(String::as_str).collect();
        let expected: Vec<&str> = vertex.properties.values().map(|p| p.key.as_str()).collect();
        prop_assert_eq!(keys, expected);
    }
}
