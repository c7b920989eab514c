//! JSON encoding/decoding for graph elements.
//!
//! Encoding is hand-driven through [`JsonWriter`] so field order and number
//! forms are fixed. Decoding goes through `serde_json`, with numeric
//! narrowing applied afterwards where the caller knows the intended kind.

pub mod element;
pub mod id;
pub mod primitives;
pub mod registry;
pub mod scalar;
pub mod text;

#[cfg(test)]
mod proptest_tests;

pub use element::{
    encode_edge, encode_endpoint, encode_property_value, encode_vertex, ElementDoc, EndpointsDoc,
};
pub use id::{encode_id, encode_id_with_type_tag};
pub use primitives::{JsonWriter, TypeTagStyle, TypeTagger};
pub use registry::{
    default_registry, Codec, CodecKind, IdFormat, PrecisionPolicy, Registry, RegistryBuilder,
};
pub use scalar::{
    decode_timestamp, decode_timestamp_as, encode_timestamp, encode_timestamp_as, narrow_number,
    narrow_number_checked, TimestampFormat,
};
pub use text::{from_text, from_text_shape, to_text, to_writer, Generic, JsonEncode, Shape};
