//! Identifier encoding.
//!
//! Ids are written as bare JSON scalars: numeric ids as numbers, textual ids
//! as strings. In polymorphic positions the scalar can be wrapped in a type
//! tag so a reader can tell `42` from `"42"` without a schema. There is no
//! decoding counterpart; callers rebuild [`Id`] values from decoded scalars.

use crate::codec::primitives::{JsonWriter, TypeTagger};
use crate::error::EncodeError;
use crate::model::Id;

/// Writes an id as a plain JSON scalar.
pub fn encode_id(w: &mut JsonWriter, id: &Id) -> Result<(), EncodeError> {
    match id {
        Id::Numeric(n) => w.write_i64(*n),
        Id::Textual(s) => w.write_str(s),
    }
}

/// Writes an id surrounded by the tagger's type prefix and suffix.
pub fn encode_id_with_type_tag(
    w: &mut JsonWriter,
    id: &Id,
    tagger: &dyn TypeTagger,
) -> Result<(), EncodeError> {
    let type_id = id.type_name();
    tagger.write_type_prefix(w, type_id)?;
    encode_id(w, id)?;
    tagger.write_type_suffix(w, type_id)
}

/// Writes `"name":<id>` using the plain scalar form.
pub fn write_id_field(w: &mut JsonWriter, name: &str, id: &Id) -> Result<(), EncodeError> {
    w.field_name(name)?;
    encode_id(w, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::TypeTagStyle;

    fn plain(id: &Id) -> String {
        let mut w = JsonWriter::new();
        encode_id(&mut w, id).unwrap();
        w.into_string().unwrap()
    }

    fn tagged(id: &Id, style: TypeTagStyle) -> String {
        let mut w = JsonWriter::new();
        encode_id_with_type_tag(&mut w, id, &style).unwrap();
        w.into_string().unwrap()
    }

    #[test]
    fn test_numeric_is_bare_number() {
        assert_eq!(plain(&Id::numeric(42)), "42");
        assert_eq!(plain(&Id::numeric(-1)), "-1");
        assert_eq!(plain(&Id::numeric(i64::MIN)), "-9223372036854775808");
    }

    #[test]
    fn test_textual_is_string() {
        assert_eq!(plain(&Id::text("S1:person>>knows>>S2:person")), r#""S1:person>>knows>>S2:person""#);
        assert_eq!(plain(&Id::text("42")), r#""42""#);
    }

    #[test]
    fn test_tagged_ids() {
        assert_eq!(tagged(&Id::numeric(42), TypeTagStyle::WrapperArray), r#"["numeric",42]"#);
        assert_eq!(tagged(&Id::text("42"), TypeTagStyle::WrapperArray), r#"["textual","42"]"#);
        assert_eq!(tagged(&Id::numeric(7), TypeTagStyle::WrapperObject), r#"{"numeric":7}"#);
    }

    #[test]
    fn test_ids_above_2_pow_53_keep_every_digit() {
        let big = (1i64 << 53) + 1;
        let text = plain(&Id::numeric(big));
        assert_eq!(text, "9007199254740993");

        // A reader that widens to f64 cannot tell it apart from its neighbour.
        let widened: f64 = serde_json::from_str::<f64>(&text).unwrap();
        assert_eq!(widened as i64, 1i64 << 53);
        assert_ne!(widened as i64, big);
    }

    #[test]
    fn test_id_field() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        write_id_field(&mut w, "outV", &Id::numeric(1)).unwrap();
        write_id_field(&mut w, "inV", &Id::text("b")).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.into_string().unwrap(), r#"{"outV":1,"inV":"b"}"#);
    }
}
