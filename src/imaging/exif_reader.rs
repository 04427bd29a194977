//! EXIF block → [`Metadata`] conversion using `kamadak-exif`.
//!
//! Only primary-image (IFD0 / Exif IFD / GPS IFD) fields are kept; thumbnail
//! IFD fields describe the embedded preview, not the photograph. Fields whose
//! tag the reader does not know by name are dropped, as are opaque
//! `UNDEFINED` blobs such as maker notes.

use crate::metadata::{Metadata, TagValue};
use std::io::Cursor;

/// Parse the EXIF block of an encoded image file.
///
/// Errors when the container has no EXIF block or the block is malformed.
/// A block with no recognised tags parses to an empty map.
pub fn read_exif(data: &[u8]) -> Result<Metadata, exif::Error> {
    let exif = exif::Reader::new().read_from_container(&mut Cursor::new(data))?;

    Ok(exif
        .fields()
        .filter(|field| field.ifd_num == exif::In::PRIMARY)
        .filter(|field| field.tag.description().is_some())
        .filter_map(|field| convert_value(&field.value).map(|v| (field.tag.to_string(), v)))
        .collect())
}

fn convert_value(value: &exif::Value) -> Option<TagValue> {
    use exif::Value;

    let components: Vec<TagValue> = match value {
        Value::Ascii(strings) => strings
            .iter()
            .map(|s| TagValue::Text(ascii_text(s)))
            .collect(),
        Value::Byte(v) => ints(v.iter().map(|&x| i64::from(x))),
        Value::Short(v) => ints(v.iter().map(|&x| i64::from(x))),
        Value::Long(v) => ints(v.iter().map(|&x| i64::from(x))),
        Value::SByte(v) => ints(v.iter().map(|&x| i64::from(x))),
        Value::SShort(v) => ints(v.iter().map(|&x| i64::from(x))),
        Value::SLong(v) => ints(v.iter().map(|&x| i64::from(x))),
        Value::Rational(v) => v
            .iter()
            .filter(|r| r.denom != 0)
            .map(|r| TagValue::Float(r.to_f64()))
            .collect(),
        Value::SRational(v) => v
            .iter()
            .filter(|r| r.denom != 0)
            .map(|r| TagValue::Float(r.to_f64()))
            .collect(),
        Value::Float(v) => v.iter().map(|&x| TagValue::Float(f64::from(x))).collect(),
        Value::Double(v) => v.iter().map(|&x| TagValue::Float(x)).collect(),
        _ => return None,
    };

    TagValue::from_components(components)
}

fn ints(values: impl Iterator<Item = i64>) -> Vec<TagValue> {
    values.map(TagValue::Integer).collect()
}

/// EXIF ASCII is NUL-terminated and frequently space-padded by camera firmware.
fn ascii_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exif::{Rational, Value};

    #[test]
    fn ascii_strips_padding_and_nul() {
        assert_eq!(ascii_text(b"Canon  \0"), "Canon");
        assert_eq!(ascii_text(b""), "");
    }

    #[test]
    fn single_short_becomes_integer() {
        assert_eq!(
            convert_value(&Value::Short(vec![400])),
            Some(TagValue::Integer(400))
        );
    }

    #[test]
    fn rational_becomes_float() {
        assert_eq!(
            convert_value(&Value::Rational(vec![Rational { num: 1, denom: 250 }])),
            Some(TagValue::Float(0.004))
        );
    }

    #[test]
    fn zero_denominator_is_skipped() {
        assert_eq!(
            convert_value(&Value::Rational(vec![Rational { num: 1, denom: 0 }])),
            None
        );
    }

    #[test]
    fn multi_component_becomes_tuple() {
        assert_eq!(
            convert_value(&Value::Long(vec![1, 2, 3])),
            Some(TagValue::Tuple(vec![
                TagValue::Integer(1),
                TagValue::Integer(2),
                TagValue::Integer(3),
            ]))
        );
    }

    #[test]
    fn undefined_blobs_are_dropped() {
        assert_eq!(convert_value(&Value::Undefined(vec![0, 2, 3, 0], 0)), None);
    }

    #[test]
    fn file_without_exif_errors() {
        assert!(read_exif(b"definitely not an image").is_err());
    }
}
