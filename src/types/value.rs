//! Input values accepted by the fingerprint engine.
//!
//! `Value` is a closed sum type: every variant maps to exactly one
//! canonicalization rule in [`crate::engine`]. Adding a variant means adding
//! a dispatch arm there, which the compiler enforces.
//!
//! ## Conversions
//!
//! Most callers never construct variants by hand. `From` impls cover the
//! usual Rust types:
//!
//! | Rust type | Variant |
//! |-----------|---------|
//! | `bool`, `i8..i64`, `isize`, `u8..u64`, `usize`, `f32`, `f64`, `&str`, `String` | `Scalar` |
//! | `Option<T>` / `Option<&T>` for any of the above | `Optional` |
//! | `&[u8]`, `Vec<u8>`, `&[u8; N]` | `Bytes` |
//! | `&[String]`, `Vec<String>`, `&[&str]`, `Vec<&str>` | `TextSeq` |
//!
//! Composite values go through [`Value::structured`] (serde) or
//! [`Value::encoded`] (a custom [`CanonicalEncode`] impl).

use std::borrow::Cow;

use serde::Serialize;

use crate::canonical::{to_canonical_bytes, CanonicalEncode};

/// A scalar that an optional may wrap.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    /// Boolean, absorbed as `true` / `false`.
    Bool(bool),
    /// Signed integer of any width, widened to 64 bits.
    Int(i64),
    /// Unsigned integer of any width, widened to 64 bits.
    Uint(u64),
    /// 32-bit float. Whole values collapse onto their `i32` rendering.
    Float32(f32),
    /// 64-bit float. Whole values collapse onto their `i64` rendering.
    Float64(f64),
    /// UTF-8 text.
    Text(Cow<'a, str>),
}

/// One element of the ordered sequence handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Explicit null.
    Null,
    /// A plain scalar.
    Scalar(Scalar<'a>),
    /// Raw bytes, absorbed verbatim.
    Bytes(Cow<'a, [u8]>),
    /// Sequence of text, absorbed element by element with no separator.
    TextSeq(Vec<Cow<'a, str>>),
    /// Nullable reference to a scalar.
    Optional(Option<Scalar<'a>>),
    /// Pre-encoded canonical bytes of a composite value.
    Structured(Vec<u8>),
}

impl<'a> Value<'a> {
    /// Encode a composite value with the default sorted-key JSON encoding.
    ///
    /// Serialization failures (e.g. a map with non-string keys) are logged
    /// and absorbed as an empty byte sequence, so fingerprinting stays total.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Value<'static> {
        match to_canonical_bytes(value) {
            Ok(bytes) => Value::Structured(bytes),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    type_name = std::any::type_name::<T>(),
                    "structured value failed to serialize, absorbing as empty"
                );
                Value::Structured(Vec::new())
            }
        }
    }

    /// Encode a composite value with its own canonical encoder.
    pub fn encoded<T: CanonicalEncode + ?Sized>(value: &T) -> Value<'static> {
        let mut out = Vec::new();
        value.write_canonical(&mut out);
        Value::Structured(out)
    }

    /// Map a JSON document onto engine values.
    ///
    /// Scalars take the scalar rules (so `123`, `123.0` and `"123"` all
    /// fingerprint alike); arrays and objects take the structured fallback.
    pub fn from_json(value: &'a serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Scalar(Scalar::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Scalar(Scalar::Uint(u))
                } else {
                    Value::Scalar(Scalar::Float64(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Json::String(s) => Value::Scalar(Scalar::Text(Cow::Borrowed(s.as_str()))),
            Json::Array(_) | Json::Object(_) => Value::structured(value),
        }
    }
}

impl<'a> From<Scalar<'a>> for Value<'a> {
    fn from(s: Scalar<'a>) -> Self {
        Value::Scalar(s)
    }
}

impl<'a> From<Option<Scalar<'a>>> for Value<'a> {
    fn from(s: Option<Scalar<'a>>) -> Self {
        Value::Optional(s)
    }
}

// Copy scalars: by value, by reference, and both wrapped in Option.
macro_rules! impl_copy_scalar {
    ($($ty:ty => $variant:ident($target:ty)),* $(,)?) => {$(
        #[allow(clippy::unnecessary_cast)]
        impl From<$ty> for Scalar<'_> {
            fn from(v: $ty) -> Self {
                Scalar::$variant(v as $target)
            }
        }

        impl From<&$ty> for Scalar<'_> {
            fn from(v: &$ty) -> Self {
                Scalar::from(*v)
            }
        }

        impl From<$ty> for Value<'_> {
            fn from(v: $ty) -> Self {
                Value::Scalar(Scalar::from(v))
            }
        }

        impl From<&$ty> for Value<'_> {
            fn from(v: &$ty) -> Self {
                Value::Scalar(Scalar::from(*v))
            }
        }

        impl From<Option<$ty>> for Value<'_> {
            fn from(v: Option<$ty>) -> Self {
                Value::Optional(v.map(Scalar::from))
            }
        }

        impl From<Option<&$ty>> for Value<'_> {
            fn from(v: Option<&$ty>) -> Self {
                Value::Optional(v.map(Scalar::from))
            }
        }
    )*};
}

impl_copy_scalar! {
    bool => Bool(bool),
    i8 => Int(i64),
    i16 => Int(i64),
    i32 => Int(i64),
    i64 => Int(i64),
    isize => Int(i64),
    u8 => Uint(u64),
    u16 => Uint(u64),
    u32 => Uint(u64),
    u64 => Uint(u64),
    usize => Uint(u64),
    f32 => Float32(f32),
    f64 => Float64(f64),
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(s: &'a str) -> Self {
        Scalar::Text(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Scalar<'a> {
    fn from(s: &'a String) -> Self {
        Scalar::Text(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Scalar<'_> {
    fn from(s: String) -> Self {
        Scalar::Text(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for Scalar<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        Scalar::Text(s)
    }
}

// Text: plain, and wrapped in Option.
macro_rules! impl_text_value {
    ($($ty:ty),* $(,)?) => {$(
        impl<'a> From<$ty> for Value<'a> {
            fn from(s: $ty) -> Self {
                Value::Scalar(Scalar::from(s))
            }
        }

        impl<'a> From<Option<$ty>> for Value<'a> {
            fn from(s: Option<$ty>) -> Self {
                Value::Optional(s.map(Scalar::from))
            }
        }
    )*};
}

impl_text_value!(&'a str, &'a String, String, Cow<'a, str>);

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(b))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Value<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        Value::Bytes(Cow::Borrowed(b.as_slice()))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(b))
    }
}

impl<'a> From<&'a Vec<u8>> for Value<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Value::Bytes(Cow::Borrowed(b.as_slice()))
    }
}

impl<'a> From<&'a [String]> for Value<'a> {
    fn from(items: &'a [String]) -> Self {
        Value::TextSeq(items.iter().map(|s| Cow::Borrowed(s.as_str())).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Value<'a> {
    fn from(items: &'a Vec<String>) -> Self {
        Value::from(items.as_slice())
    }
}

impl From<Vec<String>> for Value<'_> {
    fn from(items: Vec<String>) -> Self {
        Value::TextSeq(items.into_iter().map(Cow::Owned).collect())
    }
}

impl<'a> From<&'a [&'a str]> for Value<'a> {
    fn from(items: &'a [&'a str]) -> Self {
        Value::TextSeq(items.iter().map(|s| Cow::Borrowed(*s)).collect())
    }
}

impl<'a> From<Vec<&'a str>> for Value<'a> {
    fn from(items: Vec<&'a str>) -> Self {
        Value::TextSeq(items.into_iter().map(Cow::Borrowed).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_widths_widen_to_i64() {
        assert_eq!(Value::from(-7i8), Value::Scalar(Scalar::Int(-7)));
        assert_eq!(Value::from(300i16), Value::Scalar(Scalar::Int(300)));
        assert_eq!(Value::from(i64::MIN), Value::Scalar(Scalar::Int(i64::MIN)));
        assert_eq!(Value::from(42usize), Value::Scalar(Scalar::Uint(42)));
    }

    #[test]
    fn test_option_maps_to_optional() {
        let present: Option<i32> = Some(5);
        let absent: Option<&str> = None;
        assert_eq!(Value::from(present), Value::Optional(Some(Scalar::Int(5))));
        assert_eq!(Value::from(absent), Value::Optional(None));
    }

    #[test]
    fn test_option_ref_maps_to_optional() {
        let x = 1.5f64;
        assert_eq!(Value::from(Some(&x)), Value::Optional(Some(Scalar::Float64(1.5))));
    }

    #[test]
    fn test_string_slices_map_to_text_seq() {
        let owned = vec!["a".to_string(), "b".to_string()];
        let borrowed: Vec<&str> = vec!["a", "b"];
        assert_eq!(Value::from(&owned), Value::from(borrowed));
    }

    #[test]
    fn test_byte_array_maps_to_bytes() {
        assert_eq!(Value::from(b"xyz"), Value::Bytes(Cow::Borrowed(b"xyz".as_slice())));
    }

    #[test]
    fn test_from_json_scalars() {
        let doc = json!(["s", 12, -3, 1.25, true, null, 18446744073709551615u64]);
        let items = doc.as_array().unwrap();
        assert_eq!(Value::from_json(&items[0]), Value::from("s"));
        assert_eq!(Value::from_json(&items[1]), Value::from(12i64));
        assert_eq!(Value::from_json(&items[2]), Value::from(-3i64));
        assert_eq!(Value::from_json(&items[3]), Value::from(1.25f64));
        assert_eq!(Value::from_json(&items[4]), Value::from(true));
        assert_eq!(Value::from_json(&items[5]), Value::Null);
        assert_eq!(Value::from_json(&items[6]), Value::from(u64::MAX));
    }

    #[test]
    fn test_from_json_composites_are_structured() {
        let doc = json!({"b": 1, "a": [1, 2]});
        match Value::from_json(&doc) {
            Value::Structured(bytes) => assert_eq!(bytes, br#"{"a":[1,2],"b":1}"#.to_vec()),
            other => panic!("expected structured, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_failure_is_empty() {
        use std::collections::BTreeMap;

        // JSON object keys must be strings.
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "x");
        assert_eq!(Value::structured(&map), Value::Structured(Vec::new()));
    }
}
