//! Canonical byte encodings for fingerprinting.
//!
//! This module defines exactly which bytes each value contributes to the
//! hash. Any change here changes every stored fingerprint; bump
//! [`crate::CANONICAL_ENCODING_VERSION`] when that happens.
//!
//! ## Scalar Rendering
//!
//! - Booleans render as `true` / `false`
//! - Integers render as base-10 decimal with no padding
//! - Floats equal to their same-width integer truncation render as that integer
//!   (`123.0` → `123`), everything else as fixed-point with six fractional
//!   digits (`123.5` → `123.500000`)
//! - Non-finite floats render as `NaN`, `+Inf`, `-Inf`
//!
//! ## Structured Fallback
//!
//! - Composite values serialize through serde to compact JSON
//! - Object keys are sorted at every nesting level, independent of the
//!   `serde_json` map backend
//! - Struct fields are therefore ordered by name, not declaration
//! - Two different types with equal field values may or may not encode
//!   identically; no cross-type equivalence is promised

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value as Json;

use crate::types::Scalar;

/// A composite type with its own canonical byte encoding.
///
/// Implement this when the default sorted-key JSON encoding of
/// [`crate::Value::structured`] is not what should be fingerprinted, for
/// example to skip volatile fields or to pin a legacy layout.
pub trait CanonicalEncode {
    /// Append the canonical bytes of `self` to `out`.
    fn write_canonical(&self, out: &mut Vec<u8>);
}

impl CanonicalEncode for Json {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        write_sorted_json(self, out);
    }
}

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Keys are sorted recursively; output is compact with no whitespace.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let json = serde_json::to_value(value)?;
    let mut out = Vec::new();
    write_sorted_json(&json, &mut out);
    Ok(out)
}

fn write_sorted_json(value: &Json, out: &mut Vec<u8>) {
    match value {
        Json::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_sorted_json(item, out);
            }
            out.push(b']');
        }
        Json::Object(map) => {
            let mut entries: Vec<(&String, &Json)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_json_leaf(&Json::String(key.clone()), out);
                out.push(b':');
                write_sorted_json(item, out);
            }
            out.push(b'}');
        }
        leaf => write_json_leaf(leaf, out),
    }
}

fn write_json_leaf(leaf: &Json, out: &mut Vec<u8>) {
    // Leaves (null, bool, number, string) cannot fail to serialize into a Vec.
    if serde_json::to_writer(&mut *out, leaf).is_err() {
        tracing::warn!("json leaf failed to serialize, absorbing as empty");
    }
}

/// Canonical text of a scalar.
pub fn scalar_text<'s>(scalar: &'s Scalar<'_>) -> Cow<'s, str> {
    match scalar {
        Scalar::Bool(b) => Cow::Borrowed(bool_text(*b)),
        Scalar::Int(i) => Cow::Owned(i.to_string()),
        Scalar::Uint(u) => Cow::Owned(u.to_string()),
        Scalar::Float32(f) => Cow::Owned(float32_text(*f)),
        Scalar::Float64(f) => Cow::Owned(float64_text(*f)),
        Scalar::Text(s) => Cow::Borrowed(s.as_ref()),
    }
}

/// `true` or `false`.
pub fn bool_text(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Canonical text of a 64-bit float.
///
/// Whole values inside the `i64` range collapse onto the integer rendering.
pub fn float64_text(f: f64) -> String {
    // 2^63; `i64::MAX as f64` rounds up to this, so the upper bound is exclusive.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if f.is_finite() && f.trunc() == f && (-LIMIT..LIMIT).contains(&f) {
        return (f as i64).to_string();
    }
    fixed_point(f)
}

/// Canonical text of a 32-bit float.
///
/// Whole values inside the `i32` range collapse onto the integer rendering.
pub fn float32_text(f: f32) -> String {
    // 2^31, exclusive for the same reason as the f64 bound.
    const LIMIT: f32 = 2_147_483_648.0;

    if f.is_finite() && f.trunc() == f && (-LIMIT..LIMIT).contains(&f) {
        return (f as i32).to_string();
    }
    fixed_point(f)
}

fn fixed_point<F>(f: F) -> String
where
    F: Into<f64> + std::fmt::Display + Copy,
{
    let wide: f64 = f.into();
    if wide.is_nan() {
        "NaN".to_string()
    } else if wide == f64::INFINITY {
        "+Inf".to_string()
    } else if wide == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{:.6}", f)
    }
}
