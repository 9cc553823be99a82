//! The fingerprint engine.
//!
//! Absorbs an ordered sequence of [`Value`]s into an xxHash64 stream and
//! renders the digest as a [`Fingerprint`].
//!
//! ## Canonicalization Rules
//!
//! | Variant | Bytes absorbed |
//! |---------|----------------|
//! | `Null`, `Optional(None)` | nothing |
//! | `Scalar(Text)` | UTF-8 bytes |
//! | `Bytes` | verbatim |
//! | `TextSeq` | each element's bytes, in order |
//! | `Scalar(Bool)` | `true` / `false` |
//! | `Scalar(Int)`, `Scalar(Uint)` | base-10 decimal |
//! | `Scalar(Float32)`, `Scalar(Float64)` | integer decimal if whole, else `%.6f` |
//! | `Optional(Some(x))` | same as `Scalar(x)` |
//! | `Structured` | canonical encoding bytes |
//!
//! No separator is written between values, so `("ab", "c")` and `("abc",)`
//! produce the same fingerprint. Callers that need the split to matter must
//! encode it themselves.
//!
//! ## Determinism Guarantees
//!
//! - Same values in the same order → identical fingerprint, across runs and
//!   processes
//! - No shared state: each call owns its accumulator

use xxhash_rust::xxh64::Xxh64;

use crate::canonical::scalar_text;
use crate::types::{Fingerprint, Value};

/// Default xxHash64 seed; matches the unseeded stream.
pub const DEFAULT_SEED: u64 = 0;

/// Environment variable read by [`FingerprintConfig::from_env`].
pub const SEED_ENV_VAR: &str = "FINGERPRINT_SEED";

/// Configuration for the fingerprint engine.
///
/// Changing the seed changes every fingerprint; all producers and consumers
/// of a stored fingerprint must agree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// xxHash64 seed.
    pub seed: u64,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl FingerprintConfig {
    /// Create a configuration with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Load configuration from the environment.
    ///
    /// Reads `FINGERPRINT_SEED` as a decimal `u64`. Unset uses the default;
    /// a malformed value is logged and the default is used.
    pub fn from_env() -> Self {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => Self::from_seed_str(&raw),
            Err(_) => Self::default(),
        }
    }

    fn from_seed_str(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(seed) => Self { seed },
            Err(e) => {
                tracing::warn!(
                    value = raw,
                    error = %e,
                    default = DEFAULT_SEED,
                    "{} is not a valid u64, using default seed",
                    SEED_ENV_VAR
                );
                Self::default()
            }
        }
    }
}

/// Streaming accumulator for one fingerprint.
///
/// Feed values in order with [`absorb`](Self::absorb), then consume it with
/// [`finish`](Self::finish). Not meant to be shared or reused.
#[derive(Clone)]
pub struct Fingerprinter {
    hasher: Xxh64,
    absorbed: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Fingerprinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fingerprinter")
            .field("absorbed", &self.absorbed)
            .finish_non_exhaustive()
    }
}

impl Fingerprinter {
    /// Create an accumulator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&FingerprintConfig::default())
    }

    /// Create an accumulator with an explicit configuration.
    pub fn with_config(config: &FingerprintConfig) -> Self {
        Self {
            hasher: Xxh64::new(config.seed),
            absorbed: 0,
        }
    }

    /// Absorb one value.
    pub fn absorb(&mut self, value: &Value<'_>) {
        self.absorbed += 1;
        let hasher = &mut self.hasher;
        for_each_chunk(value, |chunk| hasher.update(chunk));
    }

    /// Absorb values in order.
    pub fn absorb_all(&mut self, values: &[Value<'_>]) {
        for value in values {
            self.absorb(value);
        }
    }

    /// Number of values absorbed so far.
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    /// Finalize into the raw 64-bit digest.
    pub fn finish_digest(self) -> u64 {
        self.hasher.digest()
    }

    /// Finalize into a rendered fingerprint.
    pub fn finish(self) -> Fingerprint {
        let absorbed = self.absorbed;
        let fp = Fingerprint::from_digest(self.finish_digest());
        tracing::trace!(values = absorbed, fingerprint = %fp, "fingerprint computed");
        fp
    }

    /// The exact bytes `value` contributes to the hash stream.
    pub fn canonical_bytes(value: &Value<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        for_each_chunk(value, |chunk| out.extend_from_slice(chunk));
        out
    }
}

/// Feed the canonical byte chunks of `value` to `sink`, in order.
///
/// The only place the per-variant rules live; hashing and inspection both
/// go through here.
fn for_each_chunk(value: &Value<'_>, mut sink: impl FnMut(&[u8])) {
    match value {
        Value::Null | Value::Optional(None) => {}
        Value::Scalar(scalar) | Value::Optional(Some(scalar)) => {
            sink(scalar_text(scalar).as_bytes())
        }
        Value::Bytes(bytes) => sink(bytes),
        Value::TextSeq(items) => {
            for item in items {
                sink(item.as_bytes());
            }
        }
        Value::Structured(bytes) => sink(bytes),
    }
}

/// Fingerprint an ordered sequence of values with the default configuration.
///
/// # Example
///
/// ```rust
/// use value_fingerprint::{fingerprint, Value};
///
/// let a = fingerprint(&[Value::from(123), Value::from("x")]);
/// let b = fingerprint(&[Value::from(123.0), Value::from(Some("x"))]);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 16);
/// ```
pub fn fingerprint(values: &[Value<'_>]) -> Fingerprint {
    fingerprint_with(&FingerprintConfig::default(), values)
}

/// Fingerprint an ordered sequence of values with an explicit configuration.
pub fn fingerprint_with(config: &FingerprintConfig, values: &[Value<'_>]) -> Fingerprint {
    let mut fp = Fingerprinter::with_config(config);
    fp.absorb_all(values);
    fp.finish()
}

/// Fingerprint a variadic list of values, converting each with `Value::from`.
///
/// ```rust
/// use value_fingerprint::fingerprint;
///
/// let key = fingerprint!("tenant-7", 42, Some(true));
/// assert_eq!(key, fingerprint!("tenant-742", true));
/// ```
#[macro_export]
macro_rules! fingerprint {
    ($($value:expr),* $(,)?) => {
        $crate::fingerprint(&[$($crate::Value::from($value)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use xxhash_rust::xxh64::xxh64;

    fn expect(bytes: &[u8]) -> Fingerprint {
        Fingerprint::from_digest(xxh64(bytes, DEFAULT_SEED))
    }

    #[test]
    fn test_empty_sequence_is_empty_stream() {
        assert_eq!(fingerprint(&[]), expect(b""));
        assert_eq!(fingerprint(&[]).as_str(), "ef46db3751d8e999");
    }

    #[test]
    fn test_null_absorbs_nothing() {
        let none: Option<i64> = None;
        assert_eq!(fingerprint(&[Value::Null]), fingerprint(&[]));
        assert_eq!(fingerprint(&[Value::from(none), Value::from("a")]), expect(b"a"));
    }

    #[test]
    fn test_scalar_byte_layout() {
        assert_eq!(fingerprint(&[Value::from(true), Value::from(1), Value::from("x")]), expect(b"true1x"));
        assert_eq!(fingerprint(&[Value::from(-42i8)]), expect(b"-42"));
        assert_eq!(fingerprint(&[Value::from(123.5f64)]), expect(b"123.500000"));
        assert_eq!(fingerprint(&[Value::from(7u16)]), expect(b"7"));
    }

    #[test]
    fn test_bytes_and_text_seq() {
        let seq = vec!["ab".to_string(), "cd".to_string()];
        assert_eq!(fingerprint(&[Value::from(b"\x00\xff")]), expect(b"\x00\xff"));
        assert_eq!(fingerprint(&[Value::from(&seq)]), expect(b"abcd"));
    }

    #[test]
    fn test_structured_layout() {
        #[derive(serde::Serialize)]
        struct Order {
            qty: u32,
            id: &'static str,
        }

        let v = Value::structured(&Order { qty: 2, id: "o-1" });
        assert_eq!(fingerprint(&[v]), expect(br#"{"id":"o-1","qty":2}"#));
    }

    #[test]
    fn test_custom_encoder() {
        struct Point(i32, i32);

        impl crate::CanonicalEncode for Point {
            fn write_canonical(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(format!("{}:{}", self.0, self.1).as_bytes());
            }
        }

        assert_eq!(fingerprint(&[Value::encoded(&Point(3, -4))]), expect(b"3:-4"));
    }

    #[test]
    fn test_seed_changes_output() {
        let values = [Value::from("abc")];
        let seeded = fingerprint_with(&FingerprintConfig::with_seed(7), &values);
        assert_ne!(seeded, fingerprint(&values));
        assert_eq!(seeded, Fingerprint::from_digest(xxh64(b"abc", 7)));
    }

    #[test]
    fn test_canonical_bytes_matches_stream() {
        let values = [
            Value::from(Some(2.0f32)),
            Value::from(vec!["p", "q"]),
            Value::Null,
            Value::from(false),
        ];
        let mut stream = Vec::new();
        for v in &values {
            stream.extend(Fingerprinter::canonical_bytes(v));
        }
        assert_eq!(stream, b"2pqfalse".to_vec());
        assert_eq!(fingerprint(&values), expect(&stream));
    }

    #[test]
    fn test_each_variant_hashes_its_canonical_bytes() {
        let none: Option<&str> = None;
        let values = [
            Value::Null,
            Value::from("txt"),
            Value::from(-9i32),
            Value::from(0.5f64),
            Value::from(b"\x01\x02"),
            Value::from(vec!["a", "", "b"]),
            Value::from(none),
            Value::from(Some(7u64)),
            Value::structured(&serde_json::json!({"k": [1]})),
        ];
        for v in &values {
            let mut acc = Fingerprinter::new();
            acc.absorb(v);
            assert_eq!(
                acc.finish(),
                expect(&Fingerprinter::canonical_bytes(v)),
                "stream and canonical bytes disagree for {:?}",
                v
            );
        }
    }

    #[test]
    fn test_absorbed_counts_nulls() {
        let mut fp = Fingerprinter::new();
        fp.absorb_all(&[Value::Null, Value::from(1)]);
        assert_eq!(fp.absorbed(), 2);
    }

    #[test]
    fn test_macro_matches_function() {
        let s = String::from("owned");
        assert_eq!(
            fingerprint!(s.clone(), 3u8, None::<bool>),
            fingerprint(&[Value::from(s), Value::from(3u8), Value::Null])
        );
        assert_eq!(fingerprint!(), fingerprint(&[]));
    }

    #[test]
    fn test_seed_from_str() {
        assert_eq!(FingerprintConfig::from_seed_str("42"), FingerprintConfig::with_seed(42));
        assert_eq!(FingerprintConfig::from_seed_str(" 9 "), FingerprintConfig::with_seed(9));
        assert_eq!(FingerprintConfig::from_seed_str("-1"), FingerprintConfig::default());
        assert_eq!(FingerprintConfig::from_seed_str("seed"), FingerprintConfig::default());
    }
}
