//! Numeric views of a fingerprint: parse to `u64`, bucket by modulo.
//!
//! `to_uint64` fails soft: malformed input yields `0`, which existing
//! callers use as a default bucket. `try_to_uint64` is the checked form.

/// Error type for fingerprint parsing and bucketing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Bucket count was zero or negative.
    #[error("Invalid argument: bucket count must be positive, got {0}")]
    InvalidArgument(i64),

    /// Input is empty or contains a non-hex character.
    #[error("Invalid fingerprint hex: {0:?}")]
    InvalidHex(String),

    /// Input is valid hex but does not fit in 64 bits.
    #[error("Fingerprint hex exceeds 64 bits: {0:?}")]
    Overflow(String),
}

/// Parse fingerprint hex into its 64-bit value, or `0` if it is malformed.
pub fn to_uint64(hex: &str) -> u64 {
    match try_to_uint64(hex) {
        Ok(n) => n,
        Err(e) => {
            tracing::debug!(error = %e, "fingerprint parse failed, using 0");
            0
        }
    }
}

/// Parse fingerprint hex into its 64-bit value.
///
/// Accepts upper- and lowercase digits and leading zeros. Rejects empty
/// input, signs, `0x` prefixes and separators.
pub fn try_to_uint64(hex: &str) -> Result<u64, HashError> {
    // from_str_radix tolerates a leading '+'; a fingerprint never has one.
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HashError::InvalidHex(hex.to_string()));
    }
    u64::from_str_radix(hex, 16).map_err(|_| HashError::Overflow(hex.to_string()))
}

/// Bucket a fingerprint into `[0, bucket_count)`.
///
/// Uses exact `u64` arithmetic over the parsed digest, so every bit of the
/// hash participates. Malformed hex buckets as digest `0`.
pub fn modulo(hex: &str, bucket_count: i64) -> Result<i64, HashError> {
    if bucket_count <= 0 {
        return Err(HashError::InvalidArgument(bucket_count));
    }
    let bucket = to_uint64(hex) % bucket_count as u64;
    // bucket < bucket_count <= i64::MAX
    Ok(bucket as i64)
}
