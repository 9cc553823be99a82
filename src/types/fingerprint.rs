//! The fingerprint output type.

use serde::{Deserialize, Serialize};

use crate::numeric::{self, HashError};

/// Fixed-width fingerprint of an ordered value sequence.
///
/// Always 16 lowercase hex characters, zero-padded on the left. Not
/// cryptographically secure; use it as a cache key, shard selector or
/// equality surrogate.
///
/// Serializes as a plain string; deserialization goes through
/// [`Fingerprint::parse`], so malformed input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Width of the rendered fingerprint in hex characters.
    pub const WIDTH: usize = 16;

    /// Render a raw 64-bit digest.
    pub fn from_digest(digest: u64) -> Self {
        Self(format!("{:016x}", digest))
    }

    /// Parse a rendered fingerprint.
    ///
    /// Requires exactly [`Self::WIDTH`] hex digits; uppercase digits are
    /// normalized to lowercase.
    pub fn parse(s: &str) -> Result<Self, HashError> {
        if s.len() != Self::WIDTH || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HashError::InvalidHex(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Get the fingerprint as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 64-bit digest this fingerprint renders.
    pub fn to_u64(&self) -> u64 {
        numeric::to_uint64(&self.0)
    }

    /// Bucket index in `[0, bucket_count)`.
    pub fn modulo(&self, bucket_count: i64) -> Result<i64, HashError> {
        numeric::modulo(&self.0, bucket_count)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = HashError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}
