//! # value-fingerprint
//!
//! Deterministic fingerprints for ordered sequences of heterogeneous values.
//!
//! The engine answers one question:
//!
//! > Do these two value sequences mean **the same thing**?
//!
//! ## Core Contract
//!
//! 1. Canonicalize each value to bytes (`123.0` and `123` agree, a present
//!    `Option<&str>` and the plain `&str` agree, `None` and `""` agree)
//! 2. Absorb the bytes in argument order into an xxHash64 stream
//! 3. Render the digest as 16 lowercase hex characters
//!
//! ## Architecture
//!
//! ```text
//! values → Value (closed sum type) → canonical bytes → Xxh64 → Fingerprint
//!                                                                 ↓
//!                                                     to_uint64 / modulo
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same values in the same order → identical fingerprint, in any process
//! - Value boundaries are not encoded: `("ab", "c")` ≡ `("abc",)`
//! - Composite values use sorted-key JSON; no cross-type equivalence
//!
//! Not cryptographically secure. Use fingerprints as cache keys, shard
//! selectors and equality surrogates, never against adversarial input.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod canonical;
pub mod engine;
pub mod numeric;

// Re-exports
pub use types::{Fingerprint, Scalar, Value};
pub use canonical::{to_canonical_bytes, CanonicalEncode};
pub use engine::{
    fingerprint, fingerprint_with, Fingerprinter, FingerprintConfig,
    DEFAULT_SEED, SEED_ENV_VAR,
};
pub use numeric::{modulo, to_uint64, try_to_uint64, HashError};

/// Version of the canonical encoding rules.
/// Increment on any change that alters the bytes a value contributes;
/// every stored fingerprint is invalidated by such a change.
pub const CANONICAL_ENCODING_VERSION: &str = "1.0.0";
