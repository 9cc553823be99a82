//! Core types for the fingerprint engine.

pub mod value;
pub mod fingerprint;

pub use value::{Value, Scalar};
pub use fingerprint::Fingerprint;
