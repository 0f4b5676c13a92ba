//! Content digests for jsondiff.
//!
//! Provides a domain-separated, BLAKE3-backed digest of a JSON value that is
//! independent of object key order. Digests back the order-insensitive array
//! comparison in `jsondiff-core`.

pub mod hasher;

pub use hasher::{Digest, ValueHasher};
