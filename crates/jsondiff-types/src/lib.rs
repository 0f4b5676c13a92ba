//! Foundation types for jsondiff.
//!
//! This crate provides the value classification, path bookkeeping and patch
//! output types shared by the hashing and diff crates.
//!
//! # Key Types
//!
//! - [`Kind`] — Coarse category of a JSON value (null, bool, number, ...)
//! - [`Cursor`] — Slash-delimited path builder with push/rollback discipline
//! - [`Op`] — Patch operation tag (`add`, `remove`, `replace`)
//! - [`Patch`] / [`PatchList`] — Ordered, path-addressed differences
//! - [`exact_integer`] — Integer value of a number, shared by equality and digests

pub mod cursor;
pub mod error;
pub mod kind;
pub mod number;
pub mod patch;

pub use cursor::Cursor;
pub use error::TypeError;
pub use kind::Kind;
pub use number::exact_integer;
pub use patch::{Op, Patch, PatchList, UNRENDERABLE_PATCH};
