//! Structural diff engine for JSON values.
//!
//! Compares a source document with a destination document and produces a
//! path-addressed list of `add`, `remove` and `replace` patches describing how
//! to turn the source into the destination.
//!
//! # Key Types
//!
//! - [`Differ`] -- Recursive comparison engine; owns cursor and output
//! - [`DiffOptions`] -- Ignored paths and order-insensitive array paths
//! - [`PatchList`] / [`Patch`] -- Output, re-exported from `jsondiff-types`
//!
//! ```
//! use jsondiff_core::{diff_values, DiffOptions};
//! use serde_json::json;
//!
//! let src = json!({"slice": [1, 2, 3]});
//! let dst = json!({"slice": [3, 2, 1]});
//!
//! let opts = DiffOptions::new().with_slice_orders(["/slice"]);
//! assert!(diff_values(&src, &dst, opts).is_empty());
//! ```

pub mod differ;
pub mod equal;
pub mod error;
pub mod options;

pub use differ::Differ;
pub use equal::values_equal;
pub use error::{DiffError, DiffResult, Side};
pub use jsondiff_types::{Kind, Op, Patch, PatchList};
pub use options::DiffOptions;

use serde_json::Value;

/// Compare two values with a fresh differ.
pub fn diff_values(src: &Value, dst: &Value, options: DiffOptions) -> PatchList {
    let mut differ = Differ::new(options);
    differ.compare(src, dst);
    differ.into_patches()
}

/// Parse two JSON documents and compare them.
pub fn diff_json_str(src: &str, dst: &str, options: DiffOptions) -> DiffResult<PatchList> {
    let src = parse_document(src, Side::Source)?;
    let dst = parse_document(dst, Side::Destination)?;
    Ok(diff_values(&src, &dst, options))
}

/// Parse a JSON document, tagging failures with the side they came from.
pub fn parse_document(text: &str, side: Side) -> DiffResult<Value> {
    serde_json::from_str(text).map_err(|e| DiffError::Parse {
        side,
        message: e.to_string(),
    })
}
