//! Exact integer view of JSON numbers.
//!
//! Decoders hand back either an integer or an `f64` for the same document
//! number. Equality and digests both go through [`exact_integer`] so that an
//! integral float and an integer agree only when they denote the same value.

use serde_json::Number;

/// 2^64 as an `f64`; every integer a `Number` can hold is below it in magnitude.
const INTEGER_BOUND: f64 = 18_446_744_073_709_551_616.0;

/// The exact integer a number denotes, if it denotes one.
///
/// Integers map to themselves. A float maps to an integer only when it is
/// integral and within the range a `Number` integer can hold; the conversion
/// is exact there. Other floats return `None`.
pub fn exact_integer(n: &Number) -> Option<i128> {
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < INTEGER_BOUND {
        Some(f as i128)
    } else {
        None
    }
}
