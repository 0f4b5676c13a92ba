//! Comparison policy: ignored paths and order-insensitive array paths.
//!
//! Paths are matched exactly against the slash-delimited path the differ
//! renders while walking (`/map/name`, `/slice/2`). There is no prefix or glob
//! matching.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Configuration for a [`Differ`](crate::Differ).
///
/// Options are fixed once the differ is built. They can be assembled with the
/// `with_*` builders or loaded from TOML:
///
/// ```toml
/// ignores = ["/meta/updated_at"]
/// slice_orders = ["/tags"]
/// multiset = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    /// Paths whose differences are never reported.
    pub ignores: BTreeSet<String>,
    /// Array paths whose element order does not affect equality.
    pub slice_orders: BTreeSet<String>,
    /// When `true`, order-insensitive arrays must also agree on how often
    /// each element occurs. When `false` (the default) the check is a
    /// membership test: `[1, 1, 2]` and `[1, 2, 2]` are treated as equal.
    pub multiset: bool,
}

impl DiffOptions {
    /// Options with no ignored or order-insensitive paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add paths to the ignore set. Adding a path twice has no extra effect.
    pub fn with_ignores<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignores.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add array paths whose element order should not matter.
    pub fn with_slice_orders<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slice_orders.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Require matching element counts on order-insensitive arrays.
    pub fn with_multiset(mut self, multiset: bool) -> Self {
        self.multiset = multiset;
        self
    }

    /// Returns `true` if differences at `path` are suppressed.
    pub fn is_ignored(&self, path: &str) -> bool {
        !self.ignores.is_empty() && self.ignores.contains(path)
    }

    /// Returns `true` if the array at `path` is compared order-insensitively.
    pub fn is_slice_order(&self, path: &str) -> bool {
        !self.slice_orders.is_empty() && self.slice_orders.contains(path)
    }

    /// The ignored paths.
    pub fn ignores(&self) -> impl Iterator<Item = &str> {
        self.ignores.iter().map(String::as_str)
    }

    /// The order-insensitive array paths.
    pub fn slice_orders(&self) -> impl Iterator<Item = &str> {
        self.slice_orders.iter().map(String::as_str)
    }

    /// Union another option set into this one. `multiset` is enabled if
    /// either side enables it.
    pub fn merge(mut self, other: DiffOptions) -> Self {
        self.ignores.extend(other.ignores);
        self.slice_orders.extend(other.slice_orders);
        self.multiset |= other.multiset;
        self
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize options as TOML.
    pub fn to_toml_string(&self) -> DiffResult<String> {
        toml::to_string(self).map_err(|e| DiffError::Config(e.to_string()))
    }
}
