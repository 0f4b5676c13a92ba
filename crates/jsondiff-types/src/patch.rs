//! Patch records: the output of a comparison.
//!
//! A [`PatchList`] holds patches in discovery order. Its canonical text form
//! is one JSON object per line with the fields `src_value`, `dst_value`, `op`
//! and `path`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::TypeError;

/// Line emitted in place of a patch that cannot be serialized.
pub const UNRENDERABLE_PATCH: &str = r#"{"error":"unrenderable patch"}"#;

/// The kind of change a patch describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// The path exists only in the destination.
    Add,
    /// The path exists only in the source.
    Remove,
    /// The path exists in both with different content.
    Replace,
}

impl Op {
    /// The wire literal for this op.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Remove => "remove",
            Op::Replace => "replace",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Op {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Op::Add),
            "remove" => Ok(Op::Remove),
            "replace" => Ok(Op::Replace),
            other => Err(TypeError::UnknownOp(other.to_string())),
        }
    }
}

/// One difference between source and destination at a specific path.
///
/// `src_value` is `None` for [`Op::Add`]; `dst_value` is `None` for
/// [`Op::Remove`]. Absent values serialize as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    #[serde(default)]
    pub src_value: Option<Value>,
    #[serde(default)]
    pub dst_value: Option<Value>,
    pub op: Op,
    pub path: String,
}

impl Patch {
    /// A value present only in the destination.
    pub fn add(path: impl Into<String>, dst: Value) -> Self {
        Self {
            src_value: None,
            dst_value: Some(dst),
            op: Op::Add,
            path: path.into(),
        }
    }

    /// A value present only in the source.
    pub fn remove(path: impl Into<String>, src: Value) -> Self {
        Self {
            src_value: Some(src),
            dst_value: None,
            op: Op::Remove,
            path: path.into(),
        }
    }

    /// A value present in both, with different content or kind.
    pub fn replace(path: impl Into<String>, src: Value, dst: Value) -> Self {
        Self {
            src_value: Some(src),
            dst_value: Some(dst),
            op: Op::Replace,
            path: path.into(),
        }
    }

    /// Render as a single-line JSON object.
    pub fn to_json_line(&self) -> Result<String, TypeError> {
        serde_json::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

/// Ordered list of patches, in the order they were discovered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchList {
    patches: Vec<Patch>,
}

impl PatchList {
    /// Create an empty patch list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a difference.
    pub fn append(
        &mut self,
        src: Option<Value>,
        dst: Option<Value>,
        op: Op,
        path: impl Into<String>,
    ) {
        self.patches.push(Patch {
            src_value: src,
            dst_value: dst,
            op,
            path: path.into(),
        });
    }

    /// Number of patches.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Returns `true` if there are no patches.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Drop all patches, keeping the allocation.
    pub fn clear(&mut self) {
        self.patches.clear();
    }

    /// Iterate in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, Patch> {
        self.patches.iter()
    }

    /// The patches as a slice.
    pub fn as_slice(&self) -> &[Patch] {
        &self.patches
    }

    /// Number of `add` patches.
    pub fn additions(&self) -> usize {
        self.count(Op::Add)
    }

    /// Number of `remove` patches.
    pub fn removals(&self) -> usize {
        self.count(Op::Remove)
    }

    /// Number of `replace` patches.
    pub fn replacements(&self) -> usize {
        self.count(Op::Replace)
    }

    fn count(&self, op: Op) -> usize {
        self.patches.iter().filter(|p| p.op == op).count()
    }

    /// Canonical text rendering: one JSON object per line.
    ///
    /// A patch that fails to serialize is replaced by [`UNRENDERABLE_PATCH`]
    /// and the remaining patches are still rendered.
    pub fn render(&self) -> String {
        render_lines(&self.patches, Patch::to_json_line)
    }
}

fn render_lines<F>(patches: &[Patch], render: F) -> String
where
    F: Fn(&Patch) -> Result<String, TypeError>,
{
    patches
        .iter()
        .map(|patch| match render(patch) {
            Ok(line) => line,
            Err(e) => {
                warn!(path = %patch.path, op = %patch.op, error = %e, "failed to render patch");
                UNRENDERABLE_PATCH.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for PatchList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Vec<Patch>> for PatchList {
    fn from(patches: Vec<Patch>) -> Self {
        Self { patches }
    }
}

impl FromIterator<Patch> for PatchList {
    fn from_iter<I: IntoIterator<Item = Patch>>(iter: I) -> Self {
        Self {
            patches: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PatchList {
    type Item = Patch;
    type IntoIter = std::vec::IntoIter<Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchList {
    type Item = &'a Patch;
    type IntoIter = std::slice::Iter<'a, Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.iter()
    }
}
