//! The recursive comparison engine.
//!
//! [`Differ`] walks the source and destination trees in lock-step, tracking
//! its position with a single shared [`Cursor`] and appending a [`Patch`] for
//! every difference it finds.
//!
//! # Invariants
//!
//! - Every segment pushed onto the cursor is rolled back before the step that
//!   pushed it returns, including on the ignore and kind-mismatch branches.
//!   After `compare` returns, the cursor is back at the root.
//! - A kind mismatch yields exactly one `replace` and nothing beneath it.
//! - An ignored path yields no patch at or beneath it.
//!
//! [`Patch`]: jsondiff_types::Patch

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use jsondiff_hash::{Digest, ValueHasher};
use jsondiff_types::{Cursor, Kind, Op, PatchList};

use crate::equal::values_equal;
use crate::options::DiffOptions;

const IN_SRC: u8 = 1 << 0;
const IN_DST: u8 = 1 << 1;

/// Structural differ for JSON values.
///
/// A `Differ` owns its options, cursor and output. It can be reused for
/// several comparisons under the same options by calling [`reset`] between
/// them; without a reset, patches from successive comparisons accumulate.
///
/// A single instance must not be shared between concurrent comparisons; give
/// each caller its own.
///
/// [`reset`]: Differ::reset
#[derive(Clone, Debug, Default)]
pub struct Differ {
    options: DiffOptions,
    cursor: Cursor,
    patches: PatchList,
    hasher: ValueHasher,
}

impl Differ {
    /// Create a differ with the given options.
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            cursor: Cursor::new(),
            patches: PatchList::new(),
            hasher: ValueHasher::DEFAULT,
        }
    }

    /// The options this differ was built with.
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Patches accumulated so far, in discovery order.
    pub fn patches(&self) -> &PatchList {
        &self.patches
    }

    /// Consume the differ and take its patches.
    pub fn into_patches(self) -> PatchList {
        self.patches
    }

    /// Clear patches and cursor so the differ can compare new inputs.
    pub fn reset(&mut self) {
        self.patches.clear();
        self.cursor.reset();
    }

    /// Compare `src` with `dst`, appending the differences to the patch list.
    pub fn compare(&mut self, src: &Value, dst: &Value) {
        let before = self.patches.len();
        self.diff(src, dst);
        debug_assert!(self.cursor.is_root(), "cursor not unwound after compare");

        debug!(
            patches = self.patches.len() - before,
            ignores = self.options.ignores.len(),
            slice_orders = self.options.slice_orders.len(),
            "comparison complete"
        );
    }

    fn diff(&mut self, src: &Value, dst: &Value) {
        if src.is_null() && dst.is_null() {
            return;
        }
        if self.is_ignored() {
            return;
        }

        if Kind::of(src) != Kind::of(dst) {
            self.emit(Some(src), Some(dst), Op::Replace);
            return;
        }
        if values_equal(src, dst) {
            return;
        }

        match (src, dst) {
            (Value::Array(s), Value::Array(d)) => self.compare_slice(s, d),
            (Value::Object(s), Value::Object(d)) => self.compare_map(s, d),
            _ => self.emit(Some(src), Some(dst), Op::Replace),
        }
    }

    /// The root is never ignored.
    fn is_ignored(&self) -> bool {
        !self.cursor.is_root() && self.options.is_ignored(self.cursor.as_str())
    }

    fn emit(&mut self, src: Option<&Value>, dst: Option<&Value>, op: Op) {
        trace!(path = %self.cursor, depth = self.cursor.depth(), %op, "patch");
        self.patches
            .append(src.cloned(), dst.cloned(), op, self.cursor.as_str());
    }

    fn compare_map(&mut self, src: &Map<String, Value>, dst: &Map<String, Value>) {
        let mut presence: BTreeMap<&str, u8> = BTreeMap::new();
        for key in src.keys() {
            *presence.entry(key).or_default() |= IN_SRC;
        }
        for key in dst.keys() {
            *presence.entry(key).or_default() |= IN_DST;
        }

        for (key, flags) in presence {
            self.cursor.append_key(key);
            let in_src = flags & IN_SRC != 0;
            let in_dst = flags & IN_DST != 0;
            match (in_src, in_dst) {
                (true, true) => self.diff(&src[key], &dst[key]),
                (true, false) => {
                    if !self.is_ignored() {
                        self.emit(Some(&src[key]), None, Op::Remove);
                    }
                }
                (false, true) => {
                    if !self.is_ignored() {
                        self.emit(None, Some(&dst[key]), Op::Add);
                    }
                }
                (false, false) => {}
            }
            self.cursor.rollback();
        }
    }

    fn compare_slice(&mut self, src: &[Value], dst: &[Value]) {
        if self.options.is_slice_order(self.cursor.as_str())
            && self.order_insensitive_equal(src, dst)
        {
            return;
        }

        let min_len = src.len().min(dst.len());

        for (i, s) in src.iter().enumerate().skip(min_len) {
            self.cursor.append_index(i);
            if !self.is_ignored() {
                self.emit(Some(s), None, Op::Remove);
            }
            self.cursor.rollback();
        }

        for (i, d) in dst.iter().enumerate().skip(min_len) {
            self.cursor.append_index(i);
            if !self.is_ignored() {
                self.emit(None, Some(d), Op::Add);
            }
            self.cursor.rollback();
        }

        for (i, (s, d)) in src.iter().zip(dst).enumerate() {
            self.cursor.append_index(i);
            self.diff(s, d);
            self.cursor.rollback();
        }
    }

    /// Order-insensitive array equality by element digest.
    ///
    /// By default this is a membership test: every `dst` digest must occur
    /// among the `src` digests, and the lengths must match, but how often each
    /// digest occurs is not counted. `[1, 1, 2]` and `[1, 2, 2]` therefore pass.
    /// With `multiset` enabled the occurrence counts must match as well.
    fn order_insensitive_equal(&self, src: &[Value], dst: &[Value]) -> bool {
        if src.len() != dst.len() {
            trace!(
                path = %self.cursor,
                src = src.len(),
                dst = dst.len(),
                "unordered check: length mismatch"
            );
            return false;
        }

        let equal = if self.options.multiset {
            self.digest_counts(src) == self.digest_counts(dst)
        } else {
            let seen: HashSet<Digest> = src.iter().map(|v| self.hasher.digest(v)).collect();
            dst.iter().all(|v| seen.contains(&self.hasher.digest(v)))
        };

        trace!(path = %self.cursor, equal, multiset = self.options.multiset, "unordered check");
        equal
    }

    fn digest_counts(&self, values: &[Value]) -> HashMap<Digest, usize> {
        let mut counts = HashMap::with_capacity(values.len());
        for value in values {
            *counts.entry(self.hasher.digest(value)).or_insert(0) += 1;
        }
        counts
    }
}
