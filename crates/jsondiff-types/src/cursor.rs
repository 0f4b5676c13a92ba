//! Path bookkeeping for a depth-first walk.
//!
//! A [`Cursor`] renders the current traversal position as a slash-delimited
//! path (`/map/name`, `/slice/2`). It is a single shared buffer: descending
//! appends a segment, ascending truncates back to where the segment began.
//!
//! # Invariants
//!
//! - Every [`append_key`] / [`append_index`] is matched by exactly one later
//!   [`rollback`], issued before the step that appended returns.
//! - The root position is the empty path.
//!
//! [`append_key`]: Cursor::append_key
//! [`append_index`]: Cursor::append_index
//! [`rollback`]: Cursor::rollback

use std::fmt::{self, Write as _};

const SEPARATOR: char = '/';

/// Slash-delimited path builder with a stack of segment offsets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Rendered path of the current position.
    buf: String,
    /// Byte offset of each pushed separator, innermost last.
    marks: Vec<usize>,
}

impl Cursor {
    /// Create a cursor positioned at the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into an object member.
    ///
    /// The key is appended verbatim; a `/` inside a key is not escaped.
    pub fn append_key(&mut self, key: &str) {
        self.marks.push(self.buf.len());
        self.buf.push(SEPARATOR);
        self.buf.push_str(key);
    }

    /// Descend into an array element.
    pub fn append_index(&mut self, idx: usize) {
        self.marks.push(self.buf.len());
        self.buf.push(SEPARATOR);
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{idx}");
    }

    /// Ascend one level, dropping the most recently appended segment.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been appended: an unmatched rollback means the
    /// caller broke the append/rollback pairing, and the path is no longer
    /// trustworthy.
    pub fn rollback(&mut self) {
        let Some(mark) = self.marks.pop() else {
            panic!("cursor rollback without a matching append");
        };
        self.buf.truncate(mark);
    }

    /// Return to the root.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.marks.clear();
    }

    /// The current path. The root is the empty string.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Returns `true` when positioned at the root.
    pub fn is_root(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of segments currently appended.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
