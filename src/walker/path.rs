//! Route from the root to the node being rendered.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Ordered path segments, grown and shrunk in lockstep with recursion.
///
/// Segments are only added through [`Path::enter`], which returns a guard
/// that removes the segment again when dropped, including on early return
/// through `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing segments, e.g. to render a subtree in place.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Push `segment` for the lifetime of the returned scope.
    pub fn enter(&mut self, segment: impl Into<String>) -> PathScope<'_> {
        self.segments.push(segment.into());
        PathScope { path: self }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.segments.join("."))
        }
    }
}

/// A pushed segment; popped on drop.
#[derive(Debug)]
pub struct PathScope<'a> {
    path: &'a mut Path,
}

impl Deref for PathScope<'_> {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.path
    }
}

impl DerefMut for PathScope<'_> {
    fn deref_mut(&mut self) -> &mut Path {
        self.path
    }
}

impl Drop for PathScope<'_> {
    fn drop(&mut self) {
        self.path.segments.pop();
    }
}
