//! The `Path` type: parsing, serialization, joining, and resolution.
//!
//! # String form
//!
//! Segments are joined with `/`, percent-encoded so that a segment may
//! itself contain the delimiter. Parsing splits on `/` and decodes each
//! piece; it never fails, so structurally odd input degrades to its literal
//! segments instead of raising an error.
//!
//! # Resolution
//!
//! `resolve` turns a possibly-relative path into an absolute one:
//!
//! - an absolute path (leading empty segment) overrides the base entirely;
//! - `.` segments are discarded;
//! - each `..` drops one segment from the end of the base (the base names
//!   the current leaf, so `..` means its parent);
//! - the remaining segments are appended to what is left of the base.
//!
//! Navigating above the base is not an error: the result is whatever
//! remains after the drop, possibly nothing.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::segment::Segment;

/// Current-directory navigation segment, discarded during resolution.
const CURRENT: &str = ".";
/// Parent navigation segment.
const PARENT: &str = "..";

/// An ordered sequence of segments addressing a location in a declaration
/// tree or a value store.
///
/// Most paths are short; segments are stored inline until the sequence
/// grows past eight entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Path {
    segments: SmallVec<[Segment; 8]>,
}

impl Path {
    /// The empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The absolute root path: a single empty segment, `""` in string form.
    pub fn root() -> Self {
        Self {
            segments: SmallVec::from_iter([Segment::new("")]),
        }
    }

    /// Parse the string form: split on `/`, percent-decode each segment.
    pub fn parse(input: &str) -> Self {
        Self {
            segments: input.split('/').map(Segment::decode).collect(),
        }
    }

    /// Build a path from decoded segments.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Segment>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The decoded segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the empty path (no segments at all).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the first segment is empty, i.e. the path is anchored at
    /// the root rather than relative to a base.
    pub fn is_absolute(&self) -> bool {
        self.segments.first().is_some_and(Segment::is_empty)
    }

    /// The segments used when walking a keyed tree: the leading empty
    /// segment of an absolute path is the root marker, not a key.
    pub(crate) fn key_segments(&self) -> &[Segment] {
        match self.segments.first() {
            Some(first) if first.is_empty() => &self.segments[1..],
            _ => &self.segments,
        }
    }

    /// Concatenate another path's segments onto this one.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }

    /// Concatenate any number of paths, in order.
    pub fn concat<'a, I>(paths: I) -> Path
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut segments = SmallVec::new();
        for path in paths {
            segments.extend(path.segments.iter().cloned());
        }
        Path { segments }
    }

    /// This path extended by one more segment.
    pub fn child(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Path { segments }
    }

    /// The directory containing this path's entry: all but the last
    /// segment. The parent of an empty path is empty.
    pub fn parent(&self) -> Path {
        let end = self.segments.len().saturating_sub(1);
        Path {
            segments: SmallVec::from_iter(self.segments[..end].iter().cloned()),
        }
    }

    /// Resolve this path against `base`.
    ///
    /// An absolute path is returned unchanged. A relative path navigates
    /// from the end of `base`: `.` segments are dropped, each `..` removes
    /// one trailing segment of `base`, and whatever segments remain are
    /// appended.
    pub fn resolve(&self, base: &Path) -> Path {
        if self.is_absolute() {
            return self.clone();
        }

        let kept: SmallVec<[&Segment; 8]> = self
            .segments
            .iter()
            .filter(|segment| segment.as_str() != CURRENT)
            .collect();
        let ups = kept
            .iter()
            .filter(|segment| segment.as_str() == PARENT)
            .count();

        let keep = base.segments.len().saturating_sub(ups);
        let mut segments = SmallVec::from_iter(base.segments[..keep].iter().cloned());
        segments.extend(
            kept.into_iter()
                .filter(|segment| segment.as_str() != PARENT)
                .cloned(),
        );
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment.encoded())?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(input))
    }
}

impl From<&str> for Path {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl From<String> for Path {
    fn from(input: String) -> Self {
        Self::parse(&input)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}
