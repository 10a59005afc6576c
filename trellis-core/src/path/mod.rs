//! Path Algebra
//!
//! Paths address locations in both the declaration tree and the value
//! store. A path is an ordered sequence of segments; the string form joins
//! percent-encoded segments with `/`.
//!
//! # Absolute and relative paths
//!
//! An absolute path starts with an empty segment (the string form therefore
//! starts with `/`). Any other path is relative and only becomes meaningful
//! once resolved against a base path: `.` segments are discarded, each `..`
//! navigates one level up from the end of the base, and the remaining
//! segments are appended.
//!
//! # Equivalence
//!
//! Two paths are equal iff their decoded segment sequences are equal. The
//! string form is a serialization detail: segments containing `/` or `%`
//! are percent-encoded on the way out and decoded on the way in, so segment
//! order and content survive round-trips verbatim.

mod algebra;
mod segment;

pub use algebra::Path;
pub use segment::Segment;
