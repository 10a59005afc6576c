//! Dependant Graph
//!
//! This module builds the reverse-edge view of a declaration tree: for
//! every path referenced as a dependency, the list of paths that depend on
//! it.
//!
//! # Overview
//!
//! The declaration tree stores forward edges (a dependency names the paths
//! it reads from). Invalidation planning needs the opposite direction:
//! when a value changes upstream, a host wants to know every declaration
//! that must be considered for re-resolution. The dependant tree is that
//! index, computed as a pure transform of the declaration tree.
//!
//! The engine itself never acts on this information (resolution is pull
//! based and memoized); it only supplies the index for hosts to drive
//! their own re-resolution.

mod dependants;

pub use dependants::DependantTree;
