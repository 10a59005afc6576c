//! Declaration Trees
//!
//! A module is the rule book of a resolution pass: a mapping from key to
//! declaration whose shape mirrors the path space, one key per segment
//! level. A declaration is one of:
//!
//! - a **dependency**: an async factory plus named path references to the
//!   values it needs;
//! - a nested **sub-module**;
//! - an **alias**: a bare path, behaving exactly like a dependency whose
//!   single reference named `value` is that path and whose factory returns
//!   it unchanged.
//!
//! The variant is fixed when the tree is built, so classification is a
//! plain `match` at lookup time rather than a shape inspection on every
//! visit. Declaration trees are read-only for the duration of a resolution.

mod declaration;

pub use declaration::{
    Declaration, Dependency, Factory, FactoryError, FactoryInputs, Module,
};
