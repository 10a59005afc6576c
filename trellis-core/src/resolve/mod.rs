//! Resolution Engine
//!
//! The resolver computes the value at a path by recursively resolving
//! every referenced dependency first, memoizing results into an immutable
//! store snapshot, and reporting which paths were written along the way.
//!
//! # Execution model
//!
//! Resolution is a strictly sequential depth-first recursion. The
//! references of one declaration resolve one at a time, in insertion
//! order, each seeing the store produced by the previous one; the factory
//! `await` is the only suspension point. The store is threaded by value
//! through the recursion: there is no shared mutable state, no locking,
//! and a caller never observes a half-written snapshot.
//!
//! # Memoization
//!
//! A path holding a value in the store is resolved: its factory never
//! runs again against that store lineage. Re-resolving a resolved path
//! returns the cached value with an empty change set.

mod error;
mod resolver;

pub use error::ResolveError;
pub use resolver::{Resolution, Resolver};
