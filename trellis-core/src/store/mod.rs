//! Value Store
//!
//! The value store is the memo cache of a resolution pass: an immutable
//! nested mapping from path segments to computed values, addressed by the
//! same path space as the declaration tree.
//!
//! # Immutability
//!
//! A store is never mutated in place. Every write produces a new store that
//! shares every untouched branch with its predecessor and copies only the
//! nodes along the written path. Callers therefore never observe a
//! half-written snapshot, and keeping an old store around is free.

mod tree;

pub use tree::ValueStore;
