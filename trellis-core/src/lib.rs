//! Trellis Core
//!
//! This crate provides the core resolution engine for the Trellis
//! declarative dependency system. It implements:
//!
//! - Path algebra (parsing, joining, absolute/relative resolution)
//! - An immutable, path-addressed value store with structural sharing
//! - Declaration trees (dependencies, sub-modules, aliases)
//! - Recursive, memoized resolution with change tracking
//! - A reverse-dependency index for invalidation planning
//!
//! Conceptually it is a minimal incremental build system: declarations are
//! build rules, paths are targets, and factories are build actions. A caller
//! hands the resolver a declaration tree, a value snapshot, and a target
//! path; the resolver computes every transitive dependency first, caches the
//! results into a new snapshot, and reports exactly which paths it wrote.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `path`: segment sequences and the `/`-delimited string form
//! - `store`: the immutable value snapshot (the memo cache)
//! - `module`: declaration trees supplied by the host
//! - `graph`: the dependant (reverse-edge) tree builder
//! - `resolve`: the recursive resolution algorithm
//!
//! # Example
//!
//! ```rust,ignore
//! use trellis_core::module::{Dependency, Module};
//! use trellis_core::resolve::Resolver;
//! use trellis_core::store::ValueStore;
//! use serde_json::json;
//!
//! let module = Module::new()
//!     .with("a", Dependency::new(|_| async { Ok(json!(1)) }))
//!     .with(
//!         "b",
//!         Dependency::new(|deps| async move {
//!             Ok(json!(deps["x"].as_i64().unwrap_or(0) + 1))
//!         })
//!         .with_dependency("x", "/a"),
//!     );
//!
//! let resolver = Resolver::new(&module);
//! let outcome = resolver.resolve(ValueStore::default(), "/b", None).await?;
//!
//! assert_eq!(outcome.value, Some(json!(2)));
//! // The snapshot now holds both `/a` and `/b`, and both are reported
//! // as changed; resolving `/b` again against `outcome.store` returns
//! // the cached value with an empty change set.
//! ```

pub mod graph;
pub mod module;
pub mod path;
pub mod resolve;
pub mod store;
