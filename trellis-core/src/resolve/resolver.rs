//! The recursive, memoized resolution algorithm.
//!
//! # How a path resolves
//!
//! 1. The target path is resolved against the base path (default: root).
//!
//! 2. The declaration tree classifies the target. A sub-module or an
//!    undeclared path is a plain read-through: the stored value (if any)
//!    comes back, nothing is computed or cached.
//!
//! 3. A dependency with a value already stored at its path is a cache
//!    hit: the value comes back, the factory does not run.
//!
//! 4. Otherwise each named reference resolves recursively against the
//!    dependency's directory, threading the running store so every
//!    reference sees what its predecessors wrote. The factory then runs
//!    on the gathered values, and its result is committed at the target
//!    path.
//!
//! # Change tracking
//!
//! Every committed path lands in the change set, de-duplicated. A cache
//! hit or read-through contributes nothing, so re-resolving an
//! already-resolved path reports an empty change set.
//!
//! # Cycles
//!
//! The in-progress paths are kept on an explicit stack threaded through
//! the recursion. Re-entering a path that is still resolving fails fast
//! with [`ResolveError::Cycle`] naming the cycle instead of recursing
//! until stack exhaustion.

use futures_util::future::BoxFuture;
use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, trace};

use crate::module::{Declaration, Dependency, FactoryInputs, Module};
use crate::path::Path;
use crate::store::ValueStore;

use super::error::ResolveError;

/// The outcome of a resolution pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The updated snapshot. Shares every untouched branch with the input
    /// store.
    pub store: ValueStore,
    /// The value at the target path, `None` when nothing is declared and
    /// nothing was stored there.
    pub value: Option<Value>,
    /// Every path written during this pass, in commit order.
    pub changed: IndexSet<Path>,
}

/// Resolves paths against a declaration tree.
///
/// The resolver holds no state of its own beyond the borrowed module;
/// all resolution state (the store, the change set, the in-progress
/// stack) is threaded explicitly through the recursion.
pub struct Resolver<'m> {
    module: &'m Module,
}

impl<'m> Resolver<'m> {
    /// Create a resolver over `module`.
    pub fn new(module: &'m Module) -> Self {
        Self { module }
    }

    /// Resolve `path` against `store`, relative to `base` (default: the
    /// absolute root).
    ///
    /// On success the returned [`Resolution`] carries the updated store,
    /// the value at the resolved path, and the set of paths written. On
    /// failure the store is dropped with the error; writes never leak out
    /// of a failed pass.
    pub async fn resolve(
        &self,
        store: ValueStore,
        path: impl Into<Path>,
        base: Option<&Path>,
    ) -> Result<Resolution, ResolveError> {
        let path = path.into();
        let base = base.cloned().unwrap_or_else(Path::root);
        let mut in_progress = Vec::new();
        self.resolve_inner(store, path, base, &mut in_progress).await
    }

    /// Recursive worker. Boxed because the future type would otherwise be
    /// infinitely sized.
    fn resolve_inner<'a>(
        &'a self,
        store: ValueStore,
        path: Path,
        base: Path,
        in_progress: &'a mut Vec<Path>,
    ) -> BoxFuture<'a, Result<Resolution, ResolveError>> {
        Box::pin(async move {
            let full = path.resolve(&base);
            let cached = store.get(&full);

            match self.module.declaration_at(&full) {
                Some(Declaration::Dependency(dependency)) if cached.is_none() => {
                    self.run_dependency(store, full, dependency, in_progress).await
                }
                Some(Declaration::Alias(target)) if cached.is_none() => {
                    self.follow_alias(store, full, target, in_progress).await
                }
                declaration => {
                    // Cache hit, sub-module, or nothing declared: a plain
                    // read-through with no computation and no writes.
                    trace!(
                        path = %full,
                        cached = cached.is_some(),
                        declared = declaration.is_some(),
                        "read-through"
                    );
                    Ok(Resolution {
                        store,
                        value: cached,
                        changed: IndexSet::new(),
                    })
                }
            }
        })
    }

    /// Resolve every named reference, run the factory, commit the result.
    async fn run_dependency(
        &self,
        mut store: ValueStore,
        full: Path,
        dependency: &Dependency,
        in_progress: &mut Vec<Path>,
    ) -> Result<Resolution, ResolveError> {
        enter(&full, in_progress)?;

        // References resolve against the directory containing this
        // declaration, one at a time, each seeing the previous one's store.
        let parent = full.parent();
        let mut changed = IndexSet::new();
        let mut inputs = FactoryInputs::new();

        for (name, reference) in dependency.dependencies() {
            let sub_path = reference.resolve(&parent);
            let before = store.get(&sub_path);

            let outcome = self
                .resolve_inner(store, sub_path.clone(), parent.clone(), in_progress)
                .await?;
            store = outcome.store;
            changed.extend(outcome.changed);

            if outcome.value != before {
                changed.insert(sub_path);
            }
            if let Some(value) = outcome.value {
                inputs.insert(name.clone(), value);
            }
        }

        debug!(path = %full, inputs = inputs.len(), "invoking factory");
        let value = dependency
            .invoke(inputs)
            .await
            .map_err(|source| ResolveError::Factory {
                path: full.clone(),
                source,
            })?;
        in_progress.pop();

        // The cache missed (that is how this branch was entered), so the
        // computed value always commits.
        store = store.insert(&full, value.clone());
        changed.insert(full.clone());
        debug!(path = %full, "committed value");

        Ok(Resolution {
            store,
            value: Some(value),
            changed,
        })
    }

    /// Resolve the alias target and cache its value at the alias's path.
    ///
    /// Behaves like a dependency whose single reference is the target and
    /// whose factory returns it unchanged; a target that resolves to
    /// nothing leaves the alias unresolved rather than caching a null.
    async fn follow_alias(
        &self,
        store: ValueStore,
        full: Path,
        target: &Path,
        in_progress: &mut Vec<Path>,
    ) -> Result<Resolution, ResolveError> {
        enter(&full, in_progress)?;

        let parent = full.parent();
        let sub_path = target.resolve(&parent);
        let before = store.get(&sub_path);

        let Resolution {
            mut store,
            value,
            mut changed,
        } = self
            .resolve_inner(store, sub_path.clone(), parent, in_progress)
            .await?;
        in_progress.pop();

        if value != before {
            changed.insert(sub_path);
        }
        if let Some(value) = &value {
            store = store.insert(&full, value.clone());
            changed.insert(full.clone());
            debug!(path = %full, "committed alias value");
        }

        Ok(Resolution {
            store,
            value,
            changed,
        })
    }
}

/// Push `path` onto the in-progress stack, failing if it is already there.
fn enter(path: &Path, in_progress: &mut Vec<Path>) -> Result<(), ResolveError> {
    if let Some(position) = in_progress.iter().position(|entry| entry == path) {
        let mut chain: Vec<Path> = in_progress[position..].to_vec();
        chain.push(path.clone());
        return Err(ResolveError::Cycle { chain });
    }
    in_progress.push(path.clone());
    Ok(())
}
