//! Reverse-dependency index.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::module::{Declaration, Module};
use crate::path::Path;

/// Mapping from a depended-upon path (serialized, resolved against the
/// declaring directory) to the paths that declare a dependency on it.
///
/// Each dependant list is ordered first-seen and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependantTree {
    entries: IndexMap<String, Vec<Path>>,
}

impl DependantTree {
    /// Build the dependant tree of `module`, rooted at the absolute root.
    pub fn build(module: &Module) -> Self {
        Self::build_at(module, &Path::root())
    }

    /// Build the dependant tree of `module`, treating its entries as
    /// living directly under `base`.
    ///
    /// Dependencies contribute one edge per named reference; aliases
    /// contribute a single edge to their target; sub-modules recurse with
    /// their own base and merge into the accumulator.
    pub fn build_at(module: &Module, base: &Path) -> Self {
        let mut tree = DependantTree::default();
        for (key, declaration) in module.iter() {
            let at = base.child(key.as_str());
            match declaration {
                Declaration::Dependency(dependency) => {
                    for referenced in dependency.dependencies().values() {
                        tree.record(referenced.resolve(base), at.clone());
                    }
                }
                Declaration::Alias(target) => {
                    tree.record(target.resolve(base), at.clone());
                }
                Declaration::Module(nested) => {
                    tree = tree.merge(Self::build_at(nested, &at));
                }
            }
        }
        trace!(base = %base, entries = tree.len(), "built dependant tree");
        tree
    }

    /// Key-wise union of two trees: left operand's order first, then the
    /// right operand's unseen entries. No entry is dropped or duplicated,
    /// so the merge is associative and commutative up to list order.
    pub fn merge(mut self, other: DependantTree) -> DependantTree {
        for (key, dependants) in other.entries {
            let entry = self.entries.entry(key).or_default();
            for dependant in dependants {
                if !entry.contains(&dependant) {
                    entry.push(dependant);
                }
            }
        }
        self
    }

    /// The paths that declared a dependency on `path`.
    pub fn dependants_of(&self, path: &Path) -> &[Path] {
        self.entries
            .get(&path.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate entries as (serialized depended-upon path, dependants).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &[Path])> {
        self.entries
            .iter()
            .map(|(key, dependants)| (key, dependants.as_slice()))
    }

    /// Number of depended-upon paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no declaration references anything.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, depended: Path, dependant: Path) {
        let entry = self.entries.entry(depended.to_string()).or_default();
        if !entry.contains(&dependant) {
            entry.push(dependant);
        }
    }
}
