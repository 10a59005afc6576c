//! Persistent value tree.
//!
//! The store is a tree of `Arc`-shared nodes. A read walks segment by
//! segment and short-circuits to `None` on the first miss; a write
//! shallow-copies the branch maps along the written path and re-uses every
//! sibling subtree by bumping its reference count. Sharing and update cost
//! are therefore explicit: a write allocates one map per level of the
//! written path, nothing more.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::path::{Path, Segment};

/// One node of the value tree.
#[derive(Debug, Clone)]
enum Node {
    /// A computed value.
    Leaf(Value),
    /// Nested structure, keyed by segment.
    Branch(IndexMap<Segment, Arc<Node>>),
}

impl Node {
    /// Materialize this subtree as a JSON value. Branches become objects
    /// keyed by the decoded segment form.
    fn to_value(&self) -> Value {
        match self {
            Node::Leaf(value) => value.clone(),
            Node::Branch(children) => {
                let mut object = serde_json::Map::with_capacity(children.len());
                for (segment, child) in children {
                    object.insert(segment.as_str().to_owned(), child.to_value());
                }
                Value::Object(object)
            }
        }
    }
}

/// An immutable, path-addressed snapshot of computed values.
///
/// Cloning a store is a reference-count bump; the tree itself is shared.
#[derive(Debug, Clone)]
pub struct ValueStore {
    root: Arc<Node>,
}

impl Default for ValueStore {
    fn default() -> Self {
        Self {
            root: Arc::new(Node::Branch(IndexMap::new())),
        }
    }
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        match self.root.as_ref() {
            Node::Branch(children) => children.is_empty(),
            Node::Leaf(_) => false,
        }
    }

    /// Read the value at `path`.
    ///
    /// Walks segments from the root and returns `None` the first time a
    /// segment lookup misses; intermediate leaves are not walked through.
    /// Reading a branch materializes the subtree as a JSON object, and
    /// reading the root path returns the whole snapshot.
    pub fn get(&self, path: &Path) -> Option<Value> {
        let mut node = &self.root;
        for segment in path.key_segments() {
            match node.as_ref() {
                Node::Branch(children) => node = children.get(segment)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node.to_value())
    }

    /// Write `value` at `path`, returning the updated store.
    ///
    /// Copy-on-write: the branch maps along `path` are copied, every
    /// sibling subtree is shared with the input store. Writing to the
    /// empty path copies the root and assigns nothing; meaningful writes
    /// use a non-empty path. A leaf in the middle of the written path is
    /// replaced by a branch.
    pub fn insert(&self, path: &Path, value: Value) -> ValueStore {
        let mut children = match self.root.as_ref() {
            Node::Branch(children) => children.clone(),
            Node::Leaf(_) => IndexMap::new(),
        };
        insert_into(&mut children, path.key_segments(), value);
        ValueStore {
            root: Arc::new(Node::Branch(children)),
        }
    }

    /// Materialize the whole snapshot as a JSON object.
    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }
}

/// Write `value` under `segments`, copying branch maps along the way.
fn insert_into(children: &mut IndexMap<Segment, Arc<Node>>, segments: &[Segment], value: Value) {
    match segments {
        [] => {}
        [last] => {
            children.insert(last.clone(), Arc::new(Node::Leaf(value)));
        }
        [first, rest @ ..] => {
            let mut nested = match children.get(first).map(Arc::as_ref) {
                Some(Node::Branch(existing)) => existing.clone(),
                _ => IndexMap::new(),
            };
            insert_into(&mut nested, rest, value);
            children.insert(first.clone(), Arc::new(Node::Branch(nested)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Fetch the raw node stored under a single root-level key.
    fn root_child(store: &ValueStore, key: &str) -> Arc<Node> {
        match store.root.as_ref() {
            Node::Branch(children) => Arc::clone(&children[&Segment::new(key)]),
            Node::Leaf(_) => panic!("store root is not a branch"),
        }
    }

    #[test]
    fn get_returns_none_for_missing_paths() {
        let store = ValueStore::new();
        assert!(store.get(&Path::parse("/missing")).is_none());
        assert!(store.get(&Path::parse("/deeply/missing/path")).is_none());
    }

    #[test]
    fn insert_then_get_round_trips() {
        let store = ValueStore::new().insert(&Path::parse("/a/b"), json!(42));
        assert_eq!(store.get(&Path::parse("/a/b")), Some(json!(42)));
    }

    #[test]
    fn absolute_and_relative_forms_address_the_same_slot() {
        let store = ValueStore::new().insert(&Path::parse("/a"), json!(1));
        assert_eq!(store.get(&Path::parse("a")), Some(json!(1)));
    }

    #[test]
    fn reading_a_branch_materializes_the_subtree() {
        let store = ValueStore::new()
            .insert(&Path::parse("/config/host"), json!("localhost"))
            .insert(&Path::parse("/config/port"), json!(8080));
        assert_eq!(
            store.get(&Path::parse("/config")),
            Some(json!({"host": "localhost", "port": 8080}))
        );
    }

    #[test]
    fn reading_the_root_returns_the_whole_snapshot() {
        let store = ValueStore::new()
            .insert(&Path::parse("/a"), json!(1))
            .insert(&Path::parse("/b"), json!(2));
        assert_eq!(store.get(&Path::root()), Some(json!({"a": 1, "b": 2})));
        assert_eq!(store.to_value(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn insert_does_not_mutate_the_input_store() {
        let before = ValueStore::new().insert(&Path::parse("/a"), json!(1));
        let after = before.insert(&Path::parse("/a"), json!(2));

        assert_eq!(before.get(&Path::parse("/a")), Some(json!(1)));
        assert_eq!(after.get(&Path::parse("/a")), Some(json!(2)));
    }

    #[test]
    fn untouched_branches_are_shared_between_snapshots() {
        let before = ValueStore::new()
            .insert(&Path::parse("/left/x"), json!(1))
            .insert(&Path::parse("/right/y"), json!(2));
        let after = before.insert(&Path::parse("/right/z"), json!(3));

        // The written branch is fresh, the sibling branch is the same node.
        assert!(Arc::ptr_eq(
            &root_child(&before, "left"),
            &root_child(&after, "left")
        ));
        assert!(!Arc::ptr_eq(
            &root_child(&before, "right"),
            &root_child(&after, "right")
        ));
    }

    #[test]
    fn writing_through_a_leaf_replaces_it_with_a_branch() {
        let store = ValueStore::new()
            .insert(&Path::parse("/a"), json!(1))
            .insert(&Path::parse("/a/b"), json!(2));
        assert_eq!(store.get(&Path::parse("/a/b")), Some(json!(2)));
        assert_eq!(store.get(&Path::parse("/a")), Some(json!({"b": 2})));
    }

    #[test]
    fn writing_the_empty_path_changes_nothing_observable() {
        let before = ValueStore::new().insert(&Path::parse("/a"), json!(1));
        let after = before.insert(&Path::new(), json!("ignored"));
        assert_eq!(after.to_value(), before.to_value());
    }

    #[test]
    fn null_is_a_stored_value_distinct_from_absence() {
        let store = ValueStore::new().insert(&Path::parse("/a"), Value::Null);
        assert_eq!(store.get(&Path::parse("/a")), Some(Value::Null));
        assert!(store.get(&Path::parse("/b")).is_none());
    }
}
