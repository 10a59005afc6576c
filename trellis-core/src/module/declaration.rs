//! Declaration, dependency, and module types.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;

use crate::path::Path;

/// Error type a factory may fail with. The resolver wraps it together with
/// the originating path; it is never retried.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// Resolved values handed to a factory, keyed by reference name.
///
/// References that resolved to nothing are omitted from the map, so a
/// factory distinguishes "missing" from a stored `null`.
pub type FactoryInputs = IndexMap<String, Value>;

/// The build action of a dependency: consumes the resolved values of its
/// named references and produces the dependency's own value.
pub type Factory =
    Arc<dyn Fn(FactoryInputs) -> BoxFuture<'static, Result<Value, FactoryError>> + Send + Sync>;

/// A leaf declaration: an async factory plus the named path references it
/// needs resolved first.
///
/// `getters` and `setters` are carried in the data model for hosts that
/// use them; the resolution engine never consumes them.
#[derive(Clone)]
pub struct Dependency {
    dependencies: IndexMap<String, Path>,
    getters: IndexMap<String, Path>,
    setters: IndexMap<String, Path>,
    factory: Factory,
}

impl Dependency {
    /// Create a dependency with the given factory and no references.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn(FactoryInputs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, FactoryError>> + Send + 'static,
    {
        Self {
            dependencies: IndexMap::new(),
            getters: IndexMap::new(),
            setters: IndexMap::new(),
            factory: Arc::new(move |inputs| Box::pin(factory(inputs))),
        }
    }

    /// Add a named reference. Resolution follows insertion order, so the
    /// order of `with_dependency` calls is the order factories see their
    /// inputs settle.
    pub fn with_dependency(mut self, name: impl Into<String>, path: impl Into<Path>) -> Self {
        self.dependencies.insert(name.into(), path.into());
        self
    }

    /// Add a named getter reference (reserved; inert during resolution).
    pub fn with_getter(mut self, name: impl Into<String>, path: impl Into<Path>) -> Self {
        self.getters.insert(name.into(), path.into());
        self
    }

    /// Add a named setter reference (reserved; inert during resolution).
    pub fn with_setter(mut self, name: impl Into<String>, path: impl Into<Path>) -> Self {
        self.setters.insert(name.into(), path.into());
        self
    }

    /// The named references, in insertion order.
    pub fn dependencies(&self) -> &IndexMap<String, Path> {
        &self.dependencies
    }

    /// The reserved getter references.
    pub fn getters(&self) -> &IndexMap<String, Path> {
        &self.getters
    }

    /// The reserved setter references.
    pub fn setters(&self) -> &IndexMap<String, Path> {
        &self.setters
    }

    /// Run the factory with the gathered reference values.
    pub(crate) fn invoke(
        &self,
        inputs: FactoryInputs,
    ) -> BoxFuture<'static, Result<Value, FactoryError>> {
        (self.factory)(inputs)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("dependencies", &self.dependencies)
            .field("getters", &self.getters)
            .field("setters", &self.setters)
            .finish_non_exhaustive()
    }
}

/// A rule found at a path: how to compute a value or how to nest further
/// structure.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// A factory with named references.
    Dependency(Dependency),
    /// A nested sub-module.
    Module(Module),
    /// A bare path: resolves to the referenced value, cached at the
    /// alias's own path.
    Alias(Path),
}

impl Declaration {
    /// True for declarations the resolver computes and caches: plain
    /// dependencies and aliases.
    pub fn is_dependency(&self) -> bool {
        matches!(self, Declaration::Dependency(_) | Declaration::Alias(_))
    }
}

impl From<Dependency> for Declaration {
    fn from(dependency: Dependency) -> Self {
        Declaration::Dependency(dependency)
    }
}

impl From<Module> for Declaration {
    fn from(module: Module) -> Self {
        Declaration::Module(module)
    }
}

impl From<Path> for Declaration {
    fn from(target: Path) -> Self {
        Declaration::Alias(target)
    }
}

/// A mapping from key to declaration. The tree's shape mirrors the path
/// space: a path's segments are keys traversed one level at a time.
#[derive(Debug, Clone, Default)]
pub struct Module {
    entries: IndexMap<String, Declaration>,
}

impl Module {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, declaration: impl Into<Declaration>) -> Self {
        self.entries.insert(key.into(), declaration.into());
        self
    }

    /// Add an entry in place.
    pub fn insert(&mut self, key: impl Into<String>, declaration: impl Into<Declaration>) {
        self.entries.insert(key.into(), declaration.into());
    }

    /// Look up a direct entry by key.
    pub fn get(&self, key: &str) -> Option<&Declaration> {
        self.entries.get(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Declaration)> {
        self.entries.iter()
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the module has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The declaration at `path`, walking nested sub-modules one segment
    /// at a time.
    ///
    /// Returns `None` on the first missing key, for the empty path (a
    /// module is not itself a declaration), and when the path tries to
    /// walk *through* a non-module declaration.
    pub fn declaration_at(&self, path: &Path) -> Option<&Declaration> {
        let (first, rest) = path.key_segments().split_first()?;
        let mut declaration = self.entries.get(first.as_str())?;
        for segment in rest {
            match declaration {
                Declaration::Module(module) => {
                    declaration = module.entries.get(segment.as_str())?;
                }
                _ => return None,
            }
        }
        Some(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf() -> Dependency {
        Dependency::new(|_| async { Ok(json!(1)) })
    }

    #[test]
    fn declaration_at_walks_nested_modules() {
        let module = Module::new().with(
            "outer",
            Module::new().with("inner", leaf()),
        );

        let found = module.declaration_at(&Path::parse("/outer/inner"));
        assert!(matches!(found, Some(Declaration::Dependency(_))));

        let missing = module.declaration_at(&Path::parse("/outer/absent"));
        assert!(missing.is_none());
    }

    #[test]
    fn declaration_at_accepts_relative_paths() {
        let module = Module::new().with("a", leaf());
        assert!(module.declaration_at(&Path::parse("a")).is_some());
        assert!(module.declaration_at(&Path::parse("/a")).is_some());
    }

    #[test]
    fn declaration_at_stops_at_non_modules() {
        let module = Module::new().with("a", leaf());
        assert!(module.declaration_at(&Path::parse("/a/deeper")).is_none());
    }

    #[test]
    fn empty_path_names_no_declaration() {
        let module = Module::new().with("a", leaf());
        assert!(module.declaration_at(&Path::root()).is_none());
        assert!(module.declaration_at(&Path::new()).is_none());
    }

    #[test]
    fn dependencies_keep_insertion_order() {
        let dependency = leaf()
            .with_dependency("b", "/b")
            .with_dependency("a", "/a")
            .with_dependency("c", "/c");
        let names: Vec<&str> = dependency
            .dependencies()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn aliases_and_dependencies_classify_as_dependencies() {
        let module = Module::new()
            .with("dep", leaf())
            .with("alias", Path::parse("/dep"))
            .with("sub", Module::new());

        assert!(module.get("dep").is_some_and(Declaration::is_dependency));
        assert!(module.get("alias").is_some_and(Declaration::is_dependency));
        assert!(!module.get("sub").is_some_and(Declaration::is_dependency));
    }

    #[test]
    fn reserved_reference_maps_are_carried() {
        let dependency = leaf()
            .with_getter("current", "/state/current")
            .with_setter("update", "/state/update");
        assert_eq!(
            dependency.getters().get("current"),
            Some(&Path::parse("/state/current"))
        );
        assert_eq!(
            dependency.setters().get("update"),
            Some(&Path::parse("/state/update"))
        );
    }

    #[tokio::test]
    async fn factories_receive_their_inputs() {
        let dependency = Dependency::new(|inputs: FactoryInputs| async move {
            Ok(json!(inputs["x"].as_i64().unwrap_or(0) * 2))
        });
        let mut inputs = FactoryInputs::new();
        inputs.insert("x".to_owned(), json!(21));
        let value = dependency.invoke(inputs).await.expect("factory succeeds");
        assert_eq!(value, json!(42));
    }
}
