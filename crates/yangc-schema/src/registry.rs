//! The statement registry: every statement kind the engine accepts.
//!
//! Populated once at startup — core statements first, then any extension
//! namespaces — and read-only afterwards, so a single registry can back any
//! number of parses.

use std::collections::HashMap;

use thiserror::Error;

use crate::YIN_URI;
use crate::builtin;
use crate::stmt::{ChildRule, MAX_STATEMENTS, StmtDescriptor, StmtId};

/// Errors raised while populating the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The fixed statement-id space is exhausted.
    #[error("statement table is full ({max} statements)")]
    TableFull { max: usize },
    /// A `(namespace, name)` pair was registered twice.
    #[error("statement '{qualified}' is already registered")]
    Duplicate { qualified: String },
}

/// Index of all registered statement descriptors.
///
/// Append-only: `register` assigns each descriptor the next sequential
/// [`StmtId`] and resolves its `legalParents` splice requests against the
/// statements registered so far, so registration order must put parents
/// before the extensions that target them.
#[derive(Default)]
pub struct Registry {
    stmts: Vec<StmtDescriptor>,
    by_name: HashMap<String, Vec<StmtId>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in statement table and the compiler
    /// extension statements.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        builtin::install(&mut registry)?;
        Ok(registry)
    }

    /// Register a batch of descriptors under `namespace`.
    ///
    /// Descriptors that already carry a namespace keep it. For each declared
    /// legal parent, a matching child rule is spliced onto that parent's
    /// grammar; parents that cannot be found are logged and dropped, which
    /// is not fatal.
    pub fn register(
        &mut self,
        descriptors: Vec<StmtDescriptor>,
        namespace: Option<&str>,
    ) -> Result<(), RegistryError> {
        for mut stmt in descriptors {
            if self.stmts.len() >= MAX_STATEMENTS {
                return Err(RegistryError::TableFull {
                    max: MAX_STATEMENTS,
                });
            }
            if stmt.namespace.is_none() {
                stmt.namespace = namespace.map(str::to_string);
            }
            if self.contains_exact(stmt.namespace.as_deref(), &stmt.name) {
                return Err(RegistryError::Duplicate {
                    qualified: qualify(stmt.namespace.as_deref(), &stmt.name),
                });
            }

            stmt.id = StmtId::new(self.stmts.len());
            self.splice_into_parents(&stmt);

            self.by_name
                .entry(stmt.name.clone())
                .or_default()
                .push(stmt.id);
            self.stmts.push(stmt);
        }
        Ok(())
    }

    /// Append a child rule for `stmt` to each parent it declares.
    fn splice_into_parents(&mut self, stmt: &StmtDescriptor) {
        for parent_ref in &stmt.parents {
            let Some(parent_id) = self
                .find(parent_ref.namespace.as_deref(), &parent_ref.name)
                .map(StmtDescriptor::id)
            else {
                tracing::warn!(
                    parent = %qualify(parent_ref.namespace.as_deref(), &parent_ref.name),
                    statement = %stmt.name,
                    "extension parent not found; dropping"
                );
                continue;
            };

            let rule = ChildRule {
                name: stmt.name.clone(),
                namespace: stmt.namespace.clone(),
                mandatory: parent_ref.mandatory,
                repeatable: parent_ref.repeatable,
            };
            self.stmts[parent_id.index()].children.push(rule);
        }
    }

    /// Namespace-aware lookup.
    ///
    /// A query in the core namespace also matches descriptors with no
    /// explicit namespace (core statements are implicitly in it); an
    /// unqualified query matches only unqualified descriptors.
    pub fn find(&self, namespace: Option<&str>, name: &str) -> Option<&StmtDescriptor> {
        let ids = self.by_name.get(name)?;
        ids.iter().map(|id| &self.stmts[id.index()]).find(|stmt| {
            match (namespace, stmt.namespace.as_deref()) {
                (Some(query), Some(owned)) => query == owned,
                (Some(query), None) => query == YIN_URI,
                (None, Some(_)) => false,
                (None, None) => true,
            }
        })
    }

    /// Fetch a descriptor by id.
    pub fn get(&self, id: StmtId) -> &StmtDescriptor {
        &self.stmts[id.index()]
    }

    /// Number of registered statements.
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// All registered descriptors, in registration (id) order.
    pub fn statements(&self) -> impl Iterator<Item = &StmtDescriptor> {
        self.stmts.iter()
    }

    /// Exact `(namespace, name)` membership, without sentinel matching.
    fn contains_exact(&self, namespace: Option<&str>, name: &str) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|ids| {
                ids.iter()
                    .any(|id| self.stmts[id.index()].namespace.as_deref() == namespace)
            })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("statements", &self.stmts.len())
            .finish()
    }
}

fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}:{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::{ArgKind, ParentRef};

    fn core() -> Vec<StmtDescriptor> {
        vec![
            StmtDescriptor::new("module")
                .argument("name", ArgKind::Ident)
                .with_children([ChildRule::many("leaf")]),
            StmtDescriptor::new("leaf").argument("name", ArgKind::Ident),
        ]
    }

    #[test]
    fn ids_follow_registration_order() {
        let mut registry = Registry::new();
        registry.register(core(), None).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find(None, "module").unwrap().id().index(), 0);
        assert_eq!(registry.find(None, "leaf").unwrap().id().index(), 1);
    }

    #[test]
    fn find_is_namespace_exact() {
        let mut registry = Registry::new();
        registry.register(core(), None).unwrap();
        registry
            .register(
                vec![StmtDescriptor::new("help").argument("text", ArgKind::Str)],
                Some("urn:x"),
            )
            .unwrap();

        assert!(registry.find(Some("urn:x"), "help").is_some());
        assert!(registry.find(Some("urn:y"), "help").is_none());
        assert!(registry.find(None, "help").is_none());
    }

    #[test]
    fn core_namespace_sentinel_matches_unqualified() {
        let mut registry = Registry::new();
        registry.register(core(), None).unwrap();

        assert!(registry.find(Some(YIN_URI), "leaf").is_some());
        assert!(registry.find(Some("urn:x"), "leaf").is_none());
        assert!(registry.find(None, "leaf").is_some());
    }

    #[test]
    fn extension_splices_into_parent() {
        let mut registry = Registry::new();
        registry.register(core(), None).unwrap();
        registry
            .register(
                vec![
                    StmtDescriptor::new("help")
                        .argument("text", ArgKind::Str)
                        .with_parents([ParentRef::one("leaf"), ParentRef::many("module")]),
                ],
                Some("urn:x"),
            )
            .unwrap();

        let leaf = registry.find(None, "leaf").unwrap();
        assert_eq!(leaf.children().len(), 1);
        assert_eq!(leaf.children()[0].name, "help");
        assert_eq!(leaf.children()[0].namespace.as_deref(), Some("urn:x"));
        assert!(!leaf.children()[0].repeatable);

        let module = registry.find(None, "module").unwrap();
        assert!(
            module
                .children()
                .iter()
                .any(|r| r.name == "help" && r.repeatable)
        );
    }

    #[test]
    fn unresolved_parent_is_dropped_not_fatal() {
        let mut registry = Registry::new();
        registry
            .register(
                vec![
                    StmtDescriptor::new("orphan")
                        .argument("text", ArgKind::Str)
                        .with_parents([ParentRef::one("no-such-statement")]),
                ],
                Some("urn:x"),
            )
            .unwrap();

        assert!(registry.find(Some("urn:x"), "orphan").is_some());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry.register(core(), None).unwrap();
        let err = registry
            .register(vec![StmtDescriptor::new("leaf")], None)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { .. }));

        // Same name under another namespace is fine
        registry
            .register(vec![StmtDescriptor::new("leaf")], Some("urn:x"))
            .unwrap();
    }

    #[test]
    fn splice_is_order_insensitive_once_parents_exist() {
        let ext = || {
            vec![
                StmtDescriptor::new("note")
                    .argument("text", ArgKind::Str)
                    .with_parents([ParentRef::one("module"), ParentRef::one("leaf")]),
            ]
        };

        // All core first, then the extension
        let mut upfront = Registry::new();
        upfront.register(core(), None).unwrap();
        upfront.register(ext(), Some("urn:x")).unwrap();

        // Core split across batches, extension registered after its parents
        let mut interleaved = Registry::new();
        interleaved
            .register(
                vec![
                    StmtDescriptor::new("module")
                        .argument("name", ArgKind::Ident)
                        .with_children([ChildRule::many("leaf")]),
                ],
                None,
            )
            .unwrap();
        interleaved
            .register(
                vec![StmtDescriptor::new("leaf").argument("name", ArgKind::Ident)],
                None,
            )
            .unwrap();
        interleaved.register(ext(), Some("urn:x")).unwrap();

        for name in ["module", "leaf"] {
            let a = upfront.find(None, name).unwrap().children().to_vec();
            let b = interleaved.find(None, name).unwrap().children().to_vec();
            assert_eq!(a, b, "children of '{name}' differ");
        }
    }

    #[test]
    fn table_full_is_an_error() {
        let mut registry = Registry::new();
        let batch: Vec<_> = (0..MAX_STATEMENTS)
            .map(|i| StmtDescriptor::new(&format!("s{i}")))
            .collect();
        registry.register(batch, None).unwrap();

        let err = registry
            .register(vec![StmtDescriptor::new("overflow")], None)
            .unwrap_err();
        assert!(matches!(err, RegistryError::TableFull { .. }));
    }
}
