//! Argument binding: how a statement's argument lands in the tree, how it is
//! read back, and the module-level namespace propagation it can trigger.
//!
//! Most statements carry their argument as a property on their own node; a
//! few text-heavy ones (`description`, `contact`, ...) encode it as a child
//! element holding text. The read-back half is exposed so a serializer can
//! reproduce the exact textual form, and so hooks can inspect sibling
//! statements that were parsed earlier.

use yangc_tree::{NodeId, Tree};

use crate::session::Session;
use crate::stmt::StmtDescriptor;
use crate::value::ArgValue;
use crate::{XSL_URI, YANGC_URI, YIN_URI};

/// Write `value` as the argument of the statement node.
pub(crate) fn write_argument(
    tree: &mut Tree,
    node: NodeId,
    arg_name: &str,
    as_element: bool,
    value: &ArgValue,
) {
    if as_element {
        let child = tree.append_child(node, arg_name);
        tree.set_text(child, &value.to_string());
    } else {
        tree.set_property(node, arg_name, &value.to_string());
    }
}

/// Read the argument of the statement node `node`, which was built from
/// descriptor `stmt`.
pub fn argument_of(tree: &Tree, node: NodeId, stmt: &StmtDescriptor) -> Option<String> {
    let arg_name = stmt.argument.as_deref()?;
    if stmt.arg_as_element {
        let child = tree.find_child(node, None, arg_name)?;
        tree.text(child).map(str::to_string)
    } else {
        tree.property(node, arg_name).map(str::to_string)
    }
}

/// Find the child of `parent` built from descriptor `stmt` and read its
/// argument.
pub fn argument_under(tree: &Tree, parent: NodeId, stmt: &StmtDescriptor) -> Option<String> {
    let namespace = stmt.namespace.as_deref().unwrap_or(YIN_URI);
    let child = tree.find_child(parent, Some(namespace), &stmt.name)?;
    argument_of(tree, child, stmt)
}

/// True when the node chain leaves the schema namespaces, i.e. a standard
/// statement is being used in a non-standard context where module-level side
/// effects must not fire.
fn used_outside_schema(tree: &Tree, node: NodeId) -> bool {
    let mut cur = Some(node);
    while let Some(n) = cur {
        match tree.namespace(n) {
            Some(uri) if uri == YIN_URI || uri == XSL_URI || uri == YANGC_URI => {}
            _ => return true,
        }
        cur = tree.parent(n);
    }
    false
}

/// Ensure the enclosing module node declares the module's namespace URI.
///
/// Triggered when a `namespace` or `prefix` argument is set. Reads both
/// values back from the module node (either statement may arrive first) and
/// adds whatever declaration is still missing: a plain one for the URI, and
/// a prefixed one once the prefix is known. Scanning existing declarations
/// first makes the whole operation idempotent.
pub(crate) fn ensure_module_namespaces(session: &mut Session<'_>) {
    let node = session.current_node();
    let registry = session.registry;
    let tree = &mut *session.tree;

    if used_outside_schema(tree, node) {
        return;
    }
    let Some(module) = tree.parent(node) else {
        return;
    };

    let Some(ns_stmt) = registry.find(None, "namespace") else {
        return;
    };
    let Some(uri) = argument_under(tree, module, ns_stmt) else {
        // Nothing to declare until the namespace statement arrives
        return;
    };
    let prefix = registry
        .find(None, "prefix")
        .and_then(|stmt| argument_under(tree, module, stmt));

    tracing::debug!(uri = %uri, prefix = prefix.as_deref().unwrap_or(""), "module namespace");

    let mut seen_plain = false;
    let mut seen_prefix = false;
    for decl in tree.namespace_decls(module) {
        if decl.uri != uri {
            continue;
        }
        match &decl.prefix {
            None => seen_plain = true,
            Some(p) if Some(p.as_str()) == prefix.as_deref() => seen_prefix = true,
            Some(_) => {}
        }
    }

    if !seen_plain {
        tree.declare_namespace(module, &uri, None);
    }
    if let Some(prefix) = prefix {
        if !seen_prefix {
            tree.declare_namespace(module, &uri, Some(&prefix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::ArgKind;

    #[test]
    fn property_argument_roundtrip() {
        let stmt = StmtDescriptor::new("leaf").argument("name", ArgKind::Ident);
        let mut tree = Tree::new("r");
        let node = tree.append_child(tree.root(), "leaf");

        write_argument(&mut tree, node, "name", false, &ArgValue::bare("mtu"));
        assert_eq!(tree.property(node, "name"), Some("mtu"));
        assert_eq!(argument_of(&tree, node, &stmt), Some("mtu".to_string()));
    }

    #[test]
    fn element_argument_roundtrip() {
        let stmt = StmtDescriptor::new("description")
            .argument("text", ArgKind::Str)
            .as_element();
        let mut tree = Tree::new("r");
        let node = tree.append_child(tree.root(), "description");

        write_argument(&mut tree, node, "text", true, &ArgValue::quoted("a leaf"));
        assert_eq!(tree.property(node, "text"), None);
        assert_eq!(argument_of(&tree, node, &stmt), Some("a leaf".to_string()));
    }

    #[test]
    fn argument_under_matches_namespace() {
        let stmt = StmtDescriptor::new("namespace").argument("uri", ArgKind::Str);
        let mut tree = Tree::new("r");
        let module = tree.append_child(tree.root(), "module");
        let ns = tree.append_child(module, "namespace");
        tree.set_namespace(ns, Some(YIN_URI));
        tree.set_property(ns, "uri", "urn:example");

        assert_eq!(
            argument_under(&tree, module, &stmt),
            Some("urn:example".to_string())
        );
    }

    #[test]
    fn outside_schema_detection() {
        let mut tree = Tree::new("stylesheet");
        let root = tree.root();
        tree.set_namespace(root, Some(XSL_URI));
        let module = tree.append_child(root, "module");
        tree.set_namespace(module, Some(YIN_URI));
        let foreign = tree.append_child(root, "config");
        tree.set_namespace(foreign, Some("urn:some-data-document"));

        assert!(!used_outside_schema(&tree, module));
        assert!(used_outside_schema(&tree, foreign));

        let bare = tree.append_child(module, "leaf");
        assert!(used_outside_schema(&tree, bare)); // no namespace at all
    }
}
