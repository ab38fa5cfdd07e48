//! Arena-backed tree of named nodes.

use thiserror::Error;

/// Errors for structural operations that violate the tree contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The root node cannot be detached from the tree.
    #[error("cannot unlink the root node")]
    UnlinkRoot,
}

/// Handle to a node in a [`Tree`].
///
/// Ids are only meaningful for the tree that created them. They stay valid
/// for the lifetime of the tree, even after the node is unlinked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A namespace declaration attached to a node: a URI with an optional prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    pub uri: String,
    pub prefix: Option<String>,
}

#[derive(Debug)]
struct NodeData {
    name: String,
    namespace: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    props: Vec<(String, String)>,
    text: Option<String>,
    ns_decls: Vec<NsDecl>,
}

impl NodeData {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            parent,
            children: Vec::new(),
            props: Vec::new(),
            text: None,
            ns_decls: Vec::new(),
        }
    }
}

/// An ordered tree of labelled nodes.
///
/// Created with a single root node; every other node is appended under an
/// existing one. The tree owns all node data; callers hold [`NodeId`]s.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    /// Create a tree with a root node of the given name.
    pub fn new(root_name: &str) -> Self {
        Self {
            nodes: vec![NodeData::new(root_name, None)],
            root: NodeId(0),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever created (linked or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds only the root node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Create a new node named `name` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(name, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach `node` (and its whole subtree) from its parent.
    ///
    /// The subtree is no longer reachable from the root; its ids remain
    /// usable. Unlinking an already-detached node is a no-op.
    pub fn unlink(&mut self, node: NodeId) -> Result<(), TreeError> {
        if node == self.root {
            return Err(TreeError::UnlinkRoot);
        }
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
        Ok(())
    }

    /// True if `node` is reachable from the root.
    pub fn is_linked(&self, node: NodeId) -> bool {
        let mut cur = node;
        while let Some(parent) = self.nodes[cur.0].parent {
            cur = parent;
        }
        cur == self.root
    }

    /// The node's name.
    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    /// Replace the node's name.
    pub fn rename(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].name = name.to_string();
    }

    /// The node's element namespace URI, if any.
    pub fn namespace(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].namespace.as_deref()
    }

    /// Set or clear the node's element namespace URI.
    pub fn set_namespace(&mut self, node: NodeId, uri: Option<&str>) {
        self.nodes[node.0].namespace = uri.map(str::to_string);
    }

    /// The node's parent, or `None` for the root and detached nodes.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// The node's children, in document order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Find the first child matching `name` and, when given, the namespace.
    pub fn find_child(&self, node: NodeId, namespace: Option<&str>, name: &str) -> Option<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|&c| {
                if self.name(c) != name {
                    return false;
                }
                match namespace {
                    Some(uri) => self.namespace(c) == Some(uri),
                    None => true,
                }
            })
    }

    /// Set a named property, replacing any previous value for that name.
    pub fn set_property(&mut self, node: NodeId, name: &str, value: &str) {
        let props = &mut self.nodes[node.0].props;
        if let Some(slot) = props.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            props.push((name.to_string(), value.to_string()));
        }
    }

    /// Look up a property by name.
    pub fn property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .props
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All properties of a node, in insertion order.
    pub fn properties(&self, node: NodeId) -> &[(String, String)] {
        &self.nodes[node.0].props
    }

    /// Set the node's text content.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = Some(text.to_string());
    }

    /// The node's text content, if any.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    /// Declare a namespace (URI + optional prefix) on a node.
    ///
    /// Declarations accumulate; the caller is expected to check
    /// [`Tree::namespace_decls`] first if duplicates matter.
    pub fn declare_namespace(&mut self, node: NodeId, uri: &str, prefix: Option<&str>) {
        self.nodes[node.0].ns_decls.push(NsDecl {
            uri: uri.to_string(),
            prefix: prefix.map(str::to_string),
        });
    }

    /// Namespace declarations on a node, in declaration order.
    pub fn namespace_decls(&self, node: NodeId) -> &[NsDecl] {
        &self.nodes[node.0].ns_decls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_navigate() {
        let mut tree = Tree::new("stylesheet");
        let root = tree.root();
        let module = tree.append_child(root, "module");
        let leaf = tree.append_child(module, "leaf");

        assert_eq!(tree.name(module), "module");
        assert_eq!(tree.parent(leaf), Some(module));
        assert_eq!(tree.children(root), &[module]);
        assert_eq!(tree.children(module), &[leaf]);
        assert!(tree.is_linked(leaf));
    }

    #[test]
    fn unlink_detaches_subtree() {
        let mut tree = Tree::new("stylesheet");
        let root = tree.root();
        let module = tree.append_child(root, "module");
        let leaf = tree.append_child(module, "leaf");

        tree.unlink(module).unwrap();
        assert!(tree.children(root).is_empty());
        assert!(!tree.is_linked(module));
        assert!(!tree.is_linked(leaf)); // whole subtree goes
        assert_eq!(tree.name(leaf), "leaf"); // ids still valid

        // Second unlink is a no-op
        tree.unlink(module).unwrap();
    }

    #[test]
    fn unlink_root_is_an_error() {
        let mut tree = Tree::new("stylesheet");
        let root = tree.root();
        assert_eq!(tree.unlink(root), Err(TreeError::UnlinkRoot));
    }

    #[test]
    fn properties_replace_by_name() {
        let mut tree = Tree::new("r");
        let n = tree.append_child(tree.root(), "leaf");
        tree.set_property(n, "name", "a");
        tree.set_property(n, "other", "x");
        tree.set_property(n, "name", "b");

        assert_eq!(tree.property(n, "name"), Some("b"));
        assert_eq!(tree.property(n, "other"), Some("x"));
        assert_eq!(tree.properties(n).len(), 2);
        assert_eq!(tree.property(n, "missing"), None);
    }

    #[test]
    fn text_and_namespace() {
        let mut tree = Tree::new("r");
        let n = tree.append_child(tree.root(), "description");
        assert_eq!(tree.text(n), None);
        tree.set_text(n, "a leaf");
        assert_eq!(tree.text(n), Some("a leaf"));

        assert_eq!(tree.namespace(n), None);
        tree.set_namespace(n, Some("urn:x"));
        assert_eq!(tree.namespace(n), Some("urn:x"));
        tree.set_namespace(n, None);
        assert_eq!(tree.namespace(n), None);
    }

    #[test]
    fn namespace_decls_accumulate() {
        let mut tree = Tree::new("r");
        let n = tree.root();
        tree.declare_namespace(n, "urn:example", None);
        tree.declare_namespace(n, "urn:example", Some("ex"));

        let decls = tree.namespace_decls(n);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].prefix, None);
        assert_eq!(decls[1].prefix.as_deref(), Some("ex"));
    }

    #[test]
    fn find_child_by_name_and_namespace() {
        let mut tree = Tree::new("r");
        let root = tree.root();
        let a = tree.append_child(root, "prefix");
        tree.set_namespace(a, Some("urn:core"));
        let b = tree.append_child(root, "prefix");

        assert_eq!(tree.find_child(root, Some("urn:core"), "prefix"), Some(a));
        assert_eq!(tree.find_child(root, None, "prefix"), Some(a));
        assert_eq!(tree.find_child(root, Some("urn:other"), "prefix"), None);
        assert_eq!(tree.find_child(root, None, "missing"), None);
        let _ = b;
    }
}
