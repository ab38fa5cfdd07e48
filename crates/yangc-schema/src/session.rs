//! The parse stack / validator: one session per input.
//!
//! A session consumes the tokenizer's event stream — `open`, zero or more
//! `set_argument`, `check_argument`, `close` — and builds statement nodes
//! into the host-supplied tree while enforcing the registered grammar:
//!
//! - **Resolution**: each opened name is looked up in the registry; unknown
//!   statements are reported but processing continues.
//! - **Structure**: the parent's legal-children rules are checked, including
//!   single-occurrence tracking via a per-frame bitset over statement ids.
//! - **Discard**: a structurally invalid statement is built anyway, then
//!   unlinked from the tree when it closes, so no invalid fragment survives.
//! - **Opaque nesting**: inside a template body the eventual parent is
//!   unknowable, so structural checks are skipped for the whole subtree.
//!
//! Non-fatal problems accumulate as diagnostics; `finish` rejects the parse
//! if any were recorded. Exceeding the fixed nesting bound is fatal.

use yangc_tree::{NodeId, Tree};

use crate::diag::{Diagnostic, FatalError, IssueKind};
use crate::registry::Registry;
use crate::stmt::{ArgKind, MAX_STATEMENTS, StmtDescriptor, StmtId};
use crate::value::ArgValue;
use crate::{XSL_URI, YIN_URI, binder};

/// Maximum statement nesting depth. Exceeding it aborts the parse.
pub const MAX_DEPTH: usize = 256;

/// Validation mode of a frame.
///
/// OPAQUE frames skip structural checks entirely and propagate the mode to
/// every descendant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Opaque,
}

/// Fixed-size bitset over statement ids, tracking which single-occurrence
/// children a frame has already seen.
struct SeenSet([u64; MAX_STATEMENTS / 64]);

impl SeenSet {
    fn new() -> Self {
        Self([0; MAX_STATEMENTS / 64])
    }

    /// Set the bit for `id`, returning whether it was already set.
    fn test_and_set(&mut self, id: StmtId) -> bool {
        let word = id.index() / 64;
        let mask = 1u64 << (id.index() % 64);
        let seen = self.0[word] & mask != 0;
        self.0[word] |= mask;
        seen
    }
}

/// One open statement.
struct Frame {
    stmt: Option<StmtId>,
    node: NodeId,
    discard: bool,
    mode: Mode,
    seen: SeenSet,
    arg_seen: bool,
}

/// True for the one construct whose body cannot be structurally validated:
/// a template element, whose contents only find their real parent during a
/// later expansion phase.
fn induces_opaque_nesting(tree: &Tree, node: NodeId) -> bool {
    tree.namespace(node) == Some(XSL_URI) && tree.name(node) == "template"
}

/// Split a possibly namespace-qualified statement name.
///
/// The qualifier is everything before the last `:`; local names never
/// contain one, while namespace URIs may contain several.
fn split_qualified(raw: &str) -> (Option<&str>, &str) {
    match raw.rsplit_once(':') {
        Some(("", local)) => (None, local),
        Some((ns, local)) => (Some(ns), local),
        None => (None, raw),
    }
}

/// A single parse in progress.
///
/// Borrows the registry read-only (one registry serves many parses) and the
/// output tree exclusively. New statement nodes are appended under `root`.
pub struct Session<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) tree: &'a mut Tree,
    root: NodeId,
    stack: Vec<Frame>,
    diags: Vec<Diagnostic>,
    file: Option<String>,
    line: Option<u32>,
    main: Option<NodeId>,
    is_module: bool,
}

impl<'a> Session<'a> {
    /// Start a session appending statements under `root`.
    pub fn new(registry: &'a Registry, tree: &'a mut Tree, root: NodeId) -> Self {
        Self {
            registry,
            tree,
            root,
            stack: Vec::new(),
            diags: Vec::new(),
            file: None,
            line: None,
            main: None,
            is_module: false,
        }
    }

    /// Update the source position attached to subsequent diagnostics.
    pub fn set_location(&mut self, file: &str, line: u32) {
        self.file = Some(file.to_string());
        self.line = Some(line);
    }

    /// The registry backing this session.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// The output tree.
    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// The node of the innermost open statement, or the session root.
    pub fn current_node(&self) -> NodeId {
        self.stack.last().map_or(self.root, |f| f.node)
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diags
    }

    /// Number of problems recorded so far.
    pub fn error_count(&self) -> usize {
        self.diags.len()
    }

    /// The module/submodule node, once its argument has been seen.
    pub fn main_node(&self) -> Option<NodeId> {
        self.main
    }

    /// True once a `module` (rather than `submodule`) argument was seen.
    pub fn is_module(&self) -> bool {
        self.is_module
    }

    pub(crate) fn record_main(&mut self, is_module: bool) {
        self.main = Some(self.current_node());
        if is_module {
            self.is_module = true;
        }
    }

    fn report(&mut self, kind: IssueKind, message: String) {
        tracing::debug!(?kind, %message, "validation problem");
        self.diags.push(Diagnostic {
            kind,
            message,
            file: self.file.clone(),
            line: self.line,
        });
    }

    /// Open a statement.
    ///
    /// Creates its node, checks it against the parent's grammar, pushes a
    /// frame, and returns the value shape the tokenizer should expect for
    /// the upcoming argument (string-shaped when nothing better is known).
    pub fn open(&mut self, raw_name: &str) -> Result<ArgKind, FatalError> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(FatalError::StackDepthExceeded { max: MAX_DEPTH });
        }

        let (namespace, local) = split_qualified(raw_name);
        let registry = self.registry;
        let stmt = registry.find(namespace, local);

        let parent_node = self.current_node();
        let node = self.tree.append_child(parent_node, local);
        tracing::debug!(name = raw_name, depth = self.stack.len(), "open");

        let parent_opaque = self.stack.last().is_some_and(|f| f.mode == Mode::Opaque);
        let mode = if parent_opaque || induces_opaque_nesting(self.tree, parent_node) {
            Mode::Opaque
        } else {
            Mode::Strict
        };

        let mut discard = false;
        let mut shape = ArgKind::Str;
        match stmt {
            Some(stmt) => {
                self.tree
                    .set_namespace(node, Some(stmt.namespace.as_deref().unwrap_or(YIN_URI)));
                if mode == Mode::Strict {
                    discard = self.check_child_rule(stmt, raw_name);
                }
                if stmt.arg_kind != ArgKind::None {
                    shape = stmt.arg_kind;
                }
            }
            None => {
                self.report(
                    IssueKind::UnknownStatement,
                    format!("unknown statement: {raw_name}"),
                );
            }
        }

        self.stack.push(Frame {
            stmt: stmt.map(StmtDescriptor::id),
            node,
            discard,
            mode,
            seen: SeenSet::new(),
            arg_seen: false,
        });

        if let Some(stmt) = stmt {
            if let Some(hook) = stmt.on_open {
                hook(self, stmt);
            }
        }

        Ok(shape)
    }

    /// Check `stmt` against the parent frame's legal-children rules.
    ///
    /// Returns true when the new frame must be discarded on close. A parent
    /// with no child rules accepts anything (its grammar is open-ended).
    fn check_child_rule(&mut self, stmt: &StmtDescriptor, raw_name: &str) -> bool {
        let registry = self.registry;
        let Some(parent) = self.stack.last_mut() else {
            return false;
        };
        let Some(parent_id) = parent.stmt else {
            return false;
        };
        let parent_stmt = registry.get(parent_id);
        if parent_stmt.children.is_empty() {
            return false;
        }

        let rule = parent_stmt
            .children
            .iter()
            .find(|r| r.name == stmt.name && r.namespace == stmt.namespace);

        let issue = match rule {
            None => Some((
                IssueKind::IllegalChild,
                format!(
                    "statement '{}' cannot contain statement '{}'",
                    parent_stmt.name, raw_name
                ),
            )),
            Some(rule) if !rule.repeatable && parent.seen.test_and_set(stmt.id) => Some((
                IssueKind::DuplicateChild,
                format!(
                    "statement '{}' can only contain one statement '{}'",
                    parent_stmt.name, raw_name
                ),
            )),
            Some(_) => None,
        };

        match issue {
            Some((kind, message)) => {
                self.report(kind, message);
                true
            }
            None => false,
        }
    }

    /// Attach the current statement's argument value.
    ///
    /// The value lands as a property or as a child element with text,
    /// according to the descriptor. Arguments on unknown statements are kept
    /// under the generic property name `argument` so no input is lost.
    pub fn set_argument(&mut self, value: ArgValue) {
        let registry = self.registry;
        let Some(frame) = self.stack.last() else {
            tracing::warn!("set_argument with no open statement");
            return;
        };
        let node = frame.node;

        let Some(stmt) = frame.stmt.map(|id| registry.get(id)) else {
            binder::write_argument(self.tree, node, "argument", false, &value);
            self.mark_arg_seen();
            return;
        };

        let Some(arg_name) = stmt.argument.as_deref() else {
            let message = format!(
                "statement '{}' does not accept an argument ('{}')",
                stmt.name, value
            );
            self.report(IssueKind::ArgumentNotAccepted, message);
            return;
        };

        binder::write_argument(self.tree, node, arg_name, stmt.arg_as_element, &value);
        self.mark_arg_seen();

        if let Some(hook) = stmt.on_set_arg {
            hook(self, stmt);
        }
    }

    fn mark_arg_seen(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.arg_seen = true;
        }
    }

    /// Verify the current statement received the argument it declares.
    ///
    /// Called once the tokenizer has consumed all argument tokens for the
    /// statement.
    pub fn check_argument(&mut self) {
        let registry = self.registry;
        let missing = self.stack.last().and_then(|frame| {
            let stmt = registry.get(frame.stmt?);
            (stmt.argument.is_some() && !frame.arg_seen).then(|| stmt.name.clone())
        });

        if let Some(name) = missing {
            self.report(IssueKind::MissingArgument, format!("missing argument for {name}"));
        }
    }

    /// Close the innermost open statement.
    ///
    /// Runs the close hook, pops the frame, and unlinks the node if the
    /// frame was marked for discard.
    pub fn close(&mut self, raw_name: &str) -> Result<(), FatalError> {
        let registry = self.registry;
        let Some(stmt_id) = self.stack.last().map(|f| f.stmt) else {
            return Err(FatalError::CloseWithoutOpen);
        };

        if let Some(id) = stmt_id {
            let stmt = registry.get(id);
            if let Some(hook) = stmt.on_close {
                hook(self, stmt);
            }
        }

        tracing::debug!(name = raw_name, "close");
        if let Some(frame) = self.stack.pop() {
            if frame.discard {
                tracing::debug!(node = self.tree.name(frame.node), "discarding invalid statement");
                if self.tree.unlink(frame.node).is_err() {
                    tracing::warn!("cannot discard the session root");
                }
            }
        }
        Ok(())
    }

    /// End the parse: accept only a balanced stream with no recorded
    /// problems. On rejection the caller must discard the output tree.
    pub fn finish(self) -> Result<(), Vec<Diagnostic>> {
        let Session {
            stack,
            mut diags,
            file,
            line,
            ..
        } = self;

        if !stack.is_empty() {
            diags.push(Diagnostic {
                kind: IssueKind::UnclosedStatement,
                message: format!("{} statement(s) left open", stack.len()),
                file,
                line,
            });
        }

        if diags.is_empty() { Ok(()) } else { Err(diags) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_qualified_names() {
        assert_eq!(split_qualified("leaf"), (None, "leaf"));
        assert_eq!(split_qualified("urn:x:help"), (Some("urn:x"), "help"));
        assert_eq!(split_qualified(":leaf"), (None, "leaf"));
        assert_eq!(
            split_qualified("urn:ietf:params:xml:ns:yang:yin:1:leaf"),
            (Some("urn:ietf:params:xml:ns:yang:yin:1"), "leaf")
        );
    }

    #[test]
    fn seen_set_test_and_set() {
        let mut seen = SeenSet::new();
        let a = StmtId::new(3);
        let b = StmtId::new(130);

        assert!(!seen.test_and_set(a));
        assert!(seen.test_and_set(a));
        assert!(!seen.test_and_set(b));
        assert!(seen.test_and_set(b));
    }
}
