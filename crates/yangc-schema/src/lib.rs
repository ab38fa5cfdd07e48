//! Schema engine for a statement-based modeling language.
//!
//! The language is a tree of `name argument { substatements }` blocks. This
//! crate supplies the grammar side of parsing it:
//!
//! - [`stmt`] — statement descriptors: name, argument shape, legal children
//!   with cardinality, lifecycle hooks.
//! - [`registry`] — the descriptor table, populated from [`builtin`] plus
//!   any extension namespaces, with extension statements spliced onto the
//!   parents they declare.
//! - [`session`] — the pushdown validator a tokenizer drives with
//!   `open` / `set_argument` / `check_argument` / `close` events; it builds
//!   statement nodes into a [`yangc_tree::Tree`] and discards structurally
//!   invalid subtrees.
//! - [`binder`] — how arguments land in the tree (property vs. text
//!   element) and are read back.
//! - [`value`] — argument values: literals, variable references, and
//!   concatenation that folds adjacent literals.
//!
//! The tokenizer itself lives with the host; the engine only sees its event
//! stream, which keeps the grammar reusable across front ends.

pub mod binder;
pub mod builtin;
pub mod diag;
pub mod registry;
pub mod session;
pub mod stmt;
pub mod value;

pub use diag::{Diagnostic, FatalError, IssueKind};
pub use registry::{Registry, RegistryError};
pub use session::{MAX_DEPTH, Session};
pub use stmt::{ArgKind, ChildRule, MAX_STATEMENTS, ParentRef, StmtDescriptor, StmtHook, StmtId};
pub use value::{ArgValue, LitKind, concat};

/// Core statement namespace (YIN).
pub const YIN_URI: &str = "urn:ietf:params:xml:ns:yang:yin:1";
/// Conventional prefix for [`YIN_URI`].
pub const YIN_PREFIX: &str = "yin";

/// Namespace of the compiler's own extension statements.
pub const YANGC_URI: &str = "https://yangc.dev/ns/extensions/1.0";
/// Conventional prefix for [`YANGC_URI`].
pub const YANGC_PREFIX: &str = "yangc";

/// XSLT namespace; template bodies in it nest opaquely.
pub const XSL_URI: &str = "http://www.w3.org/1999/XSL/Transform";
