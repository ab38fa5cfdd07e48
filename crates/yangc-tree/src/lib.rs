//! yangc-tree: the labelled output tree the schema engine builds.
//!
//! This crate provides:
//!
//! - **Nodes**: named elements with an optional element namespace
//! - **Properties**: ordered name/value pairs (attribute-like arguments)
//! - **Text content**: for child-element-encoded arguments
//! - **Namespace declarations**: URI plus optional prefix, per node
//! - **Structure**: ordered children, parent links, unlink
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by [`NodeId`].
//! Unlinking detaches a subtree from its parent; the arena slots stay
//! allocated until the whole tree is dropped, so ids never dangle.

mod node;

pub use node::{NodeId, NsDecl, Tree, TreeError};
