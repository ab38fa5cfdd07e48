//! The built-in statement table: the full substatement-cardinality grammar
//! of the modeling language, expressed as data.
//!
//! Core statements live in the default namespace. The compiler's own
//! extension statements (`children`, `parents`, `help`) live in
//! [`YANGC_URI`](crate::YANGC_URI) and splice themselves onto their parents
//! through `legalParents` declarations — the same mechanism third-party
//! extensions use.

use crate::binder;
use crate::registry::{Registry, RegistryError};
use crate::session::Session;
use crate::stmt::{ArgKind, ChildRule, ParentRef, StmtDescriptor};
use crate::{YANGC_URI, YIN_URI};

/// Register the core table and the compiler extensions.
pub fn install(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(core_statements(), None)?;
    registry.register(extension_statements(), Some(YANGC_URI))
}

fn set_arg_module(session: &mut Session<'_>, stmt: &StmtDescriptor) {
    tracing::debug!(statement = %stmt.name(), "recording main statement");
    session.record_main(stmt.name() == "module");
}

fn set_arg_namespace(session: &mut Session<'_>, stmt: &StmtDescriptor) {
    tracing::debug!(statement = %stmt.name(), "module namespace argument");
    binder::ensure_module_namespaces(session);
}

/// A `help` statement compiles down to a core `description` node.
fn set_arg_help(session: &mut Session<'_>, _stmt: &StmtDescriptor) {
    let node = session.current_node();
    session.tree.rename(node, "description");
    session.tree.set_namespace(node, Some(YIN_URI));
}

fn close_extension(session: &mut Session<'_>, _stmt: &StmtDescriptor) {
    let node = session.current_node();
    let name = session
        .tree
        .property(node, "name")
        .unwrap_or_default()
        .to_string();
    let element = session
        .registry
        .find(None, "argument")
        .and_then(|arg| binder::argument_under(session.tree, node, arg))
        .unwrap_or_default();
    tracing::debug!(name = %name, argument = %element, "extension declared");
}

/// The core statements, in alphabetical order.
pub fn core_statements() -> Vec<StmtDescriptor> {
    vec![
        StmtDescriptor::new("anyxml")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("config"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::one("mandatory"),
                ChildRule::many("must"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("argument")
            .argument("name", ArgKind::Ident)
            .with_children([ChildRule::one("yin-element")]),
        StmtDescriptor::new("augment")
            .argument("target-node", ArgKind::Target)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("case"),
                ChildRule::many("choice"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("uses"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("base").argument("name", ArgKind::Str),
        StmtDescriptor::new("belongs-to")
            .argument("module", ArgKind::Ident)
            .with_children([ChildRule::required("prefix")]),
        StmtDescriptor::new("bit")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("description"),
                ChildRule::one("position"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
            ]),
        StmtDescriptor::new("case")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("choice"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("uses"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("choice")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("case"),
                ChildRule::one("config"),
                ChildRule::many("container"),
                ChildRule::one("default"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::one("mandatory"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("config").argument("value", ArgKind::Boolean),
        StmtDescriptor::new("contact")
            .argument("text", ArgKind::Str)
            .as_element(),
        StmtDescriptor::new("container")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("choice"),
                ChildRule::one("config"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("grouping"),
                ChildRule::many("if-feature"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::many("must"),
                ChildRule::one("presence"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("typedef"),
                ChildRule::many("uses"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("default").argument("value", ArgKind::Str),
        StmtDescriptor::new("description")
            .argument("text", ArgKind::Str)
            .as_element(),
        StmtDescriptor::new("deviate")
            .argument("value", ArgKind::Deviate)
            .with_children([
                ChildRule::one("config"),
                ChildRule::one("default"),
                ChildRule::one("mandatory"),
                ChildRule::one("max-elements"),
                ChildRule::one("min-elements"),
                ChildRule::many("must"),
                ChildRule::one("type"),
                ChildRule::many("unique"),
                ChildRule::one("units"),
            ]),
        StmtDescriptor::new("deviation")
            .argument("target-node", ArgKind::Target)
            .with_children([
                ChildRule::one("description"),
                ChildRule::required_many("deviate"),
                ChildRule::one("reference"),
            ]),
        StmtDescriptor::new("enum")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("description"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::one("value"),
            ]),
        StmtDescriptor::new("error-app-tag").argument("value", ArgKind::Str),
        StmtDescriptor::new("error-message")
            .argument("value", ArgKind::Str)
            .as_element(),
        StmtDescriptor::new("extension")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("argument"),
                ChildRule::one("description"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
            ])
            .on_close(close_extension),
        StmtDescriptor::new("feature")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
            ]),
        StmtDescriptor::new("fraction-digits").argument("value", ArgKind::Number),
        StmtDescriptor::new("grouping")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("choice"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("grouping"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("typedef"),
                ChildRule::many("uses"),
            ]),
        StmtDescriptor::new("identity")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("base"),
                ChildRule::one("description"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
            ]),
        StmtDescriptor::new("if-feature").argument("name", ArgKind::Ident),
        StmtDescriptor::new("import")
            .argument("module", ArgKind::Ident)
            .with_children([ChildRule::one("prefix"), ChildRule::many("revision-date")]),
        StmtDescriptor::new("include")
            .argument("module", ArgKind::Ident)
            .with_children([ChildRule::many("revision-date")]),
        StmtDescriptor::new("input").with_children([
            ChildRule::many("anyxml"),
            ChildRule::many("choice"),
            ChildRule::many("container"),
            ChildRule::many("grouping"),
            ChildRule::many("leaf"),
            ChildRule::many("leaf-list"),
            ChildRule::many("list"),
            ChildRule::many("typedef"),
            ChildRule::many("uses"),
        ]),
        StmtDescriptor::new("key").argument("value", ArgKind::Str),
        StmtDescriptor::new("leaf")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("config"),
                ChildRule::one("default"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::one("mandatory"),
                ChildRule::many("must"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::required("type"),
                ChildRule::one("units"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("leaf-list")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("config"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::one("max-elements"),
                ChildRule::one("min-elements"),
                ChildRule::many("must"),
                ChildRule::one("ordered-by"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::required("type"),
                ChildRule::one("units"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("length")
            .argument("value", ArgKind::Range)
            .with_children([
                ChildRule::one("description"),
                ChildRule::one("error-app-tag"),
                ChildRule::one("error-message"),
                ChildRule::one("reference"),
            ]),
        StmtDescriptor::new("list")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("choice"),
                ChildRule::one("config"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("grouping"),
                ChildRule::many("if-feature"),
                ChildRule::one("key"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::one("max-elements"),
                ChildRule::one("min-elements"),
                ChildRule::many("must"),
                ChildRule::one("ordered-by"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("typedef"),
                ChildRule::many("unique"),
                ChildRule::many("uses"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("mandatory").argument("value", ArgKind::Boolean),
        StmtDescriptor::new("max-elements").argument("value", ArgKind::Number),
        StmtDescriptor::new("min-elements").argument("value", ArgKind::Number),
        StmtDescriptor::new("module")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("augment"),
                ChildRule::many("choice"),
                ChildRule::one("contact"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("deviation"),
                ChildRule::many("extension"),
                ChildRule::many("feature"),
                ChildRule::many("grouping"),
                ChildRule::many("identity"),
                ChildRule::many("import"),
                ChildRule::many("include"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::required("namespace"),
                ChildRule::many("notification"),
                ChildRule::one("organization"),
                ChildRule::required("prefix"),
                ChildRule::many("reference"),
                ChildRule::many("revision"),
                ChildRule::many("rpc"),
                ChildRule::many("typedef"),
                ChildRule::many("uses"),
                ChildRule::one("yang-version"),
            ])
            .on_set_arg(set_arg_module),
        StmtDescriptor::new("must")
            .argument("condition", ArgKind::Xpath)
            .with_children([
                ChildRule::one("description"),
                ChildRule::one("error-app-tag"),
                ChildRule::one("error-message"),
                ChildRule::one("reference"),
            ]),
        StmtDescriptor::new("namespace")
            .argument("uri", ArgKind::Str)
            .with_children([ChildRule::one("prefix"), ChildRule::many("revision-date")])
            .on_set_arg(set_arg_namespace),
        StmtDescriptor::new("notification")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("choice"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("grouping"),
                ChildRule::many("if-feature"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("typedef"),
            ]),
        StmtDescriptor::new("ordered-by").argument("value", ArgKind::Ordered),
        StmtDescriptor::new("organization")
            .argument("text", ArgKind::Str)
            .as_element(),
        StmtDescriptor::new("output").with_children([
            ChildRule::many("anyxml"),
            ChildRule::many("choice"),
            ChildRule::many("container"),
            ChildRule::many("grouping"),
            ChildRule::many("leaf"),
            ChildRule::many("leaf-list"),
            ChildRule::many("list"),
            ChildRule::many("typedef"),
            ChildRule::many("uses"),
        ]),
        StmtDescriptor::new("path").argument("value", ArgKind::Target),
        StmtDescriptor::new("pattern")
            .argument("value", ArgKind::Str)
            .with_children([
                ChildRule::one("description"),
                ChildRule::one("error-app-tag"),
                ChildRule::one("error-message"),
                ChildRule::one("reference"),
            ]),
        StmtDescriptor::new("position").argument("value", ArgKind::Number),
        StmtDescriptor::new("prefix")
            .argument("value", ArgKind::Ident)
            .on_set_arg(set_arg_namespace),
        StmtDescriptor::new("presence").argument("value", ArgKind::Str),
        StmtDescriptor::new("range")
            .argument("value", ArgKind::Range)
            .with_children([
                ChildRule::one("description"),
                ChildRule::one("error-app-tag"),
                ChildRule::one("error-message"),
                ChildRule::one("reference"),
            ]),
        StmtDescriptor::new("reference")
            .argument("text", ArgKind::Str)
            .as_element(),
        StmtDescriptor::new("refine")
            .argument("target-node", ArgKind::Target)
            .with_children([ChildRule::one("description")]),
        StmtDescriptor::new("require-instance").argument("value", ArgKind::Boolean),
        StmtDescriptor::new("revision")
            .argument("date", ArgKind::Str)
            .with_children([ChildRule::one("description"), ChildRule::one("reference")]),
        StmtDescriptor::new("revision-date").argument("date", ArgKind::Str),
        StmtDescriptor::new("rpc")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("description"),
                ChildRule::many("grouping"),
                ChildRule::many("if-feature"),
                ChildRule::one("input"),
                ChildRule::one("output"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::many("typedef"),
            ]),
        StmtDescriptor::new("status").argument("value", ArgKind::Status),
        StmtDescriptor::new("submodule")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("anyxml"),
                ChildRule::many("augment"),
                ChildRule::required("belongs-to"),
                ChildRule::many("choice"),
                ChildRule::one("contact"),
                ChildRule::many("container"),
                ChildRule::one("description"),
                ChildRule::many("deviation"),
                ChildRule::many("extension"),
                ChildRule::many("feature"),
                ChildRule::many("grouping"),
                ChildRule::many("identity"),
                ChildRule::many("import"),
                ChildRule::many("include"),
                ChildRule::many("leaf"),
                ChildRule::many("leaf-list"),
                ChildRule::many("list"),
                ChildRule::many("notification"),
                ChildRule::one("organization"),
                ChildRule::one("reference"),
                ChildRule::many("revision"),
                ChildRule::many("rpc"),
                ChildRule::many("typedef"),
                ChildRule::many("uses"),
                ChildRule::one("yang-version"),
            ])
            .on_set_arg(set_arg_module),
        StmtDescriptor::new("type")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::many("bit"),
                ChildRule::many("enum"),
                ChildRule::one("fraction-digits"),
                ChildRule::one("length"),
                ChildRule::one("path"),
                ChildRule::many("pattern"),
                ChildRule::one("range"),
                ChildRule::one("require-instance"),
                ChildRule::many("type"),
            ]),
        StmtDescriptor::new("typedef")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("default"),
                ChildRule::one("description"),
                ChildRule::one("reference"),
                ChildRule::one("status"),
                ChildRule::required("type"),
                ChildRule::one("units"),
            ]),
        StmtDescriptor::new("unique").argument("tag", ArgKind::Boolean),
        StmtDescriptor::new("units").argument("name", ArgKind::Str),
        StmtDescriptor::new("uses")
            .argument("name", ArgKind::Ident)
            .with_children([
                ChildRule::one("augment"),
                ChildRule::one("description"),
                ChildRule::many("if-feature"),
                ChildRule::one("reference"),
                ChildRule::many("refine"),
                ChildRule::one("status"),
                ChildRule::one("when"),
            ]),
        StmtDescriptor::new("value").argument("value", ArgKind::Str),
        StmtDescriptor::new("when").argument("condition", ArgKind::Xpath),
        StmtDescriptor::new("yang-version").argument("value", ArgKind::Str),
        StmtDescriptor::new("yin-element").argument("value", ArgKind::Ident),
    ]
}

/// The compiler's own extension statements.
pub fn extension_statements() -> Vec<StmtDescriptor> {
    vec![
        StmtDescriptor::new("children")
            .argument("names", ArgKind::Str)
            .with_parents([ParentRef::one("extension")]),
        StmtDescriptor::new("parents")
            .argument("names", ArgKind::Str)
            .with_parents([ParentRef::one("extension")]),
        StmtDescriptor::new("help")
            .argument("text", ArgKind::Str)
            .as_element()
            .with_parents([
                ParentRef::one("anyxml"),
                ParentRef::one("augment"),
                ParentRef::one("bit"),
                ParentRef::one("case"),
                ParentRef::one("choice"),
                ParentRef::one("container"),
                ParentRef::one("deviation"),
                ParentRef::one("enum"),
                ParentRef::one("extension"),
                ParentRef::one("feature"),
                ParentRef::one("grouping"),
                ParentRef::one("identity"),
                ParentRef::one("leaf"),
                ParentRef::one("leaf-list"),
                ParentRef::one("length"),
                ParentRef::one("list"),
                ParentRef::one("module"),
                ParentRef::one("must"),
                ParentRef::one("notification"),
                ParentRef::one("pattern"),
                ParentRef::one("range"),
                ParentRef::one("refine"),
                ParentRef::one("revision"),
                ParentRef::one("rpc"),
                ParentRef::one("submodule"),
                ParentRef::one("typedef"),
                ParentRef::one("uses"),
            ])
            .on_set_arg(set_arg_help),
    ]
}
