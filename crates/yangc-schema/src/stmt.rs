//! Statement descriptors: the data model behind the grammar.
//!
//! Every statement kind the language accepts is described by one
//! [`StmtDescriptor`]: its name, owning namespace, argument shape, legal
//! children (with cardinality), and optional lifecycle hooks. The built-in
//! table lives in [`crate::builtin`]; extensions register more descriptors at
//! startup through [`crate::registry::Registry::register`].

use crate::session::Session;

/// Upper bound on registered statement kinds.
///
/// Statement ids index a fixed-size per-frame bitset, so the bound is part
/// of the engine contract, not a tunable.
pub const MAX_STATEMENTS: usize = 256;

/// Stable identifier of a registered statement, assigned sequentially at
/// registration time and used as a bit index in per-frame seen-sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(u16);

impl StmtId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index < MAX_STATEMENTS);
        Self(index as u16)
    }

    /// The id as a table/bitset index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The value shape a statement's argument takes.
///
/// Reported back to the tokenizer on `open` so it can switch lexing modes
/// (string-ish arguments are read verbatim; XPath arguments are not).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// The statement takes no argument.
    None,
    Str,
    Ident,
    Boolean,
    Number,
    Xpath,
    Range,
    Target,
    Status,
    Ordered,
    Deviate,
}

impl ArgKind {
    /// True when the tokenizer should read the upcoming argument as a plain
    /// string rather than an expression.
    pub fn expects_string(self) -> bool {
        matches!(self, Self::Str | Self::Ident)
    }
}

/// One legal-child rule of a statement: which child may appear, and how
/// often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRule {
    pub name: String,
    pub namespace: Option<String>,
    pub mandatory: bool,
    pub repeatable: bool,
}

impl ChildRule {
    fn build(name: &str, mandatory: bool, repeatable: bool) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            mandatory,
            repeatable,
        }
    }

    /// An optional, single-occurrence child (0..1).
    pub fn one(name: &str) -> Self {
        Self::build(name, false, false)
    }

    /// An optional, repeatable child (0..n).
    pub fn many(name: &str) -> Self {
        Self::build(name, false, true)
    }

    /// A mandatory, single-occurrence child (1).
    pub fn required(name: &str) -> Self {
        Self::build(name, true, false)
    }

    /// A mandatory, repeatable child (1..n).
    pub fn required_many(name: &str) -> Self {
        Self::build(name, true, true)
    }

    /// Qualify the rule with the child's namespace.
    pub fn in_namespace(mut self, uri: &str) -> Self {
        self.namespace = Some(uri.to_string());
        self
    }
}

/// A statement this descriptor may appear under.
///
/// At registration time each entry is resolved and a matching [`ChildRule`]
/// for this statement is appended to the named parent — the splice mechanism
/// extension statements use to graft themselves onto the base grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub name: String,
    pub namespace: Option<String>,
    pub mandatory: bool,
    pub repeatable: bool,
}

impl ParentRef {
    /// Appear at most once under `name`.
    pub fn one(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            mandatory: false,
            repeatable: false,
        }
    }

    /// Appear any number of times under `name`.
    pub fn many(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
            mandatory: false,
            repeatable: true,
        }
    }

    /// Qualify the reference with the parent's namespace.
    pub fn in_namespace(mut self, uri: &str) -> Self {
        self.namespace = Some(uri.to_string());
        self
    }
}

/// Lifecycle hook invoked when a statement opens, closes, or receives its
/// argument. Hooks run with the statement's frame current.
pub type StmtHook = fn(&mut Session<'_>, &StmtDescriptor);

/// Description of one statement kind.
///
/// Built with the fluent constructors and frozen once registered; the only
/// post-registration mutation is the registry splicing extension child rules
/// into `children`, which happens before any parsing starts.
#[derive(Clone)]
pub struct StmtDescriptor {
    pub(crate) id: StmtId,
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) argument: Option<String>,
    pub(crate) arg_kind: ArgKind,
    pub(crate) arg_as_element: bool,
    pub(crate) children: Vec<ChildRule>,
    pub(crate) parents: Vec<ParentRef>,
    pub(crate) on_open: Option<StmtHook>,
    pub(crate) on_close: Option<StmtHook>,
    pub(crate) on_set_arg: Option<StmtHook>,
}

impl StmtDescriptor {
    /// Start a descriptor for a statement that takes no argument.
    pub fn new(name: &str) -> Self {
        Self {
            id: StmtId(0),
            name: name.to_string(),
            namespace: None,
            argument: None,
            arg_kind: ArgKind::None,
            arg_as_element: false,
            children: Vec::new(),
            parents: Vec::new(),
            on_open: None,
            on_close: None,
            on_set_arg: None,
        }
    }

    /// Declare the argument name and value shape.
    pub fn argument(mut self, name: &str, kind: ArgKind) -> Self {
        self.argument = Some(name.to_string());
        self.arg_kind = kind;
        self
    }

    /// Encode the argument as a child element holding text, rather than as a
    /// property on the statement node.
    pub fn as_element(mut self) -> Self {
        self.arg_as_element = true;
        self
    }

    /// Declare the legal children of this statement.
    pub fn with_children(mut self, rules: impl IntoIterator<Item = ChildRule>) -> Self {
        self.children = rules.into_iter().collect();
        self
    }

    /// Declare the statements this one may appear under (extension splice).
    pub fn with_parents(mut self, parents: impl IntoIterator<Item = ParentRef>) -> Self {
        self.parents = parents.into_iter().collect();
        self
    }

    /// Hook to run when the statement opens.
    pub fn on_open(mut self, hook: StmtHook) -> Self {
        self.on_open = Some(hook);
        self
    }

    /// Hook to run when the statement closes.
    pub fn on_close(mut self, hook: StmtHook) -> Self {
        self.on_close = Some(hook);
        self
    }

    /// Hook to run when the statement's argument is set.
    pub fn on_set_arg(mut self, hook: StmtHook) -> Self {
        self.on_set_arg = Some(hook);
        self
    }

    /// The id assigned at registration. Meaningless before registration.
    pub fn id(&self) -> StmtId {
        self.id
    }

    /// The statement's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The statement's namespace URI; `None` means the core namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The argument's property/element name, if the statement takes one.
    pub fn argument_name(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// The argument's value shape.
    pub fn arg_kind(&self) -> ArgKind {
        self.arg_kind
    }

    /// True when the argument is encoded as a child element with text.
    pub fn argument_as_element(&self) -> bool {
        self.arg_as_element
    }

    /// The statement's legal children, including spliced extension rules.
    pub fn children(&self) -> &[ChildRule] {
        &self.children
    }

    /// The declared legal parents (extension splice requests).
    pub fn parents(&self) -> &[ParentRef] {
        &self.parents
    }
}

impl std::fmt::Debug for StmtDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StmtDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("argument", &self.argument)
            .field("arg_kind", &self.arg_kind)
            .field("arg_as_element", &self.arg_as_element)
            .field("children", &self.children.len())
            .field("parents", &self.parents.len())
            .finish()
    }
}
