//! Argument values and value concatenation.
//!
//! The source grammar lets a statement argument be built from several
//! adjacent fragments (`"foo" + "-" + $bar`). When every fragment is a plain
//! literal the engine folds them into one literal up front; as soon as a
//! computed value is involved the result becomes an expression tree that can
//! only be evaluated at runtime.

/// The token kind of a simple literal fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    /// A bare (unquoted) word.
    Bare,
    /// A quoted string.
    Quoted,
    /// A numeric literal.
    Number,
}

/// An argument value: a simple literal, a runtime variable reference, or a
/// runtime concatenation of two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Literal { text: String, kind: LitKind },
    Var(String),
    Concat(Box<ArgValue>, Box<ArgValue>),
}

impl ArgValue {
    /// A bare-word literal.
    pub fn bare(text: impl Into<String>) -> Self {
        Self::Literal {
            text: text.into(),
            kind: LitKind::Bare,
        }
    }

    /// A quoted-string literal.
    pub fn quoted(text: impl Into<String>) -> Self {
        Self::Literal {
            text: text.into(),
            kind: LitKind::Quoted,
        }
    }

    /// A numeric literal.
    pub fn number(text: impl Into<String>) -> Self {
        Self::Literal {
            text: text.into(),
            kind: LitKind::Number,
        }
    }

    /// A runtime variable or expression reference, e.g. `$bar`.
    pub fn var(expr: impl Into<String>) -> Self {
        Self::Var(expr.into())
    }

    /// True for values whose text is known now (simple literal tokens).
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// The literal text, when the value is simple.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Literal { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Render as an XPath-style expression fragment (literals quoted).
    pub fn xpath_form(&self) -> String {
        match self {
            Self::Literal { text, .. } => format!("\"{text}\""),
            Self::Var(expr) => expr.clone(),
            Self::Concat(left, right) => {
                format!("concat({}, {})", left.xpath_form(), right.xpath_form())
            }
        }
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal { text, .. } => f.write_str(text),
            Self::Var(expr) => f.write_str(expr),
            Self::Concat(..) => f.write_str(&self.xpath_form()),
        }
    }
}

/// Pad a literal with a single leading or trailing space.
///
/// Non-literal values pass through unchanged.
fn pad(value: ArgValue, after: bool) -> ArgValue {
    match value {
        ArgValue::Literal { text, .. } => {
            let text = if after {
                format!("{text} ")
            } else {
                format!(" {text}")
            };
            ArgValue::Literal {
                text,
                kind: LitKind::Quoted,
            }
        }
        other => other,
    }
}

/// Concatenate two argument values, consuming both.
///
/// Two simple literals join textually (with a single separating space when
/// `with_space` is set) and stay a simple literal, so chained concatenation
/// stays cheap. Once either side is computed, the result is a
/// runtime-concatenation node; a requested space is folded into whichever
/// side is still a literal, or inserted as an explicit literal operand when
/// neither side is.
pub fn concat(one: ArgValue, two: ArgValue, with_space: bool) -> ArgValue {
    match (one, two) {
        (ArgValue::Literal { text: mut a, .. }, ArgValue::Literal { text: b, .. }) => {
            if with_space {
                a.push(' ');
            }
            a.push_str(&b);
            ArgValue::Literal {
                text: a,
                kind: LitKind::Quoted,
            }
        }
        (one, two) => {
            let (one, two) = if with_space {
                if one.is_simple() {
                    (pad(one, true), two)
                } else if two.is_simple() {
                    (one, pad(two, false))
                } else {
                    // Neither side is known yet: join through an explicit
                    // literal space operand.
                    let spaced = ArgValue::Concat(Box::new(one), Box::new(ArgValue::quoted(" ")));
                    (spaced, two)
                }
            } else {
                (one, two)
            };
            ArgValue::Concat(Box::new(one), Box::new(two))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn simple_join_without_space() {
        let v = concat(ArgValue::quoted("a"), ArgValue::quoted("b"), false);
        assert_eq!(v.as_text(), Some("ab"));
        assert!(v.is_simple());
    }

    #[test]
    fn simple_join_with_space() {
        let v = concat(ArgValue::quoted("a"), ArgValue::bare("b"), true);
        assert_eq!(v.as_text(), Some("a b"));
    }

    #[test]
    fn mixed_join_pads_the_literal_side() {
        let v = concat(ArgValue::var("$x"), ArgValue::quoted("b"), true);
        assert_eq!(
            v,
            ArgValue::Concat(
                Box::new(ArgValue::var("$x")),
                Box::new(ArgValue::quoted(" b")),
            )
        );

        let v = concat(ArgValue::quoted("a"), ArgValue::var("$y"), true);
        assert_eq!(
            v,
            ArgValue::Concat(
                Box::new(ArgValue::quoted("a ")),
                Box::new(ArgValue::var("$y")),
            )
        );
    }

    #[test]
    fn computed_join_inserts_explicit_space() {
        let v = concat(ArgValue::var("$x"), ArgValue::var("$y"), true);
        assert_eq!(
            v,
            ArgValue::Concat(
                Box::new(ArgValue::Concat(
                    Box::new(ArgValue::var("$x")),
                    Box::new(ArgValue::quoted(" ")),
                )),
                Box::new(ArgValue::var("$y")),
            )
        );
    }

    #[test]
    fn computed_join_without_space() {
        let v = concat(ArgValue::var("$x"), ArgValue::quoted("b"), false);
        assert_eq!(
            v,
            ArgValue::Concat(Box::new(ArgValue::var("$x")), Box::new(ArgValue::quoted("b")))
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(ArgValue::quoted("urn:example").to_string(), "urn:example");
        assert_eq!(ArgValue::var("$bar").to_string(), "$bar");
        let v = concat(ArgValue::var("$bar"), ArgValue::quoted("b"), false);
        assert_eq!(v.to_string(), "concat($bar, \"b\")");
    }

    proptest! {
        #[test]
        fn literal_join_law(a in "[a-z0-9:/_-]{0,16}", b in "[a-z0-9:/_-]{0,16}") {
            let joined = concat(ArgValue::quoted(a.clone()), ArgValue::quoted(b.clone()), false);
            let expected_joined = format!("{a}{b}");
            prop_assert_eq!(joined.as_text(), Some(expected_joined.as_str()));

            let spaced = concat(ArgValue::quoted(a.clone()), ArgValue::quoted(b.clone()), true);
            let expected_spaced = format!("{a} {b}");
            prop_assert_eq!(spaced.as_text(), Some(expected_spaced.as_str()));
            prop_assert!(spaced.is_simple());
        }
    }
}
