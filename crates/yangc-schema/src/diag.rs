//! Diagnostics for the statement validator.
//!
//! Structural problems in the input are not fatal: they accumulate on the
//! session so one pass reports as many problems as possible, and the caller
//! rejects the whole output tree at the end if any were recorded. Only
//! contract violations (stack overflow, unbalanced close) abort a parse.

use serde::Serialize;
use thiserror::Error;

/// The kind of a non-fatal validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// The opened name resolved to no registered statement.
    UnknownStatement,
    /// The parent statement's grammar does not allow this child.
    IllegalChild,
    /// A single-occurrence child appeared more than once under one parent.
    DuplicateChild,
    /// A statement that declares an argument was closed without one.
    MissingArgument,
    /// An argument was supplied to a statement that declares none.
    ArgumentNotAccepted,
    /// The event stream ended with statements still open.
    UnclosedStatement,
}

/// One recorded validation problem, with caller-supplied source context.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub kind: IssueKind,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: {}", file, line, self.message),
            (Some(file), None) => write!(f, "{}: {}", file, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Contract violations that abort the parse immediately.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FatalError {
    /// More statements were opened than the fixed stack bound allows.
    #[error("statement nesting exceeds {max} levels")]
    StackDepthExceeded { max: usize },
    /// A close event arrived with no statement open.
    #[error("close event without a matching open")]
    CloseWithoutOpen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_context() {
        let diag = Diagnostic {
            kind: IssueKind::IllegalChild,
            message: "statement 'leaf' cannot contain statement 'container'".to_string(),
            file: Some("example.yang".to_string()),
            line: Some(12),
        };
        assert_eq!(
            diag.to_string(),
            "example.yang:12: statement 'leaf' cannot contain statement 'container'"
        );
    }

    #[test]
    fn display_without_context() {
        let diag = Diagnostic {
            kind: IssueKind::UnknownStatement,
            message: "unknown statement: bogus".to_string(),
            file: None,
            line: None,
        };
        assert_eq!(diag.to_string(), "unknown statement: bogus");
    }

    #[test]
    fn serializes_kind_as_kebab_case() {
        let json = serde_json::to_string(&IssueKind::DuplicateChild).unwrap();
        assert_eq!(json, "\"duplicate-child\"");
    }
}
