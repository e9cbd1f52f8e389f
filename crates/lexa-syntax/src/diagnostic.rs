//! Structured diagnostics shared by the syntax and semantic stages.
//!
//! Each diagnostic keeps the offending lexeme or name and any expected-vs-found
//! detail as data. It is only rendered to text at the analyzer boundary, where
//! the wire contract needs plain strings.
//!
//! ```rust
//! use lexa_syntax::{Diagnostic, DiagnosticKind};
//!
//! let d = Diagnostic::new(DiagnosticKind::UndeclaredVariable { name: "y".into() }, 1, 14);
//! assert_eq!(d.to_string(), "undeclared variable 'y' at line 1, column 14");
//! ```

use std::fmt;

use thiserror::Error;

/// Which pipeline stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Syntax,
    Semantic,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    // === Lexical anomalies folded into syntax ===
    #[error("unrecognized token '{lexeme}'")]
    UnrecognizedToken { lexeme: String },

    // === Delimiter balance ===
    #[error("unclosed delimiter '{open}'")]
    UnclosedDelimiter { open: String },

    #[error("unmatched closing delimiter '{found}'")]
    UnmatchedDelimiter { found: String },

    #[error("mismatched delimiter: expected '{expected}' to close line {open_line}, found '{found}'")]
    MismatchedDelimiter {
        expected: String,
        found: String,
        open_line: usize,
    },

    // === Program structure ===
    #[error("missing function 'main'")]
    MissingMain,

    #[error("function 'main' defined more than once (first definition at line {first_line})")]
    DuplicateMain { first_line: usize },

    #[error("'main' must return 'int', found '{found}'")]
    MainReturnType { found: String },

    #[error("unexpected '{found}' after the end of 'main'")]
    TrailingTokens { found: String },

    // === Statements ===
    #[error("expected {expected}, found '{found}'")]
    Expected { expected: String, found: String },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid statement starting with '{found}'")]
    InvalidStatement { found: String },

    #[error("'{keyword}' outside of a loop")]
    LoopControlOutsideLoop { keyword: String },

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    // === Semantics ===
    #[error("undeclared variable '{name}'")]
    UndeclaredVariable { name: String },

    #[error("variable '{name}' is already declared in this scope (first declared at line {first_line})")]
    Redeclaration { name: String, first_line: usize },

    #[error("type mismatch: cannot assign '{found}' to variable '{name}' of type '{expected}'")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("type mismatch: operator '{op}' cannot be applied to '{lhs}' and '{rhs}'")]
    BinaryOperandMismatch { op: String, lhs: String, rhs: String },

    #[error("type mismatch: operator '{op}' cannot be applied to '{operand}'")]
    UnaryOperandMismatch { op: String, operand: String },

    #[error("type mismatch: 'main' returns 'int' but the returned value is '{found}'")]
    ReturnTypeMismatch { found: String },

    #[error("variable '{name}' cannot have type 'void'")]
    VoidVariable { name: String },

    #[error("function 'main' has no top-level 'return' statement")]
    MissingReturn,

    // === Engine ===
    #[error("internal error in the {stage}: {message}")]
    InternalFault { stage: String, message: String },
}

impl DiagnosticKind {
    pub fn stage(&self) -> Stage {
        match self {
            DiagnosticKind::UndeclaredVariable { .. }
            | DiagnosticKind::Redeclaration { .. }
            | DiagnosticKind::TypeMismatch { .. }
            | DiagnosticKind::BinaryOperandMismatch { .. }
            | DiagnosticKind::UnaryOperandMismatch { .. }
            | DiagnosticKind::ReturnTypeMismatch { .. }
            | DiagnosticKind::VoidVariable { .. }
            | DiagnosticKind::MissingReturn => Stage::Semantic,
            _ => Stage::Syntax,
        }
    }

    /// True for diagnostics produced by delimiter balance checking.
    pub fn is_delimiter(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::UnclosedDelimiter { .. }
                | DiagnosticKind::UnmatchedDelimiter { .. }
                | DiagnosticKind::MismatchedDelimiter { .. }
        )
    }
}

/// A diagnostic tied to a source position (1-based line and column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub col: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: usize, col: usize) -> Self {
        Self { kind, line, col }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.kind, self.line, self.col)
    }
}

impl std::error::Error for Diagnostic {}

/// Stable sort by source position.
pub fn sort_by_position(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.line, d.col));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_mismatch_with_all_names() {
        let d = Diagnostic::new(
            DiagnosticKind::TypeMismatch {
                name: "x".into(),
                expected: "int".into(),
                found: "string".into(),
            },
            2,
            5,
        );
        assert_eq!(
            d.to_string(),
            "type mismatch: cannot assign 'string' to variable 'x' of type 'int' at line 2, column 5"
        );
    }

    #[test]
    fn stage_and_delimiter_classes() {
        assert_eq!(DiagnosticKind::MissingReturn.stage(), Stage::Semantic);
        assert_eq!(DiagnosticKind::MissingMain.stage(), Stage::Syntax);
        assert!(DiagnosticKind::UnclosedDelimiter { open: "{".into() }.is_delimiter());
        assert!(!DiagnosticKind::MissingMain.is_delimiter());
    }

    #[test]
    fn sort_is_stable_within_a_position() {
        let mut v = vec![
            Diagnostic::new(DiagnosticKind::MissingReturn, 3, 1),
            Diagnostic::new(DiagnosticKind::MissingMain, 1, 1),
            Diagnostic::new(DiagnosticKind::UnrecognizedToken { lexeme: "@".into() }, 1, 1),
        ];
        sort_by_position(&mut v);
        assert_eq!(v[0].kind, DiagnosticKind::MissingMain);
        assert_eq!(v[2].kind, DiagnosticKind::MissingReturn);
    }
}
