//! Semantic validation for Lexa programs: declaration-before-use, scoping,
//! type compatibility and the return rule for `main`.
//!
//! The checker runs over the tree recovered by `lexa-parser`, so it sees the
//! same block structure the syntax validator accepted, even for input with
//! syntax errors.
pub mod checker;
pub mod scope;
pub mod types;

pub use checker::Checker;
pub use scope::{Scope, ScopeArena, ScopeId, Symbol};
pub use types::ValueType;

use log::debug;

use lexa_syntax::ast::Program;
use lexa_syntax::diagnostic::Diagnostic;
use lexa_syntax::token::Token;

/// Outcome of semantic validation. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticReport {
    pub valid: bool,
    pub errors: Vec<Diagnostic>,
}

impl SemanticReport {
    pub fn from_diagnostics(errors: Vec<Diagnostic>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn check(program: &Program) -> SemanticReport {
    let errors = Checker::new().check_program(program);
    debug!("semantic check finished with {} diagnostic(s)", errors.len());
    SemanticReport::from_diagnostics(errors)
}

/// Parse `tokens` (ignoring syntax diagnostics) and check the recovered tree.
pub fn validate_semantics(tokens: &[Token]) -> SemanticReport {
    let (program, _) = lexa_parser::parse(tokens);
    check(&program)
}
