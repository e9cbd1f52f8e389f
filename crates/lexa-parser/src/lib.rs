//! Lexa syntax validation.
//!
//! Two passes run over the token sequence: a delimiter balance check and a
//! recursive-descent grammar check that also builds the recovered
//! [`Program`](lexa_syntax::ast::Program) used by semantic analysis.
pub mod delimiters;
pub mod parser;

pub use delimiters::check_delimiters;
pub use parser::{Parser, DEFAULT_MAX_DEPTH};

use lexa_syntax::ast::Program;
use lexa_syntax::diagnostic::Diagnostic;
use lexa_syntax::token::Token;

/// Outcome of syntax validation. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxReport {
    pub valid: bool,
    pub errors: Vec<Diagnostic>,
}

impl SyntaxReport {
    pub fn from_diagnostics(errors: Vec<Diagnostic>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Parse with the default nesting limit.
pub fn parse(tokens: &[Token]) -> (Program, Vec<Diagnostic>) {
    Parser::new(tokens).parse_program()
}

pub fn validate_syntax(tokens: &[Token]) -> SyntaxReport {
    let (_, errors) = parse(tokens);
    SyntaxReport::from_diagnostics(errors)
}
