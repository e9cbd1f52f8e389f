//! Delimiter balance checking.
//!
//! This pass is the only source of delimiter diagnostics. It runs over the raw
//! token sequence with a stack: openers are pushed, closers must match the top.

use lexa_syntax::diagnostic::{Diagnostic, DiagnosticKind};
use lexa_syntax::token::{Token, TokenKind};

fn text(kind: TokenKind) -> String {
    kind.fixed_text().unwrap_or("?").to_string()
}

/// Check that every `{`, `(` and `[` is closed in matching order.
///
/// On a mismatched closer the diagnostic names the expected closer. If the
/// closer matches an opener further down the stack, the openers above it are
/// dropped so one stray token does not cascade into a report per level.
pub fn check_delimiters(tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut stack: Vec<&Token> = Vec::new();

    for tok in tokens {
        if tok.kind.closing_delimiter().is_some() {
            stack.push(tok);
            continue;
        }
        if !tok.kind.is_closing_delimiter() {
            continue;
        }
        let Some(top) = stack.last() else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnmatchedDelimiter {
                    found: tok.lexeme.clone(),
                },
                tok.line,
                tok.col,
            ));
            continue;
        };
        if top.kind.closing_delimiter() == Some(tok.kind) {
            stack.pop();
            continue;
        }
        let expected = top
            .kind
            .closing_delimiter()
            .map(text)
            .unwrap_or_default();
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MismatchedDelimiter {
                expected,
                found: tok.lexeme.clone(),
                open_line: top.line,
            },
            tok.line,
            tok.col,
        ));
        if let Some(idx) = stack
            .iter()
            .rposition(|open| open.kind.closing_delimiter() == Some(tok.kind))
        {
            stack.truncate(idx);
        }
    }

    for open in stack {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnclosedDelimiter {
                open: open.lexeme.clone(),
            },
            open.line,
            open.col,
        ));
    }
    diagnostics
}
