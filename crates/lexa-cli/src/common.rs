use owo_colors::OwoColorize;

use lexa_syntax::diagnostic::DiagnosticKind;

/// Help text for a diagnostic, plus an optional example line.
pub fn hint(kind: &DiagnosticKind) -> Option<(String, Option<String>)> {
    let hint = match kind {
        DiagnosticKind::UnrecognizedToken { lexeme } => {
            if lexeme.starts_with('"') || lexeme.starts_with('\'') {
                ("Literal is missing its closing quote.".to_string(), None)
            } else if lexeme.starts_with("/*") {
                ("Block comment is never closed with '*/'.".to_string(), None)
            } else if lexeme == "&" || lexeme == "|" {
                (
                    "Logical operators are written twice.".to_string(),
                    Some("Use '&&' and '||'".to_string()),
                )
            } else {
                ("This character is not part of the language.".to_string(), None)
            }
        }
        DiagnosticKind::UnclosedDelimiter { open } => (
            format!("Every '{}' needs a matching closer.", open),
            Some("Check the end of the enclosing block".to_string()),
        ),
        DiagnosticKind::UnmatchedDelimiter { .. } => {
            ("There is no opener left for this closer; remove it or add the opener.".to_string(), None)
        }
        DiagnosticKind::MismatchedDelimiter { open_line, .. } => (
            format!("Delimiters close in the reverse order they open; see the opener on line {}.", open_line),
            None,
        ),
        DiagnosticKind::MissingMain | DiagnosticKind::DuplicateMain { .. } => (
            "A program is exactly one 'main' function.".to_string(),
            Some("Example: int main() { return 0; }".to_string()),
        ),
        DiagnosticKind::MainReturnType { .. } => ("'main' is declared as 'int main()'.".to_string(), None),
        DiagnosticKind::TrailingTokens { .. } => {
            ("Nothing may follow the closing brace of 'main'.".to_string(), None)
        }
        DiagnosticKind::Expected { expected, .. } if expected.contains("';'") => {
            ("Statements end with a semicolon.".to_string(), None)
        }
        DiagnosticKind::Expected { expected, found } if expected.contains("'='") && found == "==" => (
            "Use '=' to assign and '==' to compare.".to_string(),
            None,
        ),
        DiagnosticKind::Expected { .. } | DiagnosticKind::UnexpectedEof { .. } => {
            ("Missing required syntax element.".to_string(), None)
        }
        DiagnosticKind::InvalidStatement { .. } => (
            "A statement is a declaration, an assignment, a control statement or a block.".to_string(),
            Some("Bare expressions like '5 + 3;' are not statements".to_string()),
        ),
        DiagnosticKind::LoopControlOutsideLoop { keyword } => (
            format!("'{}' can only be used inside while, do-while or for loops.", keyword),
            None,
        ),
        DiagnosticKind::NestingTooDeep { .. } => (
            "Flatten the code or raise the limit with --max-depth.".to_string(),
            None,
        ),
        DiagnosticKind::UndeclaredVariable { name } => (
            "Did you forget to declare this variable?".to_string(),
            Some(format!("Example: int {} = 0;", name)),
        ),
        DiagnosticKind::Redeclaration { first_line, .. } => (
            format!("Rename one of them or drop the type to assign to the one from line {}.", first_line),
            None,
        ),
        DiagnosticKind::TypeMismatch { expected, .. } => (
            "Make sure the value matches the declared type.".to_string(),
            Some(format!("'{}' accepts: {}", expected, accepted_types(expected))),
        ),
        DiagnosticKind::BinaryOperandMismatch { op, .. } if op == "+" => (
            "'+' adds numbers or joins two strings; it does not mix them.".to_string(),
            None,
        ),
        DiagnosticKind::BinaryOperandMismatch { op, .. } => (
            format!("Check the operand types on both sides of '{}'.", op),
            None,
        ),
        DiagnosticKind::UnaryOperandMismatch { op, .. } if op == "!" => {
            ("'!' negates a bool or a number.".to_string(), None)
        }
        DiagnosticKind::UnaryOperandMismatch { op, .. } => {
            (format!("'{}' only applies to int, float and double.", op), None)
        }
        DiagnosticKind::ReturnTypeMismatch { .. } => ("'main' returns an int.".to_string(), None),
        DiagnosticKind::VoidVariable { .. } => ("'void' is only a return type.".to_string(), None),
        DiagnosticKind::MissingReturn => (
            "Add a 'return' at the end of 'main'.".to_string(),
            Some("Example: return 0;".to_string()),
        ),
        DiagnosticKind::InternalFault { .. } => return None,
    };
    Some(hint)
}

fn accepted_types(target: &str) -> &'static str {
    match target {
        "float" | "double" => "int, float, double",
        "bool" => "bool, int",
        "int" => "int",
        "string" => "string",
        "char" => "char",
        _ => "nothing",
    }
}

pub fn provide_hint(kind: &DiagnosticKind) {
    if let Some((help, example)) = hint(kind) {
        eprintln!("{}", format!("💡 Help: {}", help).yellow());
        if let Some(example) = example {
            eprintln!("    {}", example.bright_black());
        }
    }
}
