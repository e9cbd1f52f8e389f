//! One-call analysis of Lexa source text.
//!
//! [`Analyzer::analyze`] tokenizes the input, builds the token histogram, runs
//! the syntax validator and then always runs the semantic validator. Each
//! stage is isolated with `catch_unwind`, so a fault inside the engine turns
//! into a diagnostic instead of taking the caller down.
//!
//! ```rust
//! let result = lexa_analyzer::analyze("int main() { return 0; }");
//! assert!(result.syntax_valid && result.semantic_valid);
//! assert_eq!(result.tokens.len(), 9);
//! ```

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use serde::Serialize;

use lexa_parser::{Parser, DEFAULT_MAX_DEPTH};
use lexa_syntax::diagnostic::{Diagnostic, DiagnosticKind};
use lexa_syntax::token::{Token, TokenKind};

/// Tunables for an [`Analyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Maximum nesting of blocks and parenthesized expressions.
    pub max_depth: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Everything one analysis produces. Serializes to the response JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub tokens: Vec<Token>,
    pub token_stats: BTreeMap<TokenKind, usize>,
    pub syntax_valid: bool,
    pub syntax_errors: Vec<String>,
    pub semantic_valid: bool,
    pub semantic_errors: Vec<String>,
    /// Structured form of `syntax_errors`, same order.
    #[serde(skip)]
    pub syntax_diagnostics: Vec<Diagnostic>,
    /// Structured form of `semantic_errors`, same order.
    #[serde(skip)]
    pub semantic_diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    fn new(tokens: Vec<Token>, syntax: Vec<Diagnostic>, semantic: Vec<Diagnostic>) -> Self {
        let token_stats = token_stats(&tokens);
        Self {
            tokens,
            token_stats,
            syntax_valid: syntax.is_empty(),
            syntax_errors: render(&syntax),
            semantic_valid: semantic.is_empty(),
            semantic_errors: render(&semantic),
            syntax_diagnostics: syntax,
            semantic_diagnostics: semantic,
        }
    }

    /// Result for an engine fault: both stages invalid, one diagnostic each.
    fn fault(tokens: Vec<Token>, fault: DiagnosticKind) -> Self {
        let mut result = Self::new(tokens, Vec::new(), Vec::new());
        let diagnostic = Diagnostic::new(fault, 0, 0);
        result.syntax_valid = false;
        result.semantic_valid = false;
        result.syntax_errors = vec![diagnostic.kind.to_string()];
        result.semantic_errors = vec![diagnostic.kind.to_string()];
        result.syntax_diagnostics = vec![diagnostic.clone()];
        result.semantic_diagnostics = vec![diagnostic];
        result
    }

    pub fn is_valid(&self) -> bool {
        self.syntax_valid && self.semantic_valid
    }

    /// Syntax diagnostics followed by semantic ones.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.syntax_diagnostics
            .iter()
            .chain(self.semantic_diagnostics.iter())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn render(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.to_string()).collect()
}

/// Number of tokens of each kind; kinds that do not occur are absent.
pub fn token_stats(tokens: &[Token]) -> BTreeMap<TokenKind, usize> {
    let mut stats = BTreeMap::new();
    for tok in tokens {
        *stats.entry(tok.kind).or_insert(0) += 1;
    }
    stats
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> AnalyzerConfig {
        self.config
    }

    pub fn analyze(&self, source: &str) -> AnalysisResult {
        let tokens = match run_stage("lexer", || lexa_lexer::tokenize(source)) {
            Ok(tokens) => tokens,
            Err(fault) => return AnalysisResult::fault(Vec::new(), fault),
        };

        let max_depth = self.config.max_depth;
        let parsed = run_stage("syntax validator", || {
            Parser::new(&tokens).with_max_depth(max_depth).parse_program()
        });
        let (program, syntax) = match parsed {
            Ok(parsed) => parsed,
            Err(fault) => return AnalysisResult::fault(tokens, fault),
        };

        let semantic = match run_stage("semantic validator", || lexa_semantic::check(&program)) {
            Ok(report) => report.errors,
            Err(fault) => return AnalysisResult::fault(tokens, fault),
        };

        debug!(
            "analyzed {} token(s): {} syntax, {} semantic diagnostic(s)",
            tokens.len(),
            syntax.len(),
            semantic.len()
        );
        AnalysisResult::new(tokens, syntax, semantic)
    }
}

/// Analyze with the default configuration.
pub fn analyze(source: &str) -> AnalysisResult {
    Analyzer::new().analyze(source)
}

fn run_stage<T>(stage: &str, f: impl FnOnce() -> T) -> Result<T, DiagnosticKind> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        warn!("{} panicked: {}", stage, message);
        DiagnosticKind::InternalFault {
            stage: stage.to_string(),
            message,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_minimal_program() {
        let result = analyze("int main() { return 0; }");
        assert!(result.is_valid());
        assert_eq!(result.tokens.len(), 9);
        assert!(result.syntax_errors.is_empty());
        assert!(result.semantic_errors.is_empty());
        assert_eq!(result.token_stats[&TokenKind::TypeInt], 1);
        assert_eq!(result.token_stats[&TokenKind::ReservedWord], 2);
        assert_eq!(result.token_stats[&TokenKind::IntLiteral], 1);
    }

    #[test]
    fn test_type_mismatch_only_fails_semantics() {
        let result = analyze(r#"int main() { int x; x = "a"; return 0; }"#);
        assert!(result.syntax_valid);
        assert!(!result.semantic_valid);
        assert_eq!(result.semantic_errors.len(), 1);
        let msg = &result.semantic_errors[0];
        assert!(msg.contains("'x'") && msg.contains("'int'") && msg.contains("'string'"), "{}", msg);
    }

    #[test]
    fn test_undeclared_variable() {
        let result = analyze("int main() { y = 5; return 0; }");
        assert!(result.syntax_valid);
        assert_eq!(
            result.semantic_errors,
            vec!["undeclared variable 'y' at line 1, column 14".to_string()]
        );
    }

    #[test]
    fn test_unclosed_block_still_runs_semantics() {
        let result = analyze("int main() { if (1 > 0) { int z = 1; } ");
        assert!(!result.syntax_valid);
        assert_eq!(result.syntax_errors, vec!["unclosed delimiter '{' at line 1, column 12".to_string()]);
        assert!(result.syntax_diagnostics[0].kind.is_delimiter());
        // no top-level return in the recovered body
        assert_eq!(result.semantic_diagnostics[0].kind, DiagnosticKind::MissingReturn);
    }

    #[test]
    fn test_missing_return() {
        let result = analyze("int main() { int a = 1; }");
        assert!(result.syntax_valid);
        assert!(!result.semantic_valid);
        assert!(result.semantic_errors[0].contains("'return'"));
    }

    #[test]
    fn test_token_stats_match_tokens() {
        let result = analyze("int main() { float f = .5 + 2; f++; @ return 0; }");
        let total: usize = result.token_stats.values().sum();
        assert_eq!(total, result.tokens.len());
        for (kind, count) in &result.token_stats {
            assert_eq!(*count, result.tokens.iter().filter(|t| t.kind == *kind).count());
        }
        assert!(!result.token_stats.contains_key(&TokenKind::StringLiteral));
    }

    #[test]
    fn test_json_shape() {
        let result = analyze("int main() { return 0; }");
        let value: Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(
            value["tokens"][0],
            json!({"type": "TYPE_INT", "value": "int", "line": 1, "column": 1})
        );
        assert_eq!(value["tokenStats"]["RESERVED_WORD"], json!(2));
        assert_eq!(value["syntaxValid"], json!(true));
        assert_eq!(value["semanticErrors"], json!([]));
        assert!(value.get("syntaxDiagnostics").is_none());
        assert!(result.to_json_pretty().unwrap().contains("\n  \"tokens\""));
    }

    #[test]
    fn test_config_limits_nesting() {
        let analyzer = Analyzer::with_config(AnalyzerConfig { max_depth: 3 });
        assert_eq!(analyzer.config().max_depth, 3);
        assert_eq!(Analyzer::new().config().max_depth, DEFAULT_MAX_DEPTH);
        let result = analyzer.analyze("int main() { { { { } } } return 0; }");
        assert!(!result.syntax_valid);
        assert_eq!(
            result.syntax_diagnostics[0].kind,
            DiagnosticKind::NestingTooDeep { limit: 3 }
        );
        assert!(analyze("int main() { { { { } } } return 0; }").is_valid());
    }

    #[test]
    fn test_deep_input_does_not_crash() {
        let src = format!("int main() {{ {}{} return 0; }}", "{".repeat(5000), "}".repeat(5000));
        let result = analyze(&src);
        assert!(!result.syntax_valid);
        assert_eq!(result.syntax_errors.len(), 1);
    }

    #[test]
    fn test_long_else_if_chain_is_valid() {
        let chain = "else if (a) { } ".repeat(20_000);
        let src = format!("int main() {{ int a = 1; if (a) {{ }} {}return 0; }}", chain);
        let result = analyze(&src);
        assert!(result.is_valid(), "{:?}", result.syntax_errors);
    }

    #[test]
    fn test_long_flat_expression_is_valid() {
        let src = format!("int main() {{ int x = {}; return x; }}", vec!["1"; 200_000].join(" + "));
        let result = analyze(&src);
        assert!(result.is_valid(), "{:?}", result.semantic_errors);
        assert_eq!(result.token_stats[&TokenKind::Plus], 199_999);
    }

    #[test]
    fn test_stage_fault_becomes_diagnostic() {
        let fault = run_stage("syntax validator", || -> usize { panic!("boom") }).unwrap_err();
        assert_eq!(
            fault,
            DiagnosticKind::InternalFault {
                stage: "syntax validator".into(),
                message: "boom".into(),
            }
        );

        let tokens = lexa_lexer::tokenize("int main()");
        let result = AnalysisResult::fault(tokens, fault);
        assert!(!result.syntax_valid && !result.semantic_valid);
        assert_eq!(result.tokens.len(), 4);
        assert_eq!(result.syntax_errors, vec!["internal error in the syntax validator: boom".to_string()]);
        assert_eq!(result.semantic_errors.len(), 1);
    }

    #[test]
    fn test_results_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalysisResult>();
        assert_send_sync::<Analyzer>();
    }
}
