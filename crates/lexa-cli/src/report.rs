use owo_colors::OwoColorize;

use lexa_analyzer::AnalysisResult;
use lexa_syntax::diagnostic::{Diagnostic, Stage};
use lexa_syntax::error::{Error, Result};

use crate::common::provide_hint;
use crate::{Format, Options};

/// Print `result` in the requested format. Diagnostics go to stderr, the rest
/// to stdout.
pub fn emit(name: &str, source: &str, result: &AnalysisResult, options: Options) -> Result<()> {
    match options.format {
        Format::Json => {
            let json = result
                .to_json()
                .map_err(|e| Error::new(format!("Failed to serialize result: {}", e)))?;
            println!("{}", json);
        }
        Format::PrettyJson => {
            let json = result
                .to_json_pretty()
                .map_err(|e| Error::new(format!("Failed to serialize result: {}", e)))?;
            println!("{}", json);
        }
        Format::Text => {
            if options.tokens {
                print_tokens(result);
            }
            for d in result.diagnostics() {
                render_diagnostic(name, source, d);
            }
            print_summary(name, result);
        }
    }
    Ok(())
}

pub fn render_diagnostic(name: &str, source: &str, d: &Diagnostic) {
    let stage = match d.kind.stage() {
        Stage::Syntax => "syntax",
        Stage::Semantic => "semantic",
    };
    eprintln!(
        "{}: {}",
        format!("error[{}]", stage).red().bold(),
        d.kind.to_string().bold()
    );
    if d.line > 0 {
        eprintln!("  --> {}:{}:{}", name, d.line, d.col);
        if let Some(src_line) = source.lines().nth(d.line - 1) {
            let line_num_str = format!("{:3} | ", d.line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = String::new();
            marker.push_str(&" ".repeat(line_num_str.len()));
            if d.col > 1 {
                marker.push_str(&" ".repeat(d.col - 1));
            }
            marker.push('^');
            eprintln!("{}", marker.red());
        }
    }
    provide_hint(&d.kind);
}

fn print_summary(name: &str, result: &AnalysisResult) {
    println!("{}: {} token(s)", name.bold(), result.tokens.len());
    println!("{}", status_line("syntax", result.syntax_errors.len()));
    println!("{}", status_line("semantic", result.semantic_errors.len()));
}

fn status_line(stage: &str, errors: usize) -> String {
    if errors == 0 {
        format!("  {}: valid", stage).green().to_string()
    } else {
        format!("  {}: {} error(s)", stage, errors).red().to_string()
    }
}

pub fn print_tokens(result: &AnalysisResult) {
    println!("{}", "Tokens:".bold());
    for tok in &result.tokens {
        let pos = format!("{}:{}", tok.line, tok.col);
        println!(
            "  {:>8}  {:<16} {}",
            pos.bright_black(),
            tok.kind.name().cyan(),
            tok.lexeme
        );
    }
    println!("{}", "Token stats:".bold());
    for (kind, count) in &result.token_stats {
        println!("  {:<16} {}", kind.name(), count);
    }
}
