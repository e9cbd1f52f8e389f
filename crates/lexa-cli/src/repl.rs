use std::io::{self, Write};

use owo_colors::OwoColorize;

use lexa_analyzer::Analyzer;
use lexa_lexer::tokenize;
use lexa_syntax::token::TokenKind;

use crate::report;
use crate::{Format, Options};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Help,
    Quit,
    Tokens,
    Json,
    Reset,
    Unknown,
}

fn parse_command(input: &str) -> Command {
    match input {
        ":help" | ":h" => Command::Help,
        ":quit" | ":q" | ":exit" => Command::Quit,
        ":tokens" => Command::Tokens,
        ":json" => Command::Json,
        ":reset" => Command::Reset,
        _ => Command::Unknown,
    }
}

fn print_help() {
    println!(
        "{}\n  {}  {}\n  {}  {}",
        "Commands:".bold(),
        ":help".yellow(),
        "Show this help",
        ":quit".yellow(),
        "Exit the REPL"
    );
    println!(
        "  {}  {}\n  {}  {}\n  {}  {}",
        ":tokens".yellow(),
        "Toggle the token listing",
        ":json".yellow(),
        "Toggle JSON output",
        ":reset".yellow(),
        "Drop the pending input"
    );
    println!("Type a program; it is analyzed once its braces and parentheses balance.");
}

pub fn start_repl(analyzer: &Analyzer, mut options: Options) {
    println!("{}", "Lexa REPL. Type :help for help, :quit to exit.".bold().green());

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() {
            "lexa> ".cyan().to_string()
        } else {
            "... > ".cyan().to_string()
        };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(_) => {
                println!("<input error>");
                break;
            }
        };
        if n == 0 {
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match parse_command(trimmed) {
                Command::Quit => {
                    println!("Goodbye.");
                    break;
                }
                Command::Help => print_help(),
                Command::Tokens => {
                    options.tokens = !options.tokens;
                    println!("{}", format!("Token listing {}.", on_off(options.tokens)).yellow());
                }
                Command::Json => {
                    options.format = match options.format {
                        Format::Text => Format::PrettyJson,
                        _ => Format::Text,
                    };
                    println!(
                        "{}",
                        format!("JSON output {}.", on_off(options.format != Format::Text)).yellow()
                    );
                }
                Command::Reset => {
                    buffer.clear();
                    println!("{}", "Input cleared.".yellow());
                }
                Command::Unknown => println!("{}", "Unknown command. Type :help.".red()),
            }
            continue;
        }
        if buffer.is_empty() && trimmed.is_empty() {
            continue;
        }

        buffer.push_str(&line);
        if !is_complete(&buffer) {
            continue;
        }

        let result = analyzer.analyze(&buffer);
        if let Err(e) = report::emit("<repl>", &buffer, &result, options) {
            eprintln!("{}: {}", "error".red().bold(), e.to_string().red());
        }
        buffer.clear();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Input is complete once every opened brace, parenthesis and bracket is closed.
fn is_complete(input: &str) -> bool {
    let mut depth = 0i32;
    for tok in tokenize(input) {
        match tok.kind {
            TokenKind::BraceOpen | TokenKind::ParenOpen | TokenKind::BracketOpen => depth += 1,
            TokenKind::BraceClose | TokenKind::ParenClose | TokenKind::BracketClose => depth -= 1,
            _ => {}
        }
    }
    // a stray closer can never be balanced by more input
    depth <= 0
}
