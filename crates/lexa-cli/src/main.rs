mod common;
mod report;
mod repl;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use log::{debug, info, LevelFilter};
use owo_colors::OwoColorize;

use lexa_analyzer::{Analyzer, AnalyzerConfig};
use lexa_syntax::error::{error_at, Error, Result};

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable diagnostics with source excerpts
    Text,
    /// Compact JSON, one document per input
    Json,
    /// Indented JSON
    PrettyJson,
}

#[derive(Parser, Debug)]
#[command(name = "lexa", version, about = "Analyze Lexa source: tokens, syntax and semantics")]
struct Cli {
    /// Source file to analyze. `-` reads standard input; omit it on a terminal to start the REPL.
    file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, env = "LEXA_FORMAT", default_value_t = Format::Text)]
    format: Format,

    /// Print the token table and histogram (text format only)
    #[arg(long = "tokens", default_value_t = false)]
    tokens: bool,

    /// Maximum nesting of blocks and parenthesized expressions
    #[arg(long = "max-depth", default_value_t = AnalyzerConfig::default().max_depth)]
    max_depth: usize,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

/// How results are printed, shared by file mode and the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub format: Format,
    pub tokens: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    let mut builder = env_logger::Builder::from_default_env();
    // RUST_LOG wins unless a flag asked for something explicit
    if quiet || verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::new(format!("File not found: {}", path.display())));
    }
    let bytes = fs::read(path).map_err(|e| Error::new(format!("Failed to read {}: {}", path.display(), e)))?;
    decode(&path.display().to_string(), bytes)
}

fn read_stdin() -> Result<String> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .map_err(|e| Error::new(format!("Failed to read standard input: {}", e)))?;
    decode("<stdin>", buf)
}

/// Decode `bytes` as UTF-8, pointing at the first invalid byte on failure.
fn decode(name: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).or_else(|e| {
        let valid = String::from_utf8_lossy(&e.as_bytes()[..e.utf8_error().valid_up_to()]);
        let line = valid.matches('\n').count() + 1;
        let col = valid.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        error_at(line, col, format!("{} is not valid UTF-8", name))
    })
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("{}: {}", "error".red().bold(), err.to_string().red());
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let analyzer = Analyzer::with_config(AnalyzerConfig {
        max_depth: cli.max_depth,
    });
    let options = Options {
        format: cli.format,
        tokens: cli.tokens,
    };

    let (name, source) = match cli.file.as_deref() {
        None if io::stdin().is_terminal() => {
            repl::start_repl(&analyzer, options);
            return ExitCode::SUCCESS;
        }
        None => ("<stdin>".to_string(), read_stdin()),
        Some(path) if path.as_os_str() == "-" => ("<stdin>".to_string(), read_stdin()),
        Some(path) => (path.display().to_string(), read_file(path)),
    };
    let source = match source {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    info!("analyzing {} ({} bytes)", name, source.len());

    let result = analyzer.analyze(&source);
    if let Err(e) = report::emit(&name, &source, &result, options) {
        return fail(&e);
    }
    debug!("syntax valid: {}, semantic valid: {}", result.syntax_valid, result.semantic_valid);

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
