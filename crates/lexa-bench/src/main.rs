use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use log::{debug, info, warn};
use serde::Serialize;

use lexa_lexer::tokenize;
use lexa_parser::Parser as LexaParser;
use lexa_syntax::error::{error, Error, Result};

#[derive(Parser, Debug)]
#[command(name = "lexa-bench", about = "Time the Lexa analyzer stages over sample scripts")]
struct Cli {
    /// Specific script(s) to run (by name, e.g. loops). If omitted, runs all discovered scripts.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Iterations per script (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Output JSON file path; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Also run the scripts under samples/
    #[arg(long = "include-samples", default_value_t = false)]
    include_samples: bool,

    /// List discovered scripts and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    tokens: usize,
    diagnostics: usize,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_lex_ms: f64,
    avg_syntax_ms: f64,
    avg_semantic_ms: f64,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    lexa_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

/// Per-iteration stage timings in milliseconds.
#[derive(Debug, Default)]
struct Samples {
    totals: Vec<f64>,
    lexes: Vec<f64>,
    syntax: Vec<f64>,
    semantic: Vec<f64>,
    tokens: usize,
    diagnostics: usize,
}

fn workspace_root() -> PathBuf {
    // crates/lexa-bench -> crates -> root
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir.ancestors().nth(2).map(Path::to_path_buf);
    root.unwrap_or(manifest_dir)
}

fn discover_scripts(root: &Path, include_samples: bool) -> Vec<ScriptCase> {
    let mut out = Vec::new();

    let mut candidates = vec![root.join("benchmark/scripts")];
    if include_samples {
        candidates.push(root.join("samples"));
    }

    for dir in candidates {
        if !dir.exists() {
            debug!("skipping missing directory {}", dir.display());
            continue;
        }
        if let Ok(entries) = fs::read_dir(&dir) {
            for e in entries.flatten() {
                let p = e.path();
                if p.extension().and_then(|s| s.to_str()) == Some("lx") {
                    let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
                    out.push(ScriptCase { name, path: p });
                }
            }
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::new(format!("Failed to read {}: {}", path.display(), e)))
}

fn measure_script(src: &str, iterations: u32, warmup: u32) -> Samples {
    for _ in 0..warmup {
        let tokens = tokenize(src);
        let (program, _) = LexaParser::new(&tokens).parse_program();
        lexa_semantic::check(&program);
    }

    let mut samples = Samples::default();
    for _ in 0..iterations {
        let t0 = Instant::now();
        let mut t = Instant::now();

        let tokens = tokenize(src);
        let t_lex = t.elapsed();

        t = Instant::now();
        let (program, syntax) = LexaParser::new(&tokens).parse_program();
        let t_syntax = t.elapsed();

        t = Instant::now();
        let semantic = lexa_semantic::check(&program);
        let t_semantic = t.elapsed();

        let total = t0.elapsed();

        samples.tokens = tokens.len();
        samples.diagnostics = syntax.len() + semantic.errors.len();
        samples.lexes.push(dur_ms(t_lex));
        samples.syntax.push(dur_ms(t_syntax));
        samples.semantic.push(dur_ms(t_semantic));
        samples.totals.push(dur_ms(total));
    }
    samples
}

fn dur_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    if vals.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = vals.iter().sum::<f64>() / (vals.len() as f64);
    (avg, min, max)
}

fn ensure_dir(p: &Path) -> Result<()> {
    fs::create_dir_all(p).map_err(|e| Error::new(format!("Failed to create {}: {}", p.display(), e)))
}

fn write_report(out_path: &Path, doc: &OutputDoc) -> Result<()> {
    let json = serde_json::to_string_pretty(doc).map_err(|e| Error::new(format!("Failed to serialize results: {}", e)))?;
    if let Some(parent) = out_path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(out_path, json).map_err(|e| Error::new(format!("Failed to write {}: {}", out_path.display(), e)))
}

fn run(cli: Cli) -> Result<()> {
    let root = workspace_root();
    let mut scripts = discover_scripts(&root, cli.include_samples);

    if cli.list {
        println!("Discovered scripts:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return Ok(());
    }

    if !cli.tests.is_empty() {
        let wanted: std::collections::HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            return error("No matching scripts. Use --list to see available.");
        }
    }

    if scripts.is_empty() {
        return error("No .lx scripts found in benchmark/scripts or samples.");
    }

    let mut results = Vec::new();
    for case in &scripts {
        let src = read_script(&case.path)?;
        info!("measuring {} ({} bytes)", case.name, src.len());
        let samples = measure_script(&src, cli.iterations, cli.warmup);
        if samples.diagnostics > 0 {
            warn!("{} produces {} diagnostic(s)", case.name, samples.diagnostics);
        }
        let (avg_t, min_t, max_t) = stats(&samples.totals);
        let (avg_l, _, _) = stats(&samples.lexes);
        let (avg_s, _, _) = stats(&samples.syntax);
        let (avg_m, _, _) = stats(&samples.semantic);

        println!(
            "{:>14}: total avg={:.3}ms min={:.3}ms max={:.3}ms | lex={:.3}ms syntax={:.3}ms semantic={:.3}ms | tokens={}",
            case.name, avg_t, min_t, max_t, avg_l, avg_s, avg_m, samples.tokens
        );

        results.push(BenchResult {
            name: case.name.clone(),
            iterations: cli.iterations,
            tokens: samples.tokens,
            diagnostics: samples.diagnostics,
            avg_total_ms: avg_t,
            min_total_ms: min_t,
            max_total_ms: max_t,
            avg_lex_ms: avg_l,
            avg_syntax_ms: avg_s,
            avg_semantic_ms: avg_m,
        });
    }

    let now = chrono::Utc::now();
    let out_path = match cli.output {
        Some(p) => p,
        None => {
            // filename-safe timestamp
            let ts_file = now.format("%Y-%m-%d_%H-%M-%SZ").to_string();
            root.join("benchmark/results").join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        lexa_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };
    write_report(&out_path, &doc)?;

    println!("\nSaved results to {}", out_path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_samples() {
        assert_eq!(stats(&[]), (0.0, 0.0, 0.0));
        let (avg, min, max) = stats(&[1.0, 2.0, 6.0]);
        assert_eq!((avg, min, max), (3.0, 1.0, 6.0));
    }

    #[test]
    fn discovers_only_lx_scripts() {
        let tmp = tempfile::tempdir().unwrap();
        let scripts = tmp.path().join("benchmark/scripts");
        fs::create_dir_all(&scripts).unwrap();
        fs::create_dir_all(tmp.path().join("samples")).unwrap();
        fs::write(scripts.join("b.lx"), "int main() { return 0; }").unwrap();
        fs::write(scripts.join("a.lx"), "int main() { return 0; }").unwrap();
        fs::write(scripts.join("notes.txt"), "").unwrap();
        fs::write(tmp.path().join("samples/c.lx"), "").unwrap();

        let names: Vec<_> = discover_scripts(tmp.path(), false).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(discover_scripts(tmp.path(), true).len(), 3);
    }

    #[test]
    fn measures_every_iteration() {
        let samples = measure_script("int main() { int x = 1; return x; }", 3, 1);
        assert_eq!(samples.totals.len(), 3);
        assert_eq!(samples.semantic.len(), 3);
        assert_eq!(samples.tokens, 14);
        assert_eq!(samples.diagnostics, 0);
    }

    #[test]
    fn report_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/out.json");
        let doc = OutputDoc {
            timestamp: "2024-01-01T00:00:00Z".into(),
            lexa_version: "0.0.1-dev".into(),
            benchmarks: Vec::new(),
        };
        write_report(&path, &doc).unwrap();
        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["lexa_version"], "0.0.1-dev");
    }
}
