use anyhow::Context;
use clap::Parser;
use faulty_errorsas::LintEngine;
use faulty_errorsas::cli::{Args, CheckArgs, Command, OutputFormat};
use faulty_errorsas::config;
use faulty_errorsas::diagnostics::Diagnostic;
use faulty_errorsas::level::LintLevel;
use faulty_errorsas::lint::{LintRegistry, LintSettings};
use itertools::Itertools;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

fn main() -> ExitCode {
    faulty_errorsas::telemetry::init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Some(Command::ListRules) => {
            list_rules();
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Explain { rule }) => {
            explain_rule(&rule)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Check(check)) => check_command(check),
        None => check_command(args.check),
    }
}

fn list_rules() {
    let registry = LintRegistry::default_rules();
    for d in registry.descriptors().sorted_by_key(|d| d.name) {
        println!("{}\t{}\t{}", d.name, d.category.as_str(), d.description);
    }
}

fn explain_rule(rule: &str) -> anyhow::Result<()> {
    let Some(d) = LintRegistry::default_rules().find_descriptor(rule) else {
        anyhow::bail!("unknown lint: {rule}");
    };

    println!("name: {}", d.name);
    println!("category: {}", d.category.as_str());
    println!("description: {}", d.description);
    println!();
    println!("{}", d.explanation);
    Ok(())
}

fn check_command(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let start_dir = infer_start_dir(&args)?;
    let loaded_cfg = config::load_config(args.config.as_deref(), &start_dir)?;

    let (disabled, settings) = match loaded_cfg.as_ref() {
        Some((_path, cfg)) => (cfg.lints.disabled.clone(), cfg.settings()),
        None => (Vec::new(), LintSettings::default()),
    };

    let registry = LintRegistry::default_rules_filtered(&disabled)?;
    let engine = LintEngine::new_with_settings(registry, settings);

    let (diagnostics, failed) = if args.paths.is_empty() {
        (lint_stdin(&engine)?, 0)
    } else {
        lint_files(&engine, &collect_go_files(&args.paths, args.no_tests)?)
    };

    match args.format {
        OutputFormat::Pretty => print_pretty(&diagnostics),
        OutputFormat::Json => print_json(&diagnostics)?,
        OutputFormat::Github => print_github(&diagnostics),
    }

    if failed > 0 {
        eprintln!("{failed} files could not be analyzed");
        Ok(ExitCode::from(2))
    } else if diagnostics.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Lint every file, reporting the ones that cannot be analyzed on stderr and
/// carrying on with the rest. Returns the diagnostics and the number of failures.
fn lint_files(engine: &LintEngine, files: &[PathBuf]) -> (Vec<Diagnostic>, usize) {
    let mut all = Vec::new();
    let mut failed = 0usize;
    for path in files {
        match engine.lint_file(path) {
            Ok(mut diags) => all.append(&mut diags),
            Err(err) => {
                eprintln!("failed to lint {}: {err}", path.display());
                failed += 1;
            }
        }
    }
    (all, failed)
}

fn lint_stdin(engine: &LintEngine) -> anyhow::Result<Vec<Diagnostic>> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;
    let mut diagnostics = engine.lint_source(&source).context("failed to lint stdin")?;
    for diag in &mut diagnostics {
        diag.file = Some("stdin".to_string());
    }
    Ok(diagnostics)
}

fn file_of(diag: &Diagnostic) -> &str {
    diag.file.as_deref().unwrap_or("<unknown>")
}

fn print_pretty(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        println!(
            "{}:{}:{}: {}: {}: {}",
            file_of(diag),
            diag.span.start.row,
            diag.span.start.column,
            diag.level.as_str(),
            diag.lint.name,
            diag.message
        );
    }

    let files = diagnostics.iter().map(file_of).unique().count();
    if !diagnostics.is_empty() {
        println!("{} diagnostics in {} files", diagnostics.len(), files);
    }
}

fn print_github(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let kind = match diag.level {
            LintLevel::Error => "error",
            _ => "warning",
        };
        println!(
            "::{} file={},line={},col={},title={}::{}",
            kind,
            github_escape(file_of(diag)),
            diag.span.start.row,
            diag.span.start.column,
            diag.lint.name,
            github_escape(&diag.message)
        );
    }
}

#[derive(Debug, Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    row: usize,
    column: usize,
    level: &'static str,
    lint: &'static str,
    message: &'a str,
}

fn print_json(diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
    let out = diagnostics
        .iter()
        .map(|d| JsonDiagnostic {
            file: file_of(d),
            row: d.span.start.row,
            column: d.span.start.column,
            level: d.level.as_str(),
            lint: d.lint.name,
            message: &d.message,
        })
        .sorted_by(|a, b| (a.file, a.row, a.column).cmp(&(b.file, b.row, b.column)))
        .collect::<Vec<_>>();

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn github_escape(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Expand CLI patterns into a sorted, deduplicated list of Go files.
///
/// `dir/...` walks recursively, a directory contributes its own `.go` files and a
/// file is taken as given.
fn collect_go_files(patterns: &[String], no_tests: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for pattern in patterns {
        match recursive_root(pattern) {
            Some(root) => collect_recursive(&root, &mut out)?,
            None => collect_from_path(Path::new(pattern), &mut out)?,
        }
    }

    if no_tests {
        out.retain(|p| !is_test_file(p));
    }
    out.sort();
    out.dedup();
    Ok(out)
}

fn recursive_root(pattern: &str) -> Option<PathBuf> {
    if pattern == "..." {
        return Some(PathBuf::from("."));
    }
    let root = pattern.strip_suffix("/...")?;
    Some(PathBuf::from(if root.is_empty() { "/" } else { root }))
}

fn collect_from_path(path: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if !meta.is_dir() {
        out.push(path.to_path_buf());
        return Ok(());
    }

    let entries = std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory {}", path.display()))?;
    for entry in entries {
        let entry_path = entry?.path();
        if entry_path.is_file() && is_go_file(&entry_path) {
            out.push(entry_path);
        }
    }
    Ok(())
}

fn collect_recursive(root: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_type().is_dir() || !should_skip_dir(e.path())
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && is_go_file(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(())
}

fn is_go_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("go")
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

fn should_skip_dir(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };

    name.starts_with('.') || name.starts_with('_') || matches!(name, "vendor" | "testdata")
}

fn infer_start_dir(args: &CheckArgs) -> anyhow::Result<PathBuf> {
    let base = match args.paths.first() {
        Some(p) => recursive_root(p).unwrap_or_else(|| PathBuf::from(p)),
        None => std::env::current_dir()?,
    };

    let base = if base.is_file() {
        base.parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        base
    };

    Ok(base)
}
