// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Find the Markdown files to check
// 3. Run the checker over them
// 4. Print the report and exit (0 = all good, 1 = broken links, 2 = error)
//
// Logs go to stderr; the report goes to stdout, so `--json` output can be
// piped straight into other tools.
// =============================================================================

mod checker; // src/checker/ - link extraction and validation
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated run settings
mod discover; // src/discover/ - finding Markdown files
mod error; // src/error.rs - failure reasons and config errors

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use checker::{RemoteChecker, ValidationFailure};
use cli::Cli;
use config::CheckConfig;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_with(cli, &mut io::stdout()).await
}

// Writes the report to `out` and returns the process exit code:
//   Ok(0) = no broken links (or nothing to check)
//   Ok(1) = broken links found
//   Err   = the run could not be performed
async fn run_with(cli: Cli, out: &mut impl Write) -> Result<i32> {
    let config = CheckConfig::new(
        cli.root.as_deref(),
        cli.timeout,
        cli.max_workers,
        cli.require_matching_label,
    )
    .context("invalid configuration")?;

    let files = discover::collect_markdown_files(&cli.paths);
    if files.is_empty() {
        if cli.json {
            print_json(out, 0, &[])?;
        } else {
            writeln!(out, "No Markdown files found in the specified paths.")?;
        }
        return Ok(0);
    }

    info!(files = files.len(), root = %config.root.display(), "checking links");

    let remote = RemoteChecker::new(config.timeout).context("failed to build HTTP client")?;
    let failures = checker::check_documents(&files, &config, &remote).await;

    // Report paths relative to the root, like the links themselves
    let failures: Vec<ValidationFailure> = failures
        .into_iter()
        .map(|failure| ValidationFailure {
            document: relative_to_root(&failure.document, &config.root),
            ..failure
        })
        .collect();

    if cli.json {
        print_json(out, files.len(), &failures)?;
    } else {
        print_text(out, files.len(), &failures)?;
    }

    Ok(if failures.is_empty() { 0 } else { 1 })
}

// -v -> info, -vv -> debug; RUST_LOG wins when set
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Serialize)]
struct JsonReport<'a> {
    checked_files: usize,
    failures: &'a [ValidationFailure],
}

fn print_json(out: &mut impl Write, checked_files: usize, failures: &[ValidationFailure]) -> Result<()> {
    let report = JsonReport {
        checked_files,
        failures,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

fn print_text(out: &mut impl Write, checked_files: usize, failures: &[ValidationFailure]) -> io::Result<()> {
    if failures.is_empty() {
        return writeln!(out, "Checked {} Markdown files; all links look good.", checked_files);
    }

    writeln!(out, "Broken links detected:")?;
    for failure in failures {
        writeln!(out, "{}", format_failure(failure))?;
    }
    Ok(())
}

// "- docs/a.md:3: './missing.md' -> missing file: ./missing.md"
fn format_failure(failure: &ValidationFailure) -> String {
    let document = failure.document.display();
    match failure.line {
        Some(line) => format!(
            "- {}:{}: '{}' -> {}",
            document, line, failure.link, failure.reason
        ),
        None => format!("- {}: {}", document, failure.reason),
    }
}

// Falls back to the path as given when it is outside the root
fn relative_to_root(path: &Path, root: &Path) -> PathBuf {
    checker::resolve_path(path)
        .ok()
        .and_then(|resolved| resolved.strip_prefix(root).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}
