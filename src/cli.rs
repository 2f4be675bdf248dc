// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use clap's "derive" API: the struct below IS the CLI definition. Each
// field becomes an argument, doc comments become --help text, and
// default_value_t supplies the defaults.
//
// Usage:
//   md-link-checker                      # check every .md under the current dir
//   md-link-checker docs README.md       # check a directory and a file
//   md-link-checker docs --root . --timeout 5 --max-workers 16 --json
// =============================================================================

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "md-link-checker",
    version,
    about = "Check Markdown documents for broken links",
    long_about = "md-link-checker scans Markdown files for links and reports every broken one: \
                  missing files, missing heading anchors, links escaping the repository, \
                  unsupported schemes and remote URLs that don't answer with 2xx/3xx. \
                  It exits with status 1 when anything is broken, which makes it easy to use in CI."
)]
pub struct Cli {
    /// Directories or Markdown files to scan
    ///
    /// Directories are searched recursively for *.md files.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Repository root; local links may not point outside it
    ///
    /// Defaults to the current working directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// HTTP request timeout in seconds (per request)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: f64,

    /// Maximum number of concurrent HTTP checks
    #[arg(long, default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,

    /// Require the label of [label](./file.md) to equal the target's
    /// file name or file stem
    #[arg(long)]
    pub require_matching_label: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
