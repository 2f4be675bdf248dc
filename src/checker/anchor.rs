// src/checker/anchor.rs
// =============================================================================
// Heading anchors.
//
// A link like ./guide.md#getting-started is only valid if guide.md has a
// heading whose slug is "getting-started". We approximate the slug rules of
// common Markdown renderers:
//
//   "## Getting Started!"  ->  "getting-started"
// =============================================================================

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

// ATX headings: one or more '#', whitespace, then the heading text
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s+(.+)$").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Derives the anchor a heading produces.
pub fn slugify(heading: &str) -> String {
    let lowered = heading.trim().to_lowercase();
    WHITESPACE_RUN
        .replace_all(&lowered, "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Returns true if `path` has a heading whose slug equals `anchor`
/// (compared lower-cased).
///
/// Only Markdown files have headings to check; any other target passes.
/// A file that cannot be read counts as "anchor not found".
pub fn anchor_exists(path: &Path, anchor: &str) -> bool {
    if !is_markdown(path) {
        return true;
    }

    let wanted = anchor.to_lowercase();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot open anchor target");
            return false;
        }
    };

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot read anchor target");
                return false;
            }
        };
        if let Some(caps) = HEADING.captures(line.trim()) {
            if slugify(&caps[1]) == wanted {
                return true;
            }
        }
    }

    false
}

/// True when the path ends in `.md` (any case).
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
