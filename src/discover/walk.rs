// src/discover/walk.rs
// =============================================================================
// Recursive Markdown file discovery.
//
// Rules:
// - a directory contributes every *.md file below it (any depth)
// - a file is kept only if it ends in .md
// - paths that don't exist are skipped with a warning, not an error
//
// Extensions are compared case-insensitively, so README.MD counts too.
// =============================================================================

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::checker::is_markdown;

/// Collects Markdown files from a mix of directories and files.
///
/// Returns a sorted list without duplicates. Paths are kept as given
/// (relative inputs produce relative results).
pub fn collect_markdown_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                match entry {
                    Ok(entry) if entry.file_type().is_file() && is_markdown(entry.path()) => {
                        files.insert(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "skipping unreadable directory entry"),
                }
            }
        } else if path.is_file() {
            if is_markdown(path) {
                files.insert(path.to_path_buf());
            } else {
                debug!(path = %path.display(), "not a Markdown file, skipping");
            }
        } else {
            warn!(path = %path.display(), "path does not exist, skipping");
        }
    }

    files.into_iter().collect()
}
