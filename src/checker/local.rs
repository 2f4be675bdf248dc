// src/checker/local.rs
// =============================================================================
// This module checks links that point into the repository itself.
//
// How a local link is resolved:
// 1. Split "path#anchor" on the first '#'
// 2. Empty path -> the document itself; relative -> next to the document;
//    absolute -> as written
// 3. Canonicalize (see resolve_path) and make sure the result is still inside
//    the repository root. This is checked BEFORE existence, so a link can
//    never be used to inspect files outside the root.
// 4. The file must exist, and the anchor (if any) must match a heading
//
// Everything here is synchronous. Local checks are cheap filesystem lookups
// and run one link at a time.
// =============================================================================

use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::anchor::anchor_exists;
use super::normalize::normalize;
use crate::error::FailureReason;

/// Resolves local links against a fixed repository root.
#[derive(Debug, Clone)]
pub struct LocalResolver {
    root: PathBuf,
    require_matching_label: bool,
}

impl LocalResolver {
    /// `root` must already be canonical (see resolve_path).
    pub fn new(root: PathBuf, require_matching_label: bool) -> Self {
        Self {
            root,
            require_matching_label,
        }
    }

    /// Checks one local link found in `document`.
    ///
    /// Returns None when the link is fine, or the reason it is broken.
    pub fn check(&self, document: &Path, link: &str, label: Option<&str>) -> Option<FailureReason> {
        let (target_part, anchor) = link.split_once('#').unwrap_or((link, ""));

        let target = if target_part.is_empty() {
            document.to_path_buf()
        } else {
            let candidate = Path::new(target_part);
            if candidate.is_absolute() {
                candidate.to_path_buf()
            } else {
                document.parent().unwrap_or(Path::new("")).join(candidate)
            }
        };

        let resolved = match resolve_path(&target) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!(target = %target.display(), error = %e, "cannot resolve link target");
                return Some(FailureReason::MissingFile(display_target(document, target_part)));
            }
        };

        if !resolved.starts_with(&self.root) {
            return Some(FailureReason::OutsideRepository(resolved.display().to_string()));
        }

        if !resolved.exists() {
            return Some(FailureReason::MissingFile(display_target(document, target_part)));
        }

        if !anchor.is_empty() && !anchor_exists(&resolved, anchor) {
            let relative = resolved.strip_prefix(&self.root).unwrap_or(&resolved);
            return Some(FailureReason::MissingAnchor {
                anchor: anchor.to_string(),
                target: relative.display().to_string(),
            });
        }

        if self.require_matching_label && !target_part.is_empty() {
            if let Some(label) = label {
                return label_mismatch(label, &resolved);
            }
        }

        None
    }
}

// The link's own path part, or the document's file name for anchor-only links
fn display_target(document: &Path, target_part: &str) -> String {
    if target_part.is_empty() {
        document
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        target_part.to_string()
    }
}

// The label must equal the target's file name ("Doc.md") or stem ("Doc")
fn label_mismatch(label: &str, resolved: &Path) -> Option<FailureReason> {
    let label = normalize(label);
    let file_name = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = resolved
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    if label == file_name || label == stem {
        None
    } else {
        Some(FailureReason::LabelMismatch {
            label,
            target: file_name,
        })
    }
}

/// Makes `path` absolute and canonical without requiring it to exist.
///
/// Existing paths are canonicalized by the OS (symlinks resolved). For a
/// missing path, `.` and `..` are removed lexically and the longest existing
/// ancestor is canonicalized, with the missing tail appended unchanged.
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    if let Ok(canonical) = absolute.canonicalize() {
        return Ok(canonical);
    }

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let mut existing = normalized.as_path();
    let mut missing_tail = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            for part in missing_tail.iter().rev() {
                resolved.push(part);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing_tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(normalized),
        }
    }
}
