// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules, leaf first:
// - markdown:  extracts link occurrences (with line numbers) from text
// - normalize: decodes/trims links, skips ignorable ones, classifies the rest
// - anchor:    heading slugs and anchor lookups
// - local:     resolves links to files inside the repository root
// - http:      checks a single remote URL (HEAD, then GET if rejected)
// - dispatch:  checks each distinct remote URL once, concurrently
//
// This file ties them together in check_documents(), which turns a list of
// Markdown files into a list of broken links.
// =============================================================================

mod anchor;
mod dispatch;
mod http;
mod local;
mod markdown;
mod normalize;

#[cfg(test)]
mod test_server;

pub use anchor::is_markdown;
pub use http::RemoteChecker;
pub use local::resolve_path;

use dispatch::{check_remote_links, RemoteLinks, RemoteOccurrence};
use local::LocalResolver;
use markdown::extract_links;
use normalize::{classify, is_ignored, LinkKind};

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::CheckConfig;
use crate::error::FailureReason;

/// One broken link, ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// The Markdown file containing the link
    pub document: PathBuf,
    /// The link exactly as written (empty for unreadable files)
    pub link: String,
    #[serde(serialize_with = "serialize_display")]
    pub reason: FailureReason,
    /// None when the whole file could not be read
    pub line: Option<usize>,
}

fn serialize_display<S: Serializer>(reason: &FailureReason, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Checks every link in `files` and returns all broken ones, sorted by
/// document and line.
///
/// Local links are checked one after another while the files are read.
/// Remote links are collected across ALL files first, so a URL used in
/// twenty documents is still requested only once.
pub async fn check_documents(
    files: &[PathBuf],
    config: &CheckConfig,
    remote: &RemoteChecker,
) -> Vec<ValidationFailure> {
    let resolver = LocalResolver::new(config.root.clone(), config.require_matching_label);
    let mut failures = Vec::new();
    let mut remote_links = RemoteLinks::new();

    for file in files {
        let content = match tokio::fs::read_to_string(file).await {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "cannot read document");
                failures.push(ValidationFailure {
                    document: file.clone(),
                    link: String::new(),
                    reason: FailureReason::Unreadable(e.to_string()),
                    line: None,
                });
                continue;
            }
        };

        let occurrences = extract_links(&content);
        debug!(file = %file.display(), links = occurrences.len(), "extracted links");

        for occurrence in occurrences {
            if is_ignored(&occurrence.normalized) {
                continue;
            }

            match classify(&occurrence.normalized) {
                LinkKind::Local => {
                    let label = occurrence.label.as_deref();
                    if let Some(reason) = resolver.check(file, &occurrence.normalized, label) {
                        failures.push(ValidationFailure {
                            document: file.clone(),
                            link: occurrence.raw,
                            reason,
                            line: Some(occurrence.line),
                        });
                    }
                }
                LinkKind::Remote => {
                    remote_links
                        .entry(occurrence.normalized)
                        .or_default()
                        .push(RemoteOccurrence {
                            document: file.clone(),
                            raw: occurrence.raw,
                            line: occurrence.line,
                        });
                }
                LinkKind::Unsupported => {
                    failures.push(ValidationFailure {
                        document: file.clone(),
                        reason: FailureReason::UnsupportedScheme(occurrence.normalized),
                        link: occurrence.raw,
                        line: Some(occurrence.line),
                    });
                }
            }
        }
    }

    info!(
        files = files.len(),
        local_failures = failures.len(),
        remote_urls = remote_links.len(),
        "local checks done"
    );

    let remote_failures = check_remote_links(&remote_links, config.max_concurrency, move |url| async move {
        remote.check(&url).await
    })
    .await;
    failures.extend(remote_failures);

    failures.sort_by(|a, b| (&a.document, a.line).cmp(&(&b.document, b.line)));
    failures
}
