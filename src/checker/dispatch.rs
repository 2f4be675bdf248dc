// src/checker/dispatch.rs
// =============================================================================
// Checking remote links concurrently, once per distinct URL.
//
// The same URL often appears many times across a documentation tree. We
// group occurrences by URL, check each URL exactly once, and then copy the
// single result to every occurrence.
//
// Concurrency is bounded with buffer_unordered(N): at most N checks are in
// flight. Each check writes only its own URL's entry in the results map, so
// no locking is needed.
// =============================================================================

use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

use super::ValidationFailure;
use crate::error::{FailureReason, RemoteFailure};

/// Where a remote URL appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOccurrence {
    pub document: PathBuf,
    /// The link as written, before normalization
    pub raw: String,
    pub line: usize,
}

/// Remote occurrences grouped by normalized URL.
pub type RemoteLinks = BTreeMap<String, Vec<RemoteOccurrence>>;

/// Checks every distinct URL in `links` exactly once, running at most
/// `max_concurrency` checks at a time, and returns one failure per
/// occurrence of each failing URL.
///
/// `check` does the actual work; it receives the URL and returns None on
/// success. Passing it in keeps this scheduler independent of HTTP.
pub async fn check_remote_links<F, Fut>(
    links: &RemoteLinks,
    max_concurrency: usize,
    check: F,
) -> Vec<ValidationFailure>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<RemoteFailure>>,
{
    info!(
        urls = links.len(),
        workers = max_concurrency,
        "checking remote links"
    );

    let results: HashMap<String, Option<RemoteFailure>> = stream::iter(links.keys().cloned())
        .map(|url| {
            let pending = check(url.clone());
            async move {
                let outcome = pending.await;
                debug!(url = %url, ok = outcome.is_none(), "remote check finished");
                (url, outcome)
            }
        })
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    // Every check has completed; fan each failure out to its occurrences
    let mut failures = Vec::new();
    for (url, occurrences) in links {
        let Some(Some(failure)) = results.get(url) else {
            continue;
        };
        for occurrence in occurrences {
            failures.push(ValidationFailure {
                document: occurrence.document.clone(),
                link: occurrence.raw.clone(),
                reason: FailureReason::Remote(failure.clone()),
                line: Some(occurrence.line),
            });
        }
    }
    failures
}
