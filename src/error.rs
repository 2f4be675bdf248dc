// src/error.rs
// =============================================================================
// Error and failure types.
//
// Two very different things live here:
// - FailureReason: why a single link is broken. These are ordinary values,
//   collected into the report. A broken link never aborts the run.
// - ConfigError: the run itself cannot start (bad flags, unusable root).
//   These bubble up through anyhow to main() and become exit code 2.
//
// thiserror generates the Display impls, so the #[error(...)] strings below
// are exactly what the report prints.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Why a remote URL failed its check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteFailure {
    /// The server answered with a status outside 200-399
    #[error("HTTP {code}: {reason}")]
    Status { code: u16, reason: String },

    /// No usable response (DNS, refused connection, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(String),
}

/// Why a link occurrence is reported as broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("unable to read file: {0}")]
    Unreadable(String),

    /// The resolved path escapes the repository root
    #[error("points outside repository: {0}")]
    OutsideRepository(String),

    #[error("missing file: {0}")]
    MissingFile(String),

    #[error("missing anchor '#{anchor}' in {target}")]
    MissingAnchor { anchor: String, target: String },

    #[error("unsupported scheme in link '{0}'")]
    UnsupportedScheme(String),

    /// Only produced when label matching is switched on
    #[error("display text '{label}' does not match target file '{target}'")]
    LabelMismatch { label: String, target: String },

    #[error(transparent)]
    Remote(#[from] RemoteFailure),
}

/// Problems with the run configuration itself.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),

    #[error("max workers must be at least 1")]
    InvalidConcurrency,

    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("invalid root '{}': {1}", .0.display())]
    InvalidRoot(PathBuf, #[source] std::io::Error),
}
