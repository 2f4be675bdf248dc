// src/config.rs
// =============================================================================
// Validated run configuration.
//
// clap gives us raw values (a float for the timeout, an optional root).
// CheckConfig is what the checker actually runs with: the root is made
// absolute and canonical once, and nonsense values are rejected up front.
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checker::resolve_path;
use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_MAX_WORKERS: usize = 8;

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Canonical repository root; local links may not resolve outside it
    pub root: PathBuf,
    /// Per-request timeout for remote checks
    pub timeout: Duration,
    /// Maximum number of remote checks in flight
    pub max_concurrency: usize,
    /// Require inline link labels to match the target file name
    pub require_matching_label: bool,
}

impl CheckConfig {
    /// Builds a config; `root` defaults to the current directory.
    pub fn new(
        root: Option<&Path>,
        timeout_secs: f64,
        max_concurrency: usize,
        require_matching_label: bool,
    ) -> Result<Self, ConfigError> {
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(ConfigError::InvalidTimeout(timeout_secs));
        }
        if max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }

        let root = match root {
            Some(root) => {
                resolve_path(root).map_err(|e| ConfigError::InvalidRoot(root.to_path_buf(), e))?
            }
            None => {
                let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
                resolve_path(&cwd).map_err(ConfigError::CurrentDir)?
            }
        };

        Ok(Self {
            root,
            timeout: Duration::from_secs_f64(timeout_secs),
            max_concurrency,
            require_matching_label,
        })
    }
}
