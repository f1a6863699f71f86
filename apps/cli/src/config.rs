// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::path::PathBuf;

/// Process-wide settings. Command-line flags take precedence.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads for batch generation.
    pub worker_threads: usize,
    /// Reference data file; the built-in set is used when unset.
    pub reference: Option<PathBuf>,
    /// Generator configuration file; defaults apply when unset.
    pub generator: Option<PathBuf>,
    /// Directory receiving documents when no output path is given.
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            worker_threads: std::env::var("WORKER_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get()),
            reference: std::env::var("BEMGEN_REFERENCE").ok().map(PathBuf::from),
            generator: std::env::var("BEMGEN_CONFIG").ok().map(PathBuf::from),
            output_dir: std::env::var("BEMGEN_OUTPUT_DIR")
                .unwrap_or_else(|_| ".".into())
                .into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
