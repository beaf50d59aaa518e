//! Ingestion configuration
//!
//! Assembled by the CLI (flags with environment-variable fallbacks) and
//! validated once before the pipeline starts.

use std::path::PathBuf;

use ctgov_common::{CtgovError, Result};
use serde::{Deserialize, Serialize};

/// Reference sizing from the production corpus runs.
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_INDEX: &str = "clinical-trials";
pub const DEFAULT_SINK_URL: &str = "http://localhost:9200";

/// Main ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Root directory scanned for trial XML documents
    pub input_root: PathBuf,
    /// Number of shards / concurrent workers
    pub workers: usize,
    /// Target index name
    pub index: String,
    /// Base URL of the search index
    pub sink_url: String,
    /// Extract and count without writing to the index
    pub dry_run: bool,
}

impl IngestConfig {
    /// Configuration with reference defaults for the given input root.
    pub fn new(input_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            workers: DEFAULT_WORKERS,
            index: DEFAULT_INDEX.to_string(),
            sink_url: DEFAULT_SINK_URL.to_string(),
            dry_run: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CtgovError::config("workers must be greater than 0"));
        }
        if self.index.is_empty() {
            return Err(CtgovError::config("index name cannot be empty"));
        }
        if self.index.contains('/') {
            return Err(CtgovError::config(format!(
                "index name cannot contain '/': {}",
                self.index
            )));
        }
        if !self.dry_run && self.sink_url.is_empty() {
            return Err(CtgovError::config("sink URL cannot be empty"));
        }
        Ok(())
    }
}
