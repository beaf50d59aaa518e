//! Progress reporting and run summary
//!
//! Workers share one [`ProgressReporter`]; it is the only mutable state that
//! crosses shard boundaries, and every update is an atomic increment. The
//! console surface is an `indicatif` bar showing `processed/total`; the
//! final [`IngestSummary`] is assembled once after the pool join.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::extract::ExtractError;
use crate::sink::SinkError;

/// Aggregates per-document outcomes across all workers.
pub struct ProgressReporter {
    total: u64,
    indexed: AtomicU64,
    parse_failures: AtomicU64,
    sink_errors: AtomicU64,
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Reporter with a visible progress bar sized to the corpus.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self::with_bar(total, bar)
    }

    /// Reporter with no console output, for tests and library embedding.
    pub fn hidden(total: u64) -> Self {
        Self::with_bar(total, ProgressBar::hidden())
    }

    fn with_bar(total: u64, bar: ProgressBar) -> Self {
        Self {
            total,
            indexed: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            bar,
        }
    }

    /// Record one successfully extracted and delivered document.
    pub fn document_indexed(&self, shard_id: usize, seq: u64) {
        self.indexed.fetch_add(1, Ordering::Relaxed);
        self.bar.inc(1);
        debug!(shard = shard_id, seq = seq, "document indexed");
    }

    /// Record one unparsable document. The document is skipped; its sequence
    /// number stays reserved so the rest of the shard is unaffected.
    pub fn parse_failure(&self, shard_id: usize, path: &Path, err: &ExtractError) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
        self.bar.inc(1);
        warn!(
            shard = shard_id,
            path = %path.display(),
            error = %err,
            "skipping unparsable document"
        );
    }

    /// Record one failed sink write.
    pub fn sink_error(&self, shard_id: usize, seq: u64, err: &SinkError) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
        self.bar.inc(1);
        error!(
            shard = shard_id,
            seq = seq,
            error = %err,
            "document not indexed"
        );
    }

    /// Close the bar and produce the final summary.
    pub fn finish(&self, started_at: DateTime<Utc>) -> IngestSummary {
        self.bar.finish_and_clear();
        let completed_at = Utc::now();
        IngestSummary {
            total_documents: self.total,
            indexed: self.indexed.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
            duration_secs: (completed_at - started_at).num_milliseconds() as f64 / 1000.0,
            started_at,
            completed_at,
        }
    }
}

/// Final aggregate counts for one pipeline run, emitted once after every
/// worker has joined.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub total_documents: u64,
    pub indexed: u64,
    pub parse_failures: u64,
    pub sink_errors: u64,
    pub duration_secs: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl IngestSummary {
    /// Documents that reached a terminal outcome (indexed or counted failed).
    pub fn processed(&self) -> u64 {
        self.indexed + self.parse_failures + self.sink_errors
    }

    /// True when every discovered document reached a terminal outcome
    /// (a cancelled run reports false).
    pub fn is_complete(&self) -> bool {
        self.processed() == self.total_documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_counters_accumulate() {
        let reporter = ProgressReporter::hidden(5);
        reporter.document_indexed(0, 0);
        reporter.document_indexed(1, 3);
        reporter.parse_failure(
            0,
            &PathBuf::from("bad.xml"),
            &ExtractError::Malformed("truncated".to_string()),
        );
        reporter.sink_error(
            1,
            4,
            &SinkError::Rejected {
                id: 4,
                status: 500,
                message: "boom".to_string(),
            },
        );

        let summary = reporter.finish(Utc::now());
        assert_eq!(summary.total_documents, 5);
        assert_eq!(summary.indexed, 2);
        assert_eq!(summary.parse_failures, 1);
        assert_eq!(summary.sink_errors, 1);
        assert_eq!(summary.processed(), 4);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_complete_run() {
        let reporter = ProgressReporter::hidden(2);
        reporter.document_indexed(0, 0);
        reporter.document_indexed(0, 1);
        let summary = reporter.finish(Utc::now());
        assert!(summary.is_complete());
        assert_eq!(summary.processed(), 2);
    }

    #[test]
    fn test_empty_corpus_summary() {
        let reporter = ProgressReporter::hidden(0);
        let summary = reporter.finish(Utc::now());
        assert_eq!(summary.total_documents, 0);
        assert!(summary.is_complete());
    }
}
