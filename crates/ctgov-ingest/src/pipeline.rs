//! Worker pool and run orchestration
//!
//! The pipeline discovers the corpus, partitions it, verifies the sink, and
//! spawns one worker task per shard. Workers share nothing mutable except
//! the progress reporter's atomic counters; sequence numbers were fixed by
//! the partitioner before the first task started, so no runtime failure can
//! shift an id. The run completes only after every worker has joined.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::discovery;
use crate::extract::extract_study;
use crate::partition::{partition, Shard};
use crate::progress::{IngestSummary, ProgressReporter};
use crate::sink::DocumentSink;

/// Per-worker outcome counts, logged at join time.
#[derive(Debug, Clone, Copy, Default)]
struct ShardStats {
    indexed: u64,
    parse_failures: u64,
    sink_errors: u64,
}

/// One full bulk-ingestion run.
pub struct IngestPipeline {
    config: IngestConfig,
    sink: Arc<dyn DocumentSink>,
}

impl IngestPipeline {
    pub fn new(config: IngestConfig, sink: Arc<dyn DocumentSink>) -> Self {
        Self { config, sink }
    }

    /// Run the pipeline to completion (or until `cancel` fires).
    ///
    /// Returns `Err` only for fatal setup failures: an unreadable input
    /// root or an unreachable sink. Per-document and per-write failures are
    /// absorbed into the summary counters.
    pub async fn run(&self, cancel: CancellationToken) -> Result<IngestSummary> {
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now();

        self.config
            .validate()
            .context("Invalid ingestion configuration")?;

        let files = discovery::discover(&self.config.input_root)
            .context("Failed to enumerate input documents")?;

        self.sink
            .healthcheck()
            .await
            .context("Sink healthcheck failed")?;

        let shards = partition(files, self.config.workers);
        let total: u64 = shards.iter().map(|s| s.len() as u64).sum();

        info!(
            run_id = %run_id,
            documents = total,
            workers = shards.len(),
            index = %self.config.index,
            "starting ingestion"
        );

        let reporter = Arc::new(ProgressReporter::new(total));

        let mut handles = Vec::with_capacity(shards.len());
        for shard in shards {
            let sink = Arc::clone(&self.sink);
            let reporter = Arc::clone(&reporter);
            let cancel = cancel.clone();
            handles.push(tokio::spawn(run_shard(shard, sink, reporter, cancel)));
        }

        // The join barrier: the run is complete only when every worker is
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => {
                    info!(
                        run_id = %run_id,
                        worker = worker,
                        indexed = stats.indexed,
                        parse_failures = stats.parse_failures,
                        sink_errors = stats.sink_errors,
                        "worker completed"
                    );
                },
                Err(e) => {
                    error!(run_id = %run_id, worker = worker, error = %e, "worker panicked");
                },
            }
        }

        let summary = reporter.finish(started_at);
        info!(
            run_id = %run_id,
            indexed = summary.indexed,
            parse_failures = summary.parse_failures,
            sink_errors = summary.sink_errors,
            duration_secs = summary.duration_secs,
            "ingestion finished"
        );

        Ok(summary)
    }
}

/// Process one shard strictly in order.
///
/// A document that cannot be read or parsed is counted and skipped; a
/// rejected sink write is counted and skipped. Cancellation is observed
/// between documents, so an in-flight document always finishes.
async fn run_shard(
    shard: Shard,
    sink: Arc<dyn DocumentSink>,
    reporter: Arc<ProgressReporter>,
    cancel: CancellationToken,
) -> ShardStats {
    let mut stats = ShardStats::default();

    for doc in &shard.documents {
        if cancel.is_cancelled() {
            warn!(
                shard = shard.id,
                remaining = shard.len() as u64 - (stats.indexed + stats.parse_failures + stats.sink_errors),
                "shutdown requested, abandoning remaining documents"
            );
            break;
        }

        let xml = match tokio::fs::read(&doc.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                stats.parse_failures += 1;
                reporter.parse_failure(
                    shard.id,
                    &doc.path,
                    &crate::extract::ExtractError::Unreadable(e.to_string()),
                );
                continue;
            },
        };

        match extract_study(&xml) {
            Ok(record) => match sink.put(doc.seq, &record).await {
                Ok(()) => {
                    stats.indexed += 1;
                    reporter.document_indexed(shard.id, doc.seq);
                },
                Err(e) => {
                    stats.sink_errors += 1;
                    reporter.sink_error(shard.id, doc.seq, &e);
                },
            },
            Err(e) => {
                stats.parse_failures += 1;
                reporter.parse_failure(shard.id, &doc.path, &e);
            },
        }
    }

    stats
}
