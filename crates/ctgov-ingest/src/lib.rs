//! ctgov Ingest Library
//!
//! Parallel bulk ingestion of clinical-trial XML documents into a search index.
//!
//! The pipeline partitions the discovered corpus into contiguous shards with
//! precomputed global sequence numbers, runs one worker per shard, extracts a
//! fixed schema of fields per document, and delivers each record to a
//! [`sink::DocumentSink`] keyed by its sequence number.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ctgov_ingest::config::IngestConfig;
//! use ctgov_ingest::pipeline::IngestPipeline;
//! use ctgov_ingest::sink::ElasticsearchSink;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::new("./data/clinicaltrials");
//!     let sink = Arc::new(ElasticsearchSink::new(&config.sink_url, &config.index)?);
//!     let summary = IngestPipeline::new(config, sink)
//!         .run(CancellationToken::new())
//!         .await?;
//!     println!("indexed {} documents", summary.indexed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod extract;
pub mod partition;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod sink;
