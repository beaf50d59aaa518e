//! ctgov-ingest - bulk XML ingestion tool

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use ctgov_common::logging::{init_logging, LogConfig, LogLevel};
use ctgov_ingest::config::{IngestConfig, DEFAULT_INDEX, DEFAULT_SINK_URL, DEFAULT_WORKERS};
use ctgov_ingest::pipeline::IngestPipeline;
use ctgov_ingest::sink::{DocumentSink, ElasticsearchSink, MemorySink};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ctgov-ingest")]
#[command(author, version, about = "Bulk-ingest clinical trial XML into a search index")]
struct Cli {
    /// Root directory containing trial XML documents
    #[arg(env = "CTGOV_INPUT_ROOT")]
    input_root: PathBuf,

    /// Number of shards / concurrent workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, env = "CTGOV_WORKERS")]
    workers: usize,

    /// Target index name
    #[arg(short, long, default_value = DEFAULT_INDEX, env = "CTGOV_INDEX")]
    index: String,

    /// Base URL of the search index
    #[arg(long, default_value = DEFAULT_SINK_URL, env = "CTGOV_SINK_URL")]
    sink_url: String,

    /// Extract and count without writing to the index
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag; environment overrides win
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::from_env()
        .unwrap_or_default()
        .with_level(log_level)
        .with_file_prefix("ctgov-ingest");

    init_logging(&log_config)?;

    let config = IngestConfig {
        input_root: cli.input_root,
        workers: cli.workers,
        index: cli.index,
        sink_url: cli.sink_url,
        dry_run: cli.dry_run,
    };
    config.validate()?;

    let sink: Arc<dyn DocumentSink> = if config.dry_run {
        info!("dry run: records are extracted and counted, not indexed");
        Arc::new(MemorySink::new())
    } else {
        Arc::new(ElasticsearchSink::new(&config.sink_url, &config.index)?)
    };

    // Ctrl-C lets in-flight documents finish, then stops the workers
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("shutdown signal received, finishing in-flight documents");
            signal_cancel.cancel();
        }
    });

    let summary = IngestPipeline::new(config, sink).run(cancel).await?;

    info!(
        total_documents = summary.total_documents,
        indexed = summary.indexed,
        parse_failures = summary.parse_failures,
        sink_errors = summary.sink_errors,
        duration_secs = summary.duration_secs,
        "Ingestion complete"
    );

    // Per-record failures do not fail the process; only fatal setup errors
    // (propagated above as Err) produce a non-zero exit
    Ok(())
}
