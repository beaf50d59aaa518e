//! Document sink adapters
//!
//! The pipeline hands each extracted record, keyed by its global sequence
//! number, to a [`DocumentSink`]. Writes are synchronous best-effort: a
//! failed write is reported to the caller and never aborts the batch.
//! Because the key is the precomputed sequence number, re-running the
//! pipeline over an unchanged corpus overwrites documents in place instead
//! of duplicating them.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::record::StudyRecord;

/// Per-write sink failure. Never fatal to the run; the worker logs it,
/// counts it, and continues with the next document.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("sink rejected document {id}: HTTP {status}: {message}")]
    Rejected {
        id: u64,
        status: u16,
        message: String,
    },

    #[error("sink unavailable at {url}: {message}")]
    Unavailable { url: String, message: String },
}

/// Destination index for extracted records.
///
/// `put` must be safe to call concurrently from every worker; implementations
/// either hold a thread-safe client or keep no mutable state at all.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Write one record keyed by its global sequence number.
    /// Writing the same id twice overwrites the earlier document.
    async fn put(&self, id: u64, record: &StudyRecord) -> Result<(), SinkError>;

    /// Verify the sink is reachable before any worker starts.
    /// A failure here aborts the whole run.
    async fn healthcheck(&self) -> Result<(), SinkError>;
}

/// Sink adapter for an Elasticsearch-compatible HTTP index.
///
/// Each record becomes `PUT {base_url}/{index}/_doc/{id}` with the record as
/// the JSON body. The underlying client pools connections and is safe to
/// share across workers.
pub struct ElasticsearchSink {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticsearchSink {
    /// Create a sink against `base_url` (e.g. `http://localhost:9200`)
    /// writing into `index`.
    pub fn new(base_url: &str, index: &str) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    fn doc_url(&self, id: u64) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, id)
    }
}

#[async_trait]
impl DocumentSink for ElasticsearchSink {
    async fn put(&self, id: u64, record: &StudyRecord) -> Result<(), SinkError> {
        let response = self
            .client
            .put(self.doc_url(id))
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                id,
                status: status.as_u16(),
                message,
            });
        }

        debug!(id = id, index = %self.index, "document indexed");
        Ok(())
    }

    async fn healthcheck(&self) -> Result<(), SinkError> {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| SinkError::Unavailable {
                url: self.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// In-memory capture sink.
///
/// Backs `--dry-run` (extract and count without touching the index) and the
/// integration tests. Optionally rejects a chosen set of ids to exercise the
/// per-write failure path.
#[derive(Default)]
pub struct MemorySink {
    documents: Mutex<BTreeMap<u64, StudyRecord>>,
    fail_ids: HashSet<u64>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects writes for the given ids.
    pub fn with_failures(fail_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            fail_ids: fail_ids.into_iter().collect(),
        }
    }

    /// Snapshot of everything written so far, ordered by id.
    pub fn documents(&self) -> BTreeMap<u64, StudyRecord> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentSink for MemorySink {
    async fn put(&self, id: u64, record: &StudyRecord) -> Result<(), SinkError> {
        if self.fail_ids.contains(&id) {
            return Err(SinkError::Rejected {
                id,
                status: 500,
                message: "simulated write failure".to_string(),
            });
        }

        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, record.clone());
        Ok(())
    }

    async fn healthcheck(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_sink_stores_by_id() {
        let sink = MemorySink::new();
        let record = StudyRecord {
            nct_id: Some("NCT00000001".to_string()),
            ..StudyRecord::empty()
        };

        sink.put(7, &record).await.unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.documents().get(&7), Some(&record));
    }

    #[tokio::test]
    async fn test_memory_sink_overwrites_same_id() {
        let sink = MemorySink::new();
        let first = StudyRecord {
            nct_id: Some("NCT00000001".to_string()),
            ..StudyRecord::empty()
        };
        let second = StudyRecord {
            nct_id: Some("NCT00000002".to_string()),
            ..StudyRecord::empty()
        };

        sink.put(3, &first).await.unwrap();
        sink.put(3, &second).await.unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.documents().get(&3), Some(&second));
    }

    #[tokio::test]
    async fn test_memory_sink_simulated_failure() {
        let sink = MemorySink::with_failures([2]);
        let record = StudyRecord::empty();

        assert!(sink.put(1, &record).await.is_ok());
        let err = sink.put(2, &record).await.unwrap_err();
        assert!(matches!(err, SinkError::Rejected { id: 2, .. }));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_elasticsearch_doc_url() {
        let sink = ElasticsearchSink::new("http://localhost:9200/", "clinical-trials").unwrap();
        assert_eq!(
            sink.doc_url(42),
            "http://localhost:9200/clinical-trials/_doc/42"
        );
    }
}
