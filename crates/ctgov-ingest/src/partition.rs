//! Corpus partitioning
//!
//! Splits the ordered file list into N contiguous shards and assigns every
//! document its global sequence number before any worker starts. The
//! sequence number doubles as the sink document id, so correctness here is
//! what guarantees no duplicate and no missing ids: shard k starts at the
//! prefix sum of the sizes of shards 0..k, and the j-th document of that
//! shard is `start + j`. Nothing at runtime recomputes or coordinates ids.

use std::path::PathBuf;

/// A document path paired with its precomputed global sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    pub seq: u64,
}

/// A contiguous slice of the corpus owned by exactly one worker.
#[derive(Debug, Clone)]
pub struct Shard {
    pub id: usize,
    /// Sequence number of this shard's first document
    pub start_seq: u64,
    pub documents: Vec<DocumentRef>,
}

impl Shard {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Partition an ordered file list into exactly `workers` contiguous shards.
///
/// Every shard receives `M / N` documents and the last shard absorbs the
/// remainder. Shard sizes always sum to the corpus size, and start sequence
/// numbers are the closed-form prefix sums, beginning at 0. A worker count
/// of zero is treated as one.
pub fn partition(paths: Vec<PathBuf>, workers: usize) -> Vec<Shard> {
    let workers = workers.max(1);
    let total = paths.len();
    let base = total / workers;

    let mut shards = Vec::with_capacity(workers);
    let mut iter = paths.into_iter();
    let mut next_seq: u64 = 0;

    for id in 0..workers {
        // Last shard takes base + remainder
        let size = if id == workers - 1 {
            total - base * (workers - 1)
        } else {
            base
        };

        let start_seq = next_seq;
        let documents: Vec<DocumentRef> = iter
            .by_ref()
            .take(size)
            .enumerate()
            .map(|(offset, path)| DocumentRef {
                path,
                seq: start_seq + offset as u64,
            })
            .collect();

        next_seq += documents.len() as u64;
        shards.push(Shard {
            id,
            start_seq,
            documents,
        });
    }

    shards
}
