//! Chunked batch generation.
//!
//! Large purchases are split into fixed-size chunks. Each chunk is produced
//! and persisted as a unit, progress is reported once per chunk, and control
//! is yielded back to the runtime between chunks so the caller stays
//! responsive. Cooperative and single-threaded; nothing preempts a chunk.

use crate::error::{LotteryError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Cooperative cancellation flag for an in-flight batch. Cheap to clone;
/// checked at chunk boundaries only, so a started chunk always completes.
#[derive(Debug, Clone, Default)]
pub struct BatchAbort(Arc<AtomicBool>);

impl BatchAbort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    chunk_size: usize,
}

impl BatchScheduler {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_count(&self, total: usize) -> usize {
        total.div_ceil(self.chunk_size)
    }

    /// Chunk spans covering `total` items: full chunks followed by the
    /// remainder.
    pub fn chunks(&self, total: usize) -> Vec<Chunk> {
        (0..self.chunk_count(total))
            .map(|index| {
                let start = index * self.chunk_size;
                Chunk {
                    index,
                    start,
                    len: self.chunk_size.min(total - start),
                }
            })
            .collect()
    }

    /// Drive a batch: generate each chunk, report progress, yield between
    /// chunks. Aborting skips the remaining chunks; whatever earlier chunks
    /// persisted stays persisted.
    pub async fn run<T, G, Fut, P>(
        &self,
        total: usize,
        abort: Option<BatchAbort>,
        mut generate_chunk: G,
        mut on_progress: P,
    ) -> Result<Vec<T>>
    where
        G: FnMut(Chunk) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
        P: FnMut(usize, usize),
    {
        let chunks = self.chunks(total);
        let last_index = chunks.len().saturating_sub(1);
        let mut items = Vec::with_capacity(total);

        for chunk in chunks {
            if let Some(ref abort) = abort {
                if abort.is_aborted() {
                    tracing::warn!(
                        "Batch aborted after {} of {} tickets",
                        items.len(),
                        total
                    );
                    return Err(LotteryError::BatchAborted {
                        completed: items.len(),
                        total,
                    });
                }
            }

            let mut produced = generate_chunk(chunk).await?;
            items.append(&mut produced);
            on_progress(items.len(), total);

            if chunk.index < last_index {
                tokio::task::yield_now().await;
            }
        }

        Ok(items)
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_plan_covers_the_total() {
        let scheduler = BatchScheduler::new(50);
        let chunks = scheduler.chunks(237);

        assert_eq!(chunks.len(), 5);
        assert_eq!(
            chunks.iter().map(|c| c.len).collect::<Vec<_>>(),
            vec![50, 50, 50, 50, 37]
        );
        assert_eq!(chunks.last().unwrap().start, 200);
        assert_eq!(chunks.iter().map(|c| c.len).sum::<usize>(), 237);
    }

    #[test]
    fn exact_multiple_has_no_remainder_chunk() {
        let scheduler = BatchScheduler::new(50);
        let chunks = scheduler.chunks(100);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len == 50));
    }

    #[tokio::test]
    async fn run_reports_progress_per_chunk() {
        let scheduler = BatchScheduler::new(50);
        let mut progress = Vec::new();

        let items = scheduler
            .run(
                237,
                None,
                |chunk| async move { Ok(vec![0u8; chunk.len]) },
                |completed, total| progress.push((completed, total)),
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 237);
        assert_eq!(
            progress,
            vec![(50, 237), (100, 237), (150, 237), (200, 237), (237, 237)]
        );
    }

    #[tokio::test]
    async fn abort_skips_remaining_chunks() {
        let scheduler = BatchScheduler::new(50);
        let abort = BatchAbort::new();
        let abort_in_progress = abort.clone();

        let result = scheduler
            .run(
                237,
                Some(abort),
                |chunk| async move { Ok(vec![0u8; chunk.len]) },
                |completed, _| {
                    if completed == 100 {
                        abort_in_progress.abort();
                    }
                },
            )
            .await;

        match result {
            Err(LotteryError::BatchAborted { completed, total }) => {
                assert_eq!(completed, 100);
                assert_eq!(total, 237);
            }
            other => panic!("expected BatchAborted, got {:?}", other.map(|v| v.len())),
        }
    }

    #[tokio::test]
    async fn chunk_failure_stops_the_batch() {
        let scheduler = BatchScheduler::new(50);

        let result = scheduler
            .run(
                150,
                None,
                |chunk| async move {
                    if chunk.index == 1 {
                        Err(LotteryError::internal("chunk failed"))
                    } else {
                        Ok(vec![0u8; chunk.len])
                    }
                },
                |_, _| {},
            )
            .await;

        assert!(result.is_err());
    }
}
