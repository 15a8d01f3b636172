use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::ffmpeg::Transcoder;
use crate::item::Episode;
use crate::pipeline::ItemPipeline;
use crate::records::RecordStore;
use crate::store::ObjectStore;

/// Final outcome of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCounters {
    pub total: usize,
    pub done: usize,
    pub failed: usize,
}

#[derive(Default)]
struct SharedCounters {
    done: AtomicUsize,
    failed: AtomicUsize,
}

/// Fixed-size pool of workers draining a shared episode queue.
///
/// Each episode is popped by exactly one worker exactly once; a failed
/// episode is counted and abandoned, never retried. The pool returns when
/// the queue is empty and no worker holds an in-flight episode.
pub struct WorkerPool<S, T, R> {
    pipeline: Arc<ItemPipeline<S, T, R>>,
    concurrency: usize,
}

impl<S, T, R> WorkerPool<S, T, R>
where
    S: ObjectStore + 'static,
    T: Transcoder + 'static,
    R: RecordStore + 'static,
{
    pub fn new(pipeline: ItemPipeline<S, T, R>, concurrency: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            concurrency: concurrency.max(1),
        }
    }

    /// Process every episode in the batch and return the final counters
    pub async fn run(&self, episodes: Vec<Episode>) -> BatchCounters {
        let total = episodes.len();
        let queue = Arc::new(Mutex::new(VecDeque::from(episodes)));
        let counters = Arc::new(SharedCounters::default());

        let mut workers = JoinSet::new();
        for _ in 0..self.concurrency {
            let queue = Arc::clone(&queue);
            let counters = Arc::clone(&counters);
            let pipeline = Arc::clone(&self.pipeline);

            workers.spawn(async move {
                loop {
                    // Pop-and-remove is the single indivisible operation
                    // shared between workers.
                    let episode = queue.lock().await.pop_front();
                    let Some(episode) = episode else {
                        break;
                    };

                    match pipeline.process(&episode).await {
                        Ok(()) => {
                            counters.done.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            error!("❌ [{}] Migration failed: {e}", episode.id);
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }

                    let done = counters.done.load(Ordering::Relaxed);
                    let failed = counters.failed.load(Ordering::Relaxed);
                    let processed = done + failed;
                    info!(
                        "📊 Progress: {processed}/{total} ({}%) | ✅ {done} done | ❌ {failed} failed",
                        processed * 100 / total
                    );
                }
            });
        }

        while workers.join_next().await.is_some() {}

        BatchCounters {
            total,
            done: counters.done.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
        }
    }
}
