use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::{SearchError, SearchResult};
use crate::results::{FileOutcome, MatchRecord};

/// Runs one task per file on a fixed-size worker pool.
///
/// Tasks are independent; outcomes are collected in completion order and a
/// panicking task only loses its own file. There is no per-file timeout, so
/// a file that never finishes extracting keeps its worker busy until the
/// process is stopped.
pub struct Scheduler {
    pool: ThreadPool,
    jobs: NonZeroUsize,
}

impl Scheduler {
    /// Builds a pool with exactly `jobs` worker threads
    pub fn new(jobs: NonZeroUsize) -> SearchResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs.get())
            .thread_name(|i| format!("docseek-worker-{}", i))
            .build()
            .map_err(|e| SearchError::ThreadPool(e.to_string()))?;
        Ok(Self { pool, jobs })
    }

    pub fn jobs(&self) -> NonZeroUsize {
        self.jobs
    }

    /// Runs `task` for every file and returns once all of them finished.
    ///
    /// `on_complete` is called on the calling thread for each outcome as it
    /// arrives.
    pub fn run<T, C>(&self, files: &[PathBuf], task: T, mut on_complete: C) -> Vec<FileOutcome>
    where
        T: Fn(&Path) -> Vec<MatchRecord> + Sync,
        C: FnMut(&FileOutcome),
    {
        debug!("Scheduling {} files on {} workers", files.len(), self.jobs);
        let task = &task;
        let (tx, rx) = mpsc::channel();

        self.pool.in_place_scope(|scope| {
            for path in files {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    // The receiver lives until every sender is gone
                    let _ = tx.send(run_isolated(path, task));
                });
            }
            drop(tx);

            rx.iter()
                .inspect(|outcome| on_complete(outcome))
                .collect()
        })
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler").field("jobs", &self.jobs).finish()
    }
}

fn run_isolated<T>(path: &Path, task: &T) -> FileOutcome
where
    T: Fn(&Path) -> Vec<MatchRecord>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| task(path))) {
        Ok(records) => FileOutcome::Matched {
            path: path.to_path_buf(),
            records,
        },
        Err(payload) => {
            let err = SearchError::worker_failure(path, panic_message(payload.as_ref()));
            warn!("Error processing {}: {}", path.display(), err);
            FileOutcome::Failed {
                path: path.to_path_buf(),
                diagnostic: err.to_string(),
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}
