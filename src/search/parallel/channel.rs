//! Job distribution and result channels for parallel search workers.

#![allow(dead_code)]

use crate::search::result::{SearchStatistics, Solution};
use crate::semantics::expr::EvalError;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// One outermost-position candidate, ranked by search order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    /// Position of the digit in search order (0 is tried first).
    pub rank: usize,
    pub digit: i64,
}

/// Message sent from workers to the coordinator.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Worker finished one job, with or without a solution.
    Finished {
        worker_id: usize,
        rank: usize,
        solution: Option<Solution>,
    },
    /// Worker hit a structural error on a job.
    Error {
        worker_id: usize,
        rank: usize,
        error: EvalError,
    },
    /// Worker has no jobs left.
    Done {
        worker_id: usize,
        statistics: SearchStatistics,
    },
}

/// Shared state for tracking the best-ranked success across all workers.
#[derive(Debug)]
pub struct SharedBest {
    /// Rank of the best solution so far (usize::MAX means none yet).
    pub best_rank: AtomicUsize,
    /// One cancellation flag per job rank.
    pub cancel: Vec<Arc<AtomicBool>>,
}

impl SharedBest {
    pub fn new(jobs: usize) -> Self {
        Self {
            best_rank: AtomicUsize::new(usize::MAX),
            cancel: (0..jobs).map(|_| Arc::new(AtomicBool::new(false))).collect(),
        }
    }

    /// Record a solution at `rank` and cancel every lower-ranked job.
    /// Returns true if this is a new best.
    pub fn try_update(&self, rank: usize) -> bool {
        let previous = self.best_rank.fetch_min(rank, Ordering::SeqCst);
        if rank >= previous {
            return false;
        }
        for flag in self.cancel.iter().skip(rank + 1) {
            flag.store(true, Ordering::SeqCst);
        }
        true
    }

    /// Whether a better-ranked job already succeeded.
    pub fn is_superseded(&self, rank: usize) -> bool {
        self.best_rank.load(Ordering::SeqCst) < rank
    }

    /// Get the current best rank (usize::MAX if none found).
    pub fn current_best(&self) -> usize {
        self.best_rank.load(Ordering::SeqCst)
    }

    /// Cancellation flag for the job at `rank`.
    pub fn cancel_flag(&self, rank: usize) -> Option<Arc<AtomicBool>> {
        self.cancel.get(rank).map(Arc::clone)
    }
}

/// Channel endpoints for a worker.
pub struct WorkerChannels {
    /// Jobs still to be searched, in rank order.
    pub jobs: Receiver<Job>,
    /// Send messages to coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Shared state for fast best-rank checking.
    pub shared: Arc<SharedBest>,
}

/// Channel endpoints for the coordinator.
pub struct CoordinatorChannels {
    /// Receive messages from workers.
    pub from_workers: Receiver<WorkerMessage>,
    /// Shared state.
    pub shared: Arc<SharedBest>,
}

/// Create channels for `num_workers` workers sharing the given jobs.
///
/// The job queue is filled and closed up front, so workers stop pulling
/// once it drains.
pub fn create_channels(
    num_workers: usize,
    jobs: &[Job],
) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let shared = Arc::new(SharedBest::new(jobs.len()));

    let (job_tx, job_rx) = unbounded();
    for job in jobs {
        // the receiver is alive, so sending cannot fail
        let _ = job_tx.send(*job);
    }
    drop(job_tx);

    // Unbounded channel from workers to coordinator (workers shouldn't block)
    let (worker_tx, coordinator_rx) = unbounded();

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            jobs: job_rx.clone(),
            to_coordinator: worker_tx.clone(),
            shared: Arc::clone(&shared),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        shared,
    };

    (coordinator, worker_channels)
}
