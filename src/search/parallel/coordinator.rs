//! Parallel search coordinator that manages worker threads.
//!
//! The outermost position's candidate digits become ranked jobs. Workers
//! pull jobs in rank order and run the backtracking search on each subtree.
//! A success at rank `r` cancels every job ranked after `r`; the coordinator
//! waits for the rest and reports the best-ranked success, which is exactly
//! what the sequential search would have returned.

#![allow(dead_code)]

use crate::search::backtrack::BacktrackingSearch;
use crate::search::config::SearchConfig;
use crate::search::parallel::channel::{
    CoordinatorChannels, Job, WorkerChannels, WorkerMessage, create_channels,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::result::{SearchResult, SearchStatistics, Solution};
use crate::search::{Algorithm, SearchAlgorithm};
use crate::semantics::expr::{EvalError, Expr};
use log::{debug, info, warn};
use std::time::Instant;

/// Result from parallel search execution.
#[derive(Debug)]
pub struct ParallelResult {
    /// The best-ranked result across all workers.
    pub best_result: SearchResult,
    /// Per-worker statistics.
    pub worker_statistics: Vec<(usize, SearchStatistics)>,
}

/// Run the backtracking search with its outermost position split across
/// worker threads.
pub fn run_parallel_search(
    expr: &Expr,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
) -> Result<ParallelResult, EvalError> {
    let start_time = Instant::now();

    // Nothing to split without at least one input
    if expr.input_indices().is_empty() {
        let mut search = BacktrackingSearch::new();
        let best_result = search.search(expr, search_config)?;
        return Ok(ParallelResult {
            best_result,
            worker_statistics: Vec::new(),
        });
    }

    let jobs: Vec<Job> = search_config
        .direction
        .digits()
        .into_iter()
        .enumerate()
        .map(|(rank, digit)| Job { rank, digit })
        .collect();
    let num_workers = parallel_config.effective_workers(jobs.len());
    debug!("spreading {} jobs over {} workers", jobs.len(), num_workers);

    let (coordinator_channels, worker_channels) = create_channels(num_workers, &jobs);

    let worker_handles: Vec<_> = worker_channels
        .into_iter()
        .enumerate()
        .map(|(worker_id, channels)| {
            let expr = expr.clone();
            let config = search_config.clone();
            std::thread::spawn(move || run_worker(worker_id, &expr, &config, channels))
        })
        .collect();

    let result = run_coordinator(coordinator_channels, num_workers, start_time);

    for handle in worker_handles {
        if handle.join().is_err() {
            warn!("search worker panicked");
        }
    }

    let result = result?;
    match result.best_result.solution() {
        Some(solution) => info!("found {} in {:.2?}", solution, start_time.elapsed()),
        None => info!(
            "no assignment reaches {} ({:.2?})",
            search_config.target_value,
            start_time.elapsed()
        ),
    }
    Ok(result)
}

/// Coordinator loop that receives messages from workers and keeps the
/// best-ranked success.
fn run_coordinator(
    channels: CoordinatorChannels,
    num_workers: usize,
    start_time: Instant,
) -> Result<ParallelResult, EvalError> {
    let mut best: Option<(usize, Solution)> = None;
    let mut first_error: Option<(usize, EvalError)> = None;
    let mut worker_stats: Vec<(usize, SearchStatistics)> = Vec::new();
    let mut done_count = 0;

    // Ends early only if every worker sender is gone
    for message in channels.from_workers.iter() {
        match message {
            WorkerMessage::Finished {
                worker_id,
                rank,
                solution,
            } => {
                let Some(solution) = solution else {
                    continue;
                };
                debug!("worker {} solved rank {}: {}", worker_id, rank, solution);
                if best.as_ref().map_or(true, |(best_rank, _)| rank < *best_rank) {
                    best = Some((rank, solution));
                }
            }
            WorkerMessage::Error {
                worker_id,
                rank,
                error,
            } => {
                warn!("worker {} failed on rank {}: {}", worker_id, rank, error);
                if first_error.as_ref().map_or(true, |(r, _)| rank < *r) {
                    first_error = Some((rank, error));
                }
            }
            WorkerMessage::Done {
                worker_id,
                statistics,
            } => {
                worker_stats.push((worker_id, statistics));
                done_count += 1;
                if done_count >= num_workers {
                    break;
                }
            }
        }
    }

    // An error outranking the best success would have been hit first
    // by the sequential search
    if let Some((error_rank, error)) = first_error {
        if best.as_ref().map_or(true, |(best_rank, _)| error_rank < *best_rank) {
            return Err(error);
        }
    }

    let mut total_stats = SearchStatistics::new(Algorithm::Backtracking);
    for (_, stats) in &worker_stats {
        total_stats.merge(stats);
    }
    total_stats.elapsed_time = start_time.elapsed();

    let best_result = match best {
        Some((_, solution)) => SearchResult::solved(solution, total_stats),
        None => SearchResult::exhausted(total_stats),
    };

    Ok(ParallelResult {
        best_result,
        worker_statistics: worker_stats,
    })
}

/// Worker function that searches one subtree per job.
fn run_worker(worker_id: usize, expr: &Expr, config: &SearchConfig, channels: WorkerChannels) {
    let mut search = BacktrackingSearch::new();

    for job in channels.jobs.iter() {
        if channels.shared.is_superseded(job.rank) {
            let _ = channels.to_coordinator.send(WorkerMessage::Finished {
                worker_id,
                rank: job.rank,
                solution: None,
            });
            continue;
        }

        if config.verbose {
            info!("worker {} trying first digit {}", worker_id, job.digit);
        }
        search.set_stop_flag(channels.shared.cancel_flag(job.rank));

        let message = match search.search_prefix(expr, config, &[job.digit]) {
            Ok(solution) => {
                if solution.is_some() {
                    channels.shared.try_update(job.rank);
                }
                WorkerMessage::Finished {
                    worker_id,
                    rank: job.rank,
                    solution,
                }
            }
            Err(error) => WorkerMessage::Error {
                worker_id,
                rank: job.rank,
                error,
            },
        };
        let _ = channels.to_coordinator.send(message);
    }

    let mut statistics = search.statistics();
    // cancellation of superseded jobs is not an interruption of the search
    statistics.interrupted = false;
    let _ = channels.to_coordinator.send(WorkerMessage::Done {
        worker_id,
        statistics,
    });
}
