//! Parallel search execution for running backtracking workers concurrently.
//!
//! Each candidate digit of the outermost position roots an independent
//! subtree, so those subtrees can be searched at the same time.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **coordinator** that spawns workers and keeps the best-ranked result
//! - Multiple **workers** that pull ranked jobs and run the backtracking search
//! - A **channel system** carrying jobs to workers and results back
//! - **Shared state** with per-job cancellation flags, so a success stops
//!   every subtree ranked after it without a channel round trip
//!
//! # Example
//!
//! ```ignore
//! use alu_symbolic::search::parallel::{ParallelConfig, run_parallel_search};
//!
//! let config = ParallelConfig::default().with_workers(4);
//! let result = run_parallel_search(&expr, &search_config, &config)?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;

pub use config::ParallelConfig;
pub use coordinator::{ParallelResult, run_parallel_search};
