//! Search for input digits that drive a register to a target value
//!
//! This module provides the solvers:
//! - Backtracking: depth-first over digits, pruned by expression ranges
//! - Exhaustive: unpruned enumeration, the reference for the pruned search
//! - Parallel: backtracking with the outermost digits spread over threads

pub mod backtrack;
pub mod config;
pub mod exhaustive;
pub mod parallel;
pub mod result;

pub use backtrack::BacktrackingSearch;
#[allow(unused_imports)]
pub use config::{Algorithm, Direction, SearchConfig};
pub use exhaustive::ExhaustiveSearch;
#[allow(unused_imports)]
pub use parallel::{ParallelConfig, ParallelResult, run_parallel_search};
#[allow(unused_imports)]
pub use result::{SearchOutcome, SearchResult, SearchStatistics, Solution};

use crate::semantics::expr::{EvalError, Expr};

/// Trait for searches over input digit assignments
#[allow(dead_code)]
pub trait SearchAlgorithm {
    /// Find the best assignment, in the configured direction, under which
    /// `expr` evaluates to the configured target value
    ///
    /// # Arguments
    /// * `expr` - The simplified expression of the target register
    /// * `config` - Search configuration parameters
    ///
    /// # Returns
    /// A SearchResult that is either solved or exhausted. `Err` is reserved
    /// for structural failures such as an input left unbound.
    fn search(&mut self, expr: &Expr, config: &SearchConfig) -> Result<SearchResult, EvalError>;

    /// Get statistics from the most recent search
    fn statistics(&self) -> SearchStatistics;

    /// Reset the search state for a new search
    fn reset(&mut self);
}

/// Build the search for `algorithm`
pub fn create_search(algorithm: Algorithm) -> Box<dyn SearchAlgorithm> {
    match algorithm {
        Algorithm::Backtracking => Box::new(BacktrackingSearch::new()),
        Algorithm::Exhaustive => Box::new(ExhaustiveSearch::new()),
    }
}
