//! Range-pruned backtracking search over input digits
//!
//! Positions are the distinct inputs the expression references, in
//! ascending order. At each position the candidate digits are tried best
//! first; each candidate extends the parent's assignment, the parent's
//! simplified expression is simplified again under it, and the candidate is
//! discarded when the target value falls outside the resulting range. A
//! complete assignment is accepted only after an exact evaluation of the
//! original expression.
//!
//! Every level owns its simplified expression and assignment, so
//! backtracking is just returning from the recursive call.

use crate::search::config::SearchConfig;
use crate::search::result::{SearchResult, SearchStatistics, Solution};
use crate::search::{Algorithm, SearchAlgorithm};
use crate::semantics::expr::{Assignment, EvalError, Expr};
use crate::semantics::simplify::simplify;
use log::{debug, info, trace};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Backtracking search with range pruning
pub struct BacktrackingSearch {
    statistics: SearchStatistics,
    stop: Option<Arc<AtomicBool>>,
}

impl BacktrackingSearch {
    pub fn new() -> Self {
        Self {
            statistics: SearchStatistics::new(Algorithm::Backtracking),
            stop: None,
        }
    }

    /// Abandon the search as soon as `flag` is set
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn set_stop_flag(&mut self, flag: Option<Arc<AtomicBool>>) {
        self.stop = flag;
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Search the subtree whose leading positions hold `prefix`.
    ///
    /// Statistics accumulate across calls until [`SearchAlgorithm::reset`].
    /// A prefix longer than the number of positions is truncated.
    pub fn search_prefix(
        &mut self,
        expr: &Expr,
        config: &SearchConfig,
        prefix: &[i64],
    ) -> Result<Option<Solution>, EvalError> {
        let positions = expr.input_indices();
        let fixed = prefix.len().min(positions.len());

        let mut assignment = Assignment::new();
        for (&index, &digit) in positions.iter().zip(&prefix[..fixed]) {
            assignment.bind(index, digit);
        }

        let current = if fixed == 0 {
            expr.clone()
        } else {
            self.statistics.nodes_visited += 1;
            let simplified = simplify(expr, &assignment);
            if !simplified.range().includes(config.target_value) {
                self.statistics.branches_pruned += 1;
                return Ok(None);
            }
            simplified
        };

        let found = self.descend(expr, &current, &positions, fixed, &assignment, config)?;
        Ok(found.map(|assignment| Solution::from_assignment(&assignment)))
    }

    fn descend(
        &mut self,
        original: &Expr,
        current: &Expr,
        positions: &[usize],
        depth: usize,
        assignment: &Assignment,
        config: &SearchConfig,
    ) -> Result<Option<Assignment>, EvalError> {
        if depth == positions.len() {
            return self.exact_check(original, assignment, config);
        }

        let index = positions[depth];
        for digit in config.direction.digits() {
            if self.stopped() {
                self.statistics.interrupted = true;
                return Ok(None);
            }
            if depth == 0 && config.verbose {
                info!("trying i{}={}", index, digit);
            }

            self.statistics.nodes_visited += 1;
            let extended = assignment.with(index, digit);
            let simplified = simplify(current, &extended);
            if !simplified.range().includes(config.target_value) {
                self.statistics.branches_pruned += 1;
                continue;
            }
            trace!("accepted {} (range {})", extended, simplified.range());

            if let Some(found) =
                self.descend(original, &simplified, positions, depth + 1, &extended, config)?
            {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Evaluate the original expression under a complete assignment.
    ///
    /// An assignment that divides by zero is not a valid execution and is
    /// rejected like any other mismatch.
    fn exact_check(
        &mut self,
        original: &Expr,
        assignment: &Assignment,
        config: &SearchConfig,
    ) -> Result<Option<Assignment>, EvalError> {
        self.statistics.exact_checks += 1;
        match original.evaluate(assignment) {
            Ok(value) if value == config.target_value => Ok(Some(assignment.clone())),
            Ok(_) | Err(EvalError::DivisionByZero) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Default for BacktrackingSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for BacktrackingSearch {
    fn search(&mut self, expr: &Expr, config: &SearchConfig) -> Result<SearchResult, EvalError> {
        self.reset();
        let start_time = Instant::now();

        let found = self.search_prefix(expr, config, &[])?;
        self.statistics.elapsed_time = start_time.elapsed();

        debug!(
            "visited {} nodes, pruned {}, {} exact checks",
            self.statistics.nodes_visited,
            self.statistics.branches_pruned,
            self.statistics.exact_checks
        );

        Ok(match found {
            Some(solution) => {
                info!("found {} in {:.2?}", solution, self.statistics.elapsed_time);
                SearchResult::solved(solution, self.statistics.clone())
            }
            None => {
                info!(
                    "no assignment reaches {} ({:.2?})",
                    config.target_value, self.statistics.elapsed_time
                );
                SearchResult::exhausted(self.statistics.clone())
            }
        })
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::Backtracking);
    }
}
