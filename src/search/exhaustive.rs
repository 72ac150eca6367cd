//! Unpruned enumeration of every digit assignment
//!
//! Walks all 9^N assignments of the referenced inputs in search order and
//! evaluates the expression exactly for each. Exponential, so it is only
//! practical for a handful of inputs; it serves as the reference the pruned
//! search is checked against.

use crate::search::config::SearchConfig;
use crate::search::result::{SearchResult, SearchStatistics, Solution};
use crate::search::{Algorithm, SearchAlgorithm};
use crate::semantics::expr::{Assignment, EvalError, Expr};
use log::{info, warn};
use std::time::Instant;

/// Inputs beyond which enumeration is reported as impractical
const PRACTICAL_INPUTS: usize = 8;

/// Brute-force search over all assignments
pub struct ExhaustiveSearch {
    statistics: SearchStatistics,
}

impl ExhaustiveSearch {
    pub fn new() -> Self {
        Self {
            statistics: SearchStatistics::new(Algorithm::Exhaustive),
        }
    }
}

impl Default for ExhaustiveSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance an odometer of digit choices; false once it wraps around
fn advance(choices: &mut [usize], radix: usize) -> bool {
    for choice in choices.iter_mut().rev() {
        *choice += 1;
        if *choice < radix {
            return true;
        }
        *choice = 0;
    }
    false
}

impl SearchAlgorithm for ExhaustiveSearch {
    fn search(&mut self, expr: &Expr, config: &SearchConfig) -> Result<SearchResult, EvalError> {
        self.reset();
        let start_time = Instant::now();

        let positions = expr.input_indices();
        if positions.len() > PRACTICAL_INPUTS {
            warn!(
                "enumerating 9^{} assignments; this will not finish in practical time",
                positions.len()
            );
        }

        let digits = config.direction.digits();
        let mut choices = vec![0usize; positions.len()];
        let mut found = None;

        loop {
            let mut assignment = Assignment::new();
            for (&index, &choice) in positions.iter().zip(&choices) {
                assignment.bind(index, digits[choice]);
            }

            self.statistics.nodes_visited += 1;
            self.statistics.exact_checks += 1;
            match expr.evaluate(&assignment) {
                Ok(value) if value == config.target_value => {
                    found = Some(Solution::from_assignment(&assignment));
                    break;
                }
                Ok(_) | Err(EvalError::DivisionByZero) => {}
                Err(e) => return Err(e),
            }

            if !advance(&mut choices, digits.len()) {
                break;
            }
        }

        self.statistics.elapsed_time = start_time.elapsed();
        info!(
            "exhaustive search checked {} assignments in {:.2?}",
            self.statistics.exact_checks, self.statistics.elapsed_time
        );

        Ok(match found {
            Some(solution) => SearchResult::solved(solution, self.statistics.clone()),
            None => SearchResult::exhausted(self.statistics.clone()),
        })
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::Exhaustive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::Direction;
    use crate::search::result::SearchOutcome;

    fn sum_mod_five() -> Expr {
        Expr::modulo(
            Expr::add(Expr::input(0), Expr::input(1)),
            Expr::literal(5),
        )
    }

    #[test]
    fn test_advance_odometer() {
        let mut choices = vec![0, 8];
        assert!(advance(&mut choices, 9));
        assert_eq!(choices, vec![1, 0]);
        let mut choices = vec![8, 8];
        assert!(!advance(&mut choices, 9));
        assert_eq!(choices, vec![0, 0]);
    }

    #[test]
    fn test_finds_first_in_search_order() {
        let mut search = ExhaustiveSearch::new();
        let result = search.search(&sum_mod_five(), &SearchConfig::default()).unwrap();
        assert_eq!(result.solution().map(|s| s.model_number()), Some("96".into()));
        // 9x: 99, 98, 97 fail before 96
        assert_eq!(result.statistics.exact_checks, 4);

        let config = SearchConfig::default().with_direction(Direction::Smallest);
        let result = search.search(&sum_mod_five(), &config).unwrap();
        assert_eq!(result.solution().map(|s| s.model_number()), Some("14".into()));
    }

    #[test]
    fn test_exhausts_every_assignment() {
        let mut search = ExhaustiveSearch::new();
        let config = SearchConfig::default().with_target_value(5);
        let result = search.search(&sum_mod_five(), &config).unwrap();
        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(result.statistics.exact_checks, 81);
        assert_eq!(search.statistics().algorithm, Algorithm::Exhaustive);
    }

    #[test]
    fn test_skips_sparse_input_indices() {
        // only input 2 is referenced
        let expr = Expr::eql(Expr::input(2), Expr::literal(4));
        let config = SearchConfig::default().with_target_value(1);
        let result = ExhaustiveSearch::new().search(&expr, &config).unwrap();
        assert_eq!(result.solution(), Some(&Solution::new(vec![2], vec![4])));
    }
}
