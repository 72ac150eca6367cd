//! Search result types and statistics

#![allow(dead_code)]

use crate::search::config::{Algorithm, Direction};
use crate::semantics::expr::Assignment;
use std::time::Duration;

/// A satisfying digit assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Input indices, ascending
    pub inputs: Vec<usize>,
    /// Digit bound to each entry of `inputs`
    pub digits: Vec<i64>,
}

impl Solution {
    pub fn new(inputs: Vec<usize>, digits: Vec<i64>) -> Self {
        debug_assert_eq!(inputs.len(), digits.len());
        Self { inputs, digits }
    }

    /// Collect a solution from a full assignment, in input order
    pub fn from_assignment(assignment: &Assignment) -> Self {
        let (inputs, digits) = assignment.iter().unzip();
        Self { inputs, digits }
    }

    pub fn assignment(&self) -> Assignment {
        let mut assignment = Assignment::new();
        for (&index, &digit) in self.inputs.iter().zip(&self.digits) {
            assignment.bind(index, digit);
        }
        assignment
    }

    /// Extend to inputs `0..total`, filling inputs the expression never
    /// referenced with the direction's preferred digit
    pub fn complete(&self, total: usize, direction: Direction) -> Self {
        let assignment = self.assignment();
        let referenced = self.inputs.last().map_or(0, |&i| i + 1);
        let inputs: Vec<usize> = (0..total.max(referenced)).collect();
        let digits = inputs
            .iter()
            .map(|&i| assignment.get(i).unwrap_or(direction.preferred_digit()))
            .collect();
        Self { inputs, digits }
    }

    /// Digits concatenated in input order
    pub fn model_number(&self) -> String {
        self.digits.iter().map(|d| d.to_string()).collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_number())
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The best assignment in search order
    Solved(Solution),
    /// No assignment drives the register to the target value
    Exhausted,
}

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    /// Statistics from the search
    pub statistics: SearchStatistics,
}

impl SearchResult {
    pub fn solved(solution: Solution, statistics: SearchStatistics) -> Self {
        Self {
            outcome: SearchOutcome::Solved(solution),
            statistics,
        }
    }

    pub fn exhausted(statistics: SearchStatistics) -> Self {
        Self {
            outcome: SearchOutcome::Exhausted,
            statistics,
        }
    }

    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            SearchOutcome::Solved(solution) => Some(solution),
            SearchOutcome::Exhausted => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solution().is_some()
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Algorithm used for the search
    pub algorithm: Algorithm,
    /// Total time spent searching
    pub elapsed_time: Duration,
    /// Number of partial or full assignments tried
    pub nodes_visited: u64,
    /// Number of candidates rejected by the range test
    pub branches_pruned: u64,
    /// Number of exact evaluations of the original expression
    pub exact_checks: u64,
    /// Whether a stop request cut the search short
    pub interrupted: bool,
}

impl SearchStatistics {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Fold another worker's counters into this one
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_visited += other.nodes_visited;
        self.branches_pruned += other.branches_pruned;
        self.exact_checks += other.exact_checks;
    }

    /// Fraction of visited nodes cut by the range test (0.0 to 1.0)
    pub fn prune_rate(&self) -> f64 {
        if self.nodes_visited == 0 {
            0.0
        } else {
            self.branches_pruned as f64 / self.nodes_visited as f64
        }
    }

    /// Nodes visited per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_visited as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Algorithm: {}\n", self.algorithm));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes visited: {}\n", self.nodes_visited));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));

        if self.branches_pruned > 0 {
            s.push_str(&format!(
                "Branches pruned: {} ({:.2}%)\n",
                self.branches_pruned,
                self.prune_rate() * 100.0
            ));
        }

        s.push_str(&format!("Exact checks: {}\n", self.exact_checks));

        if self.interrupted {
            s.push_str("Interrupted: yes\n");
        }

        s
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            SearchOutcome::Solved(solution) => writeln!(f, "Solution: {}", solution)?,
            SearchOutcome::Exhausted => writeln!(f, "No satisfying assignment")?,
        }
        write!(f, "{}", self.statistics.format_summary())
    }
}
