//! Configuration types for search algorithms

use crate::ir::Register;
use crate::semantics::expr::{INPUT_MAX, INPUT_MIN};

/// Search algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Depth-first search that prunes on expression ranges
    #[default]
    Backtracking,
    /// Unpruned enumeration of every digit assignment
    Exhaustive,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Backtracking => write!(f, "backtracking"),
            Algorithm::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backtracking" | "backtrack" | "bt" => Ok(Algorithm::Backtracking),
            "exhaustive" | "brute-force" | "brute" => Ok(Algorithm::Exhaustive),
            _ => Err(format!(
                "Unknown algorithm: '{}'. Valid options: backtracking, exhaustive",
                s
            )),
        }
    }
}

/// Which extremal assignment the search looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Try digits 9 down to 1 at every position
    #[default]
    Largest,
    /// Try digits 1 up to 9 at every position
    Smallest,
}

impl Direction {
    /// Candidate digits for one position, best first
    pub fn digits(&self) -> Vec<i64> {
        match self {
            Direction::Largest => (INPUT_MIN..=INPUT_MAX).rev().collect(),
            Direction::Smallest => (INPUT_MIN..=INPUT_MAX).collect(),
        }
    }

    /// The digit this direction prefers when a position is unconstrained
    pub fn preferred_digit(&self) -> i64 {
        match self {
            Direction::Largest => INPUT_MAX,
            Direction::Smallest => INPUT_MIN,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Largest => write!(f, "largest"),
            Direction::Smallest => write!(f, "smallest"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "largest" | "max" => Ok(Direction::Largest),
            "smallest" | "min" => Ok(Direction::Smallest),
            _ => Err(format!(
                "Unknown direction: '{}'. Valid options: largest, smallest",
                s
            )),
        }
    }
}

/// Main search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search algorithm to use
    pub algorithm: Algorithm,
    /// Largest or smallest satisfying assignment
    pub direction: Direction,
    /// Value the target register must hold at the end of the program
    pub target_value: i64,
    /// Register whose final expression is solved
    pub register: Register,
    /// Log progress at the outermost position
    pub verbose: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            direction: Direction::default(),
            target_value: 0,
            register: Register::Z,
            verbose: false,
        }
    }
}

impl SearchConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_target_value(mut self, target_value: i64) -> Self {
        self.target_value = target_value;
        self
    }

    pub fn with_register(mut self, register: Register) -> Self {
        self.register = register;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
